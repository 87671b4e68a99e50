use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tabex_model::{HeaderPresence, Result, Row};

use crate::encoders::FormatEncoder;

/// Encoded payload and the content type to serve it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub payload: String,
    pub content_type: String,
}

impl Report {
    pub fn into_parts(self) -> (String, String) {
        (self.payload, self.content_type)
    }
}

/// A registered export format.
#[derive(Clone)]
pub struct FormatDescriptor {
    id: String,
    name: String,
    long_name: String,
    content_type: String,
    header_token: bool,
    encoder: Arc<dyn FormatEncoder>,
}

impl FormatDescriptor {
    /// Describe a format whose content type advertises header presence.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        content_type: impl Into<String>,
        encoder: impl FormatEncoder + 'static,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            long_name: name.clone(),
            name,
            content_type: content_type.into(),
            header_token: true,
            encoder: Arc::new(encoder),
        }
    }

    #[must_use]
    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = long_name.into();
        self
    }

    /// Leave `header=present|absent` off the content type.
    #[must_use]
    pub fn without_header_token(mut self) -> Self {
        self.header_token = false;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// Base content type, without the header-presence parameter.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content_type_for(&self, presence: HeaderPresence) -> String {
        if self.header_token {
            format!("{}; {}", self.content_type, presence)
        } else {
            self.content_type.clone()
        }
    }

    /// Encode rows that already satisfy the dataset shape invariant.
    pub fn generate(&self, rows: &[Row], headers: Option<&[String]>) -> Result<Report> {
        Ok(Report {
            payload: self.encoder.encode(rows, headers)?,
            content_type: self.content_type_for(HeaderPresence::of(headers)),
        })
    }
}

impl fmt::Debug for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("header_token", &self.header_token)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoders::{CsvEncoder, JsonEncoder};
    use tabex_model::row;

    #[test]
    fn header_token_follows_headers() {
        let csv = FormatDescriptor::new("csv", "CSV", "text/csv; charset=utf-8", CsvEncoder);
        let rows = vec![row(["a"])];
        let headers = row(["x"]);
        assert_eq!(
            csv.generate(&rows, Some(&headers)).unwrap().content_type,
            "text/csv; charset=utf-8; header=present"
        );
        assert_eq!(
            csv.generate(&rows, None).unwrap().content_type,
            "text/csv; charset=utf-8; header=absent"
        );
    }

    #[test]
    fn json_has_no_header_token() {
        let json = FormatDescriptor::new("json", "JSON", "application/json; charset=utf-8", JsonEncoder)
            .without_header_token();
        let report = json.generate(&[], None).unwrap();
        assert_eq!(report.content_type, "application/json; charset=utf-8");
        assert_eq!(report.into_parts().0, "[]");
    }
}
