//! Header policy: how the header row of an export is chosen and displayed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::Row;
use crate::error::{ExportError, Result};

/// How the header row of a report is obtained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderSpec {
    /// Use the exported column identifiers.
    #[default]
    Derive,
    /// Use these names, one per column.
    Explicit(Vec<String>),
    /// The first data row is the header row.
    FirstRow,
    /// No header row. This is the only "no headers" value.
    Suppressed,
}

impl HeaderSpec {
    pub fn explicit<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        HeaderSpec::Explicit(names.into_iter().map(Into::into).collect())
    }

    /// Resolve the effective headers, consuming the header row from `rows`
    /// for [`HeaderSpec::FirstRow`].
    ///
    /// `columns` supplies the identifiers used by [`HeaderSpec::Derive`].
    pub fn resolve(&self, columns: &[String], rows: &mut Vec<Row>) -> Result<Option<Vec<String>>> {
        match self {
            HeaderSpec::Derive => Ok(Some(columns.to_vec())),
            HeaderSpec::Explicit(names) if names.is_empty() => Err(ExportError::malformed(
                "explicit header list is empty; use suppressed headers instead",
            )),
            HeaderSpec::Explicit(names) => Ok(Some(names.clone())),
            HeaderSpec::FirstRow => {
                if rows.is_empty() {
                    return Err(ExportError::malformed(
                        "header row requested from the first row of an empty dataset",
                    ));
                }
                Ok(Some(rows.remove(0)))
            }
            HeaderSpec::Suppressed => Ok(None),
        }
    }
}

/// The `header=present` / `header=absent` content-type parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPresence {
    Present,
    Absent,
}

impl HeaderPresence {
    pub fn of<T>(headers: Option<&[T]>) -> Self {
        match headers {
            Some(_) => HeaderPresence::Present,
            None => HeaderPresence::Absent,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            HeaderPresence::Present => "header=present",
            HeaderPresence::Absent => "header=absent",
        }
    }
}

impl fmt::Display for HeaderPresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Turn a column identifier into a display label.
///
/// `first_name` becomes `First Name`; already readable labels keep their words.
pub fn humanize(identifier: &str) -> String {
    let spaced: String = identifier
        .chars()
        .map(|ch| if ch == '_' || ch == '-' { ' ' } else { ch })
        .collect();
    let mut out = String::with_capacity(spaced.len());
    for word in spaced.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

/// Turn header text into a dash-case element name (`Is Admin` -> `is-admin`).
pub fn dasherize(text: &str) -> String {
    text.trim()
        .chars()
        .map(|ch| match ch {
            ' ' | '_' => '-',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanize_titles_identifiers() {
        assert_eq!(humanize("first_name"), "First Name");
        assert_eq!(humanize("is_admin"), "Is Admin");
        assert_eq!(humanize("Another Title"), "Another Title");
        assert_eq!(humanize("Title"), "Title");
        assert_eq!(humanize("created__at"), "Created At");
        assert_eq!(humanize("ID"), "Id");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn dasherize_lowercases_and_hyphenates() {
        assert_eq!(dasherize("first_name"), "first-name");
        assert_eq!(dasherize("Is Admin"), "is-admin");
        assert_eq!(dasherize(" title "), "title");
    }

    #[test]
    fn presence_token() {
        let headers = vec!["a".to_string()];
        assert_eq!(
            HeaderPresence::of(Some(headers.as_slice())).as_token(),
            "header=present"
        );
        assert_eq!(HeaderPresence::of::<String>(None).to_string(), "header=absent");
    }

    #[test]
    fn first_row_is_consumed() {
        let mut rows = vec![
            vec!["Title".to_string(), "Other".to_string()],
            vec!["a".to_string(), "b".to_string()],
        ];
        let headers = HeaderSpec::FirstRow.resolve(&[], &mut rows).unwrap();
        assert_eq!(headers, Some(vec!["Title".to_string(), "Other".to_string()]));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn first_row_of_empty_rows_is_malformed() {
        let mut rows = Vec::new();
        let err = HeaderSpec::FirstRow.resolve(&[], &mut rows).unwrap_err();
        assert!(matches!(err, ExportError::MalformedDataset { .. }));
    }

    #[test]
    fn empty_explicit_headers_are_rejected() {
        let mut rows = Vec::new();
        let err = HeaderSpec::Explicit(vec![]).resolve(&[], &mut rows).unwrap_err();
        assert!(matches!(err, ExportError::MalformedDataset { .. }));
    }

    #[test]
    fn derive_uses_columns() {
        let mut rows = Vec::new();
        let columns = vec!["id".to_string(), "name".to_string()];
        let headers = HeaderSpec::Derive.resolve(&columns, &mut rows).unwrap();
        assert_eq!(headers, Some(columns));
        assert_eq!(HeaderSpec::Suppressed.resolve(&[], &mut rows).unwrap(), None);
    }

    #[test]
    fn header_spec_from_json() {
        let spec: HeaderSpec = serde_json::from_str(r#"{"explicit":["A","B"]}"#).unwrap();
        assert_eq!(spec, HeaderSpec::explicit(["A", "B"]));
        let spec: HeaderSpec = serde_json::from_str(r#""suppressed""#).unwrap();
        assert_eq!(spec, HeaderSpec::Suppressed);
    }
}
