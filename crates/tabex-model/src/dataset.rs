//! Rows and datasets handed to format encoders.

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// One exported record: a text value per column, in column order.
pub type Row = Vec<String>;

/// Optional headers paired with the rows to encode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(headers: Option<Vec<String>>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    pub fn with_headers(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            headers: Some(headers),
            rows,
        }
    }

    pub fn headerless(rows: Vec<Row>) -> Self {
        Self {
            headers: None,
            rows,
        }
    }

    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check that every row has the same width as the headers (or the first row).
    ///
    /// Rows coming from schemaless stores can drift, so this reports instead of asserting.
    pub fn validate_shape(&self) -> Result<usize> {
        let expected = match (&self.headers, self.rows.first()) {
            (Some(headers), _) => headers.len(),
            (None, Some(first)) => first.len(),
            (None, None) => {
                return Err(ExportError::malformed(
                    "cannot determine row length of an empty dataset without headers",
                ));
            }
        };
        for (index, row) in self.rows.iter().enumerate() {
            if row.len() != expected {
                return Err(ExportError::RowLengthMismatch {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
        }
        Ok(expected)
    }
}

/// Build a [`Row`] from anything string-like.
pub fn row<I, S>(values: I) -> Row
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}
