//! Format encoders.
//!
//! Every encoder receives rows whose shape has already been validated. The
//! only failures left are writer errors, reported as
//! [`ExportError::Encoding`](tabex_model::ExportError::Encoding).

mod delimited;
mod json;
mod table;
mod workbook;
mod xml;

pub use delimited::{CsvEncoder, TsvEncoder};
pub use json::JsonEncoder;
pub use table::TableEncoder;
pub use workbook::WorkbookEncoder;
pub use xml::RecordsXmlEncoder;

use tabex_model::{Result, Row};

/// Renders rows (and optional headers) into a format's payload.
pub trait FormatEncoder: Send + Sync {
    fn encode(&self, rows: &[Row], headers: Option<&[String]>) -> Result<String>;
}
