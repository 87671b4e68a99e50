//! Data model for tabular exports: rows, datasets, header policy and errors.

pub mod dataset;
pub mod error;
pub mod headers;

pub use dataset::{Dataset, Row, row};
pub use error::{ErrorKind, ExportError, FieldError, Result};
pub use headers::{HeaderPresence, HeaderSpec, dasherize, humanize};
