use thiserror::Error;

/// Errors raised by format lookup, dataset validation and export configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("{format} is not a supported format")]
    UnsupportedFormat { format: String },

    #[error("{format} format is not allowed on {entity}")]
    FormatNotAllowed { format: String, entity: String },

    /// Declaration-time failure: none of the requested formats is registered.
    #[error("no registered format among [{requested}]")]
    FormatNotFound { requested: String },

    #[error("malformed dataset: {message}")]
    MalformedDataset { message: String },

    #[error(
        "all rows must be the same length: row {row} has {found} fields, expected {expected} \
         (are the headers set by hand?)"
    )]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("no columns to export for {entity}")]
    NoColumnsSpecified { entity: String },

    #[error("{entity} is not exportable")]
    EntityNotExportable { entity: String },

    #[error("unsupported operation {method} on {entity}")]
    UnsupportedOperation { method: String, entity: String },

    #[error("invalid export options: {message}")]
    InvalidOptions { message: String },

    /// A writer failed while producing the payload.
    #[error("{format} encoding failed: {message}")]
    Encoding { format: String, message: String },

    #[error("record store error: {0}")]
    Store(String),
}

/// Coarse error category, for callers that map failures onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested format or operation does not exist for this entity.
    NotFound,
    /// The data could not be shaped into a valid dataset.
    Unprocessable,
    /// The entity or its export configuration is unusable.
    Misconfigured,
    /// The record store failed.
    Storage,
}

impl ExportError {
    pub fn malformed(message: impl Into<String>) -> Self {
        ExportError::MalformedDataset {
            message: message.into(),
        }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        ExportError::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn encoding(format: impl Into<String>, error: impl std::fmt::Display) -> Self {
        ExportError::Encoding {
            format: format.into(),
            message: error.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ExportError::UnsupportedFormat { .. }
            | ExportError::FormatNotAllowed { .. }
            | ExportError::UnsupportedOperation { .. } => ErrorKind::NotFound,
            ExportError::MalformedDataset { .. }
            | ExportError::RowLengthMismatch { .. }
            | ExportError::Encoding { .. } => ErrorKind::Unprocessable,
            ExportError::FormatNotFound { .. }
            | ExportError::NoColumnsSpecified { .. }
            | ExportError::EntityNotExportable { .. }
            | ExportError::InvalidOptions { .. } => ErrorKind::Misconfigured,
            ExportError::Store(_) => ErrorKind::Storage,
        }
    }
}

/// Failure to produce a single field value.
///
/// Never escapes record-level resolution; the field becomes an empty string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown attribute {0}")]
    UnknownAttribute(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;
