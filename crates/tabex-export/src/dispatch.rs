//! Method-name dispatch: `create_<format>_report` and `to_<format>_export`.

use std::fmt;

const REPORT_PREFIX: &str = "create_";
const REPORT_SUFFIX: &str = "_report";
const EXPORT_PREFIX: &str = "to_";
const EXPORT_SUFFIX: &str = "_export";

/// An operation named by a method-style identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Build a report from caller-supplied rows.
    CreateReport(String),
    /// Fetch records and export them.
    ToExport(String),
}

impl Operation {
    /// Parse a method name. The format token is not checked here.
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(format) = strip_affixes(name, REPORT_PREFIX, REPORT_SUFFIX) {
            return Some(Operation::CreateReport(format.to_string()));
        }
        strip_affixes(name, EXPORT_PREFIX, EXPORT_SUFFIX)
            .map(|format| Operation::ToExport(format.to_string()))
    }

    pub fn format(&self) -> &str {
        match self {
            Operation::CreateReport(format) | Operation::ToExport(format) => format,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreateReport(format) => {
                write!(f, "{REPORT_PREFIX}{format}{REPORT_SUFFIX}")
            }
            Operation::ToExport(format) => write!(f, "{EXPORT_PREFIX}{format}{EXPORT_SUFFIX}"),
        }
    }
}

fn strip_affixes<'a>(name: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix)?
        .strip_suffix(suffix)
        .filter(|format| !format.is_empty())
}
