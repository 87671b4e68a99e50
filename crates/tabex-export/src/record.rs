//! Contract with the record store.

use tabex_model::{FieldError, Result, Row};
use tracing::debug;

use crate::entity::EntityType;
use crate::query::Query;

/// Suffix of the override producer consulted before a raw attribute.
pub const EXPORT_OVERRIDE_SUFFIX: &str = "_export";

/// A stored record that can produce text for named attributes.
pub trait ExportRecord {
    /// Column identifiers the record carries.
    fn column_names(&self) -> Vec<String>;

    /// Raw attribute value as text.
    fn read_attribute(&self, name: &str) -> std::result::Result<String, FieldError>;

    /// Value from the `<name>_export` producer, or `None` when the record
    /// has no such producer.
    fn export_override(&self, _name: &str) -> Option<std::result::Result<String, FieldError>> {
        None
    }

    /// Export text for `name`: the override when present, else the raw
    /// attribute. Any failure yields an empty string.
    fn resolve_field(&self, name: &str) -> String {
        let resolved = match self.export_override(name) {
            Some(value) => value,
            None => self.read_attribute(name),
        };
        resolved.unwrap_or_else(|error| {
            debug!(field = name, %error, "field resolved to empty string");
            String::new()
        })
    }

    /// One exported row for `columns`, in column order.
    fn export_row(&self, columns: &[String]) -> Row {
        columns.iter().map(|column| self.resolve_field(column)).collect()
    }
}

/// Source of records for an entity type.
pub trait RecordStore {
    type Record: ExportRecord;

    /// Fetch the records of `entity` matching `query`, in query order.
    fn fetch(&self, entity: &EntityType, query: &Query) -> Result<Vec<Self::Record>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl ExportRecord for Fixed {
        fn column_names(&self) -> Vec<String> {
            vec!["name".to_string(), "admin".to_string()]
        }

        fn read_attribute(&self, name: &str) -> std::result::Result<String, FieldError> {
            match name {
                "name" => Ok("Ada".to_string()),
                "admin" => Ok("false".to_string()),
                other => Err(FieldError::UnknownAttribute(other.to_string())),
            }
        }

        fn export_override(&self, name: &str) -> Option<std::result::Result<String, FieldError>> {
            match name {
                "admin" => Some(Ok("monkey".to_string())),
                "broken" => Some(Err(FieldError::Message("boom".to_string()))),
                _ => None,
            }
        }
    }

    #[test]
    fn override_wins_over_attribute() {
        assert_eq!(Fixed.resolve_field("admin"), "monkey");
        assert_eq!(Fixed.resolve_field("name"), "Ada");
    }

    #[test]
    fn failures_become_empty_strings() {
        assert_eq!(Fixed.resolve_field("missing"), "");
        assert_eq!(Fixed.resolve_field("broken"), "");
    }

    #[test]
    fn export_row_follows_column_order() {
        let columns = vec!["admin".to_string(), "nope".to_string(), "name".to_string()];
        assert_eq!(Fixed.export_row(&columns), vec!["monkey", "", "Ada"]);
    }
}
