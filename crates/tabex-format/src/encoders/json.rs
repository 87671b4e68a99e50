use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use tabex_model::{ExportError, Row};

use super::FormatEncoder;

/// JSON array: objects keyed by header when headers are present, arrays otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

/// Serializes one row as an object, keeping field order.
struct KeyedRow<'a> {
    headers: &'a [String],
    fields: &'a [String],
}

impl Serialize for KeyedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (header, field) in self.headers.iter().zip(self.fields) {
            map.serialize_entry(header, field)?;
        }
        map.end()
    }
}

impl FormatEncoder for JsonEncoder {
    fn encode(&self, rows: &[Row], headers: Option<&[String]>) -> tabex_model::Result<String> {
        let encoded = match headers {
            Some(headers) => {
                let keyed: Vec<KeyedRow<'_>> = rows
                    .iter()
                    .map(|fields| KeyedRow { headers, fields })
                    .collect();
                serde_json::to_string(&keyed)
            }
            None => serde_json::to_string(rows),
        };
        encoded.map_err(|error| ExportError::encoding("json", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabex_model::row;

    #[test]
    fn objects_keep_header_order() {
        let rows = vec![row(["user_1", "false"]), row(["user_2", "true"])];
        let headers = row(["zeta", "alpha"]);
        assert_eq!(
            JsonEncoder.encode(&rows, Some(&headers)).unwrap(),
            r#"[{"zeta":"user_1","alpha":"false"},{"zeta":"user_2","alpha":"true"}]"#
        );
    }

    #[test]
    fn headerless_rows_are_arrays() {
        let rows = vec![row(["a", "b"]), row(["c", "d"])];
        assert_eq!(JsonEncoder.encode(&rows, None).unwrap(), r#"[["a","b"],["c","d"]]"#);
    }

    #[test]
    fn escapes_through_serde_json() {
        let rows = vec![row(["quote \" and\nnewline"])];
        let headers = row(["text"]);
        assert_eq!(
            JsonEncoder.encode(&rows, Some(&headers)).unwrap(),
            r#"[{"text":"quote \" and\nnewline"}]"#
        );
    }

    #[test]
    fn empty_rows() {
        assert_eq!(JsonEncoder.encode(&[], Some(&row(["a"]))).unwrap(), "[]");
    }
}
