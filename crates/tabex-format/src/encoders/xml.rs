use std::borrow::Cow;

use tabex_model::{Result, Row, dasherize};

use super::FormatEncoder;
use crate::sanitize::xml_field;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// `<records>` document with one `<record>` element per row.
///
/// Child elements are named after the dasherized headers, or
/// `attribute_<index>` without headers. Names are not checked for XML
/// legality.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordsXmlEncoder;

impl FormatEncoder for RecordsXmlEncoder {
    fn encode(&self, rows: &[Row], headers: Option<&[String]>) -> Result<String> {
        let names: Vec<String> = match headers {
            Some(headers) => headers
                .iter()
                .map(|header| xml_field(&dasherize(header)).into_owned())
                .collect(),
            None => Vec::new(),
        };

        let mut out = String::from(XML_DECLARATION);
        out.push_str("<records>\n");
        for row in rows {
            out.push_str("\t<record>\n");
            for (index, field) in row.iter().enumerate() {
                let name = match names.get(index) {
                    Some(name) => Cow::Borrowed(name.as_str()),
                    None => Cow::Owned(format!("attribute_{index}")),
                };
                out.push_str("\t\t<");
                out.push_str(&name);
                out.push('>');
                out.push_str(&xml_field(field));
                out.push_str("</");
                out.push_str(&name);
                out.push_str(">\n");
            }
            out.push_str("\t</record>\n");
        }
        out.push_str("</records>\n");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabex_model::row;

    #[test]
    fn element_names_follow_headers() {
        let rows = vec![row(["user_1", "false"])];
        let headers = row(["first_name", "is_admin"]);
        assert_eq!(
            RecordsXmlEncoder.encode(&rows, Some(&headers)).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<records>\n\t<record>\n\
             \t\t<first-name>user_1</first-name>\n\t\t<is-admin>false</is-admin>\n\
             \t</record>\n</records>\n"
        );
    }

    #[test]
    fn positional_names_without_headers() {
        let rows = vec![row(["a & b", "<c>"])];
        assert_eq!(
            RecordsXmlEncoder.encode(&rows, None).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<records>\n\t<record>\n\
             \t\t<attribute_0>a &amp; b</attribute_0>\n\t\t<attribute_1>&lt;c&gt;</attribute_1>\n\
             \t</record>\n</records>\n"
        );
    }

    #[test]
    fn empty_record_set() {
        assert_eq!(
            RecordsXmlEncoder.encode(&[], None).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<records>\n</records>\n"
        );
    }
}
