use tabex_model::{Result, Row, humanize};

use super::FormatEncoder;
use crate::sanitize::markup_field;

/// Plain `<table>` markup, shared by the HTML and Excel formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableEncoder;

impl FormatEncoder for TableEncoder {
    fn encode(&self, rows: &[Row], headers: Option<&[String]>) -> Result<String> {
        let mut out = String::from("<table>\n");
        if let Some(headers) = headers {
            out.push_str("\t<tr>\n");
            for header in headers {
                push_cell(&mut out, "th", &humanize(header));
            }
            out.push_str("\t</tr>\n");
        }
        for row in rows {
            out.push_str("\t<tr>\n");
            for field in row {
                push_cell(&mut out, "td", field);
            }
            out.push_str("\t</tr>\n");
        }
        out.push_str("</table>\n");
        Ok(out)
    }
}

fn push_cell(out: &mut String, tag: &str, value: &str) {
    out.push_str("\t\t<");
    out.push_str(tag);
    out.push('>');
    out.push_str(&markup_field(value));
    out.push_str("</");
    out.push_str(tag);
    out.push_str(">\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabex_model::row;

    #[test]
    fn renders_header_and_data_rows() {
        let rows = vec![row(["user_1", "false"]), row(["user_2", "false"])];
        let headers = row(["first_name", "is_admin"]);
        assert_eq!(
            TableEncoder.encode(&rows, Some(&headers)).unwrap(),
            "<table>\n\t<tr>\n\t\t<th>First Name</th>\n\t\t<th>Is Admin</th>\n\t</tr>\n\
             \t<tr>\n\t\t<td>user_1</td>\n\t\t<td>false</td>\n\t</tr>\n\
             \t<tr>\n\t\t<td>user_2</td>\n\t\t<td>false</td>\n\t</tr>\n</table>\n"
        );
    }

    #[test]
    fn escapes_brackets_only() {
        let rows = vec![row(["<i>A & B</i>"])];
        assert_eq!(
            TableEncoder.encode(&rows, None).unwrap(),
            "<table>\n\t<tr>\n\t\t<td>&lt;i&gt;A & B&lt;/i&gt;</td>\n\t</tr>\n</table>\n"
        );
    }

    #[test]
    fn empty_table() {
        assert_eq!(TableEncoder.encode(&[], None).unwrap(), "<table>\n</table>\n");
    }
}
