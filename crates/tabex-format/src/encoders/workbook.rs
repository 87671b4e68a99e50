//! SpreadsheetML 2003 workbook (`<Workbook>` with the Excel namespaces).

use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use tabex_model::{ExportError, Result, Row, humanize};

use super::FormatEncoder;

const SPREADSHEET_NS: &str = "urn:schemas-microsoft-com:office:spreadsheet";
const OFFICE_NS: &str = "urn:schemas-microsoft-com:office:office";
const EXCEL_NS: &str = "urn:schemas-microsoft-com:office:excel";
const HTML_NS: &str = "http://www.w3.org/TR/REC-html40";

const HEADER_STYLE_ID: &str = "header";

/// Single-sheet Excel XML workbook.
#[derive(Debug, Clone)]
pub struct WorkbookEncoder {
    sheet_name: String,
}

impl WorkbookEncoder {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    fn render(&self, rows: &[Row], headers: Option<&[String]>) -> io::Result<Vec<u8>> {
        let mut xml = Writer::new_with_indent(Vec::new(), b' ', 1);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml.write_event(Event::PI(BytesPI::new(r#"mso-application progid="Excel.Sheet""#)))?;

        let mut workbook = BytesStart::new("Workbook");
        workbook.push_attribute(("xmlns", SPREADSHEET_NS));
        workbook.push_attribute(("xmlns:o", OFFICE_NS));
        workbook.push_attribute(("xmlns:x", EXCEL_NS));
        workbook.push_attribute(("xmlns:ss", SPREADSHEET_NS));
        workbook.push_attribute(("xmlns:html", HTML_NS));
        xml.write_event(Event::Start(workbook))?;

        xml.write_event(Event::Start(BytesStart::new("Styles")))?;
        let mut style = BytesStart::new("Style");
        style.push_attribute(("ss:ID", HEADER_STYLE_ID));
        xml.write_event(Event::Start(style))?;
        let mut font = BytesStart::new("Font");
        font.push_attribute(("ss:Bold", "1"));
        xml.write_event(Event::Empty(font))?;
        xml.write_event(Event::End(BytesEnd::new("Style")))?;
        xml.write_event(Event::End(BytesEnd::new("Styles")))?;

        let mut worksheet = BytesStart::new("Worksheet");
        worksheet.push_attribute(("ss:Name", self.sheet_name.as_str()));
        xml.write_event(Event::Start(worksheet))?;
        xml.write_event(Event::Start(BytesStart::new("Table")))?;

        if let Some(headers) = headers {
            let labels: Vec<String> = headers.iter().map(String::as_str).map(humanize).collect();
            write_row(&mut xml, &labels, Some(HEADER_STYLE_ID))?;
        }
        for row in rows {
            write_row(&mut xml, row, None)?;
        }

        xml.write_event(Event::End(BytesEnd::new("Table")))?;
        xml.write_event(Event::End(BytesEnd::new("Worksheet")))?;
        xml.write_event(Event::End(BytesEnd::new("Workbook")))?;
        let mut bytes = xml.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }
}

impl Default for WorkbookEncoder {
    fn default() -> Self {
        Self::new("Export")
    }
}

fn write_row(xml: &mut Writer<Vec<u8>>, cells: &[String], style: Option<&str>) -> io::Result<()> {
    xml.write_event(Event::Start(BytesStart::new("Row")))?;
    for value in cells {
        let mut cell = BytesStart::new("Cell");
        if let Some(style) = style {
            cell.push_attribute(("ss:StyleID", style));
        }
        xml.write_event(Event::Start(cell))?;
        let mut data = BytesStart::new("Data");
        data.push_attribute(("ss:Type", "String"));
        xml.write_event(Event::Start(data))?;
        xml.write_event(Event::Text(BytesText::new(value)))?;
        xml.write_event(Event::End(BytesEnd::new("Data")))?;
        xml.write_event(Event::End(BytesEnd::new("Cell")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("Row")))
}

impl FormatEncoder for WorkbookEncoder {
    fn encode(&self, rows: &[Row], headers: Option<&[String]>) -> Result<String> {
        let bytes = self
            .render(rows, headers)
            .map_err(|error| ExportError::encoding("spreadsheetml", error))?;
        String::from_utf8(bytes).map_err(|error| ExportError::encoding("spreadsheetml", error))
    }
}
