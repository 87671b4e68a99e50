use std::borrow::Cow;

use tabex_model::{Result, Row, humanize};

use super::FormatEncoder;
use crate::sanitize::{csv_field, tsv_field};

/// Comma-separated values with standard quoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvEncoder;

/// Tab-separated values; tabs inside values become two spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvEncoder;

impl FormatEncoder for CsvEncoder {
    fn encode(&self, rows: &[Row], headers: Option<&[String]>) -> Result<String> {
        write_delimited(rows, headers, ',', csv_field)
    }
}

impl FormatEncoder for TsvEncoder {
    fn encode(&self, rows: &[Row], headers: Option<&[String]>) -> Result<String> {
        write_delimited(rows, headers, '\t', tsv_cell)
    }
}

fn tsv_cell(value: &str) -> Result<Cow<'_, str>> {
    Ok(tsv_field(value))
}

fn write_delimited(
    rows: &[Row],
    headers: Option<&[String]>,
    delimiter: char,
    sanitize: for<'a> fn(&'a str) -> Result<Cow<'a, str>>,
) -> Result<String> {
    let mut out = String::new();
    if let Some(headers) = headers {
        let labels: Vec<String> = headers.iter().map(String::as_str).map(humanize).collect();
        push_line(&mut out, labels.iter().map(String::as_str), delimiter, sanitize)?;
    }
    for row in rows {
        push_line(&mut out, row.iter().map(String::as_str), delimiter, sanitize)?;
    }
    Ok(out)
}

fn push_line<'a>(
    out: &mut String,
    fields: impl Iterator<Item = &'a str>,
    delimiter: char,
    sanitize: for<'b> fn(&'b str) -> Result<Cow<'b, str>>,
) -> Result<()> {
    for (index, field) in fields.enumerate() {
        if index > 0 {
            out.push(delimiter);
        }
        out.push_str(&sanitize(field)?);
    }
    out.push('\n');
    Ok(())
}
