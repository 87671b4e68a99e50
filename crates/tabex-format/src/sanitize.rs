//! Per-format escaping of a single value.
//!
//! None of these are idempotent: apply each exactly once per emitted value.

use std::borrow::Cow;

use tabex_model::{ExportError, Result};

/// An empty CSV field is written quoted so it reads back as an empty string.
const EMPTY_CSV_FIELD: &str = "\"\"";

/// Quote a CSV field with the `csv` crate's necessary-quoting rules.
pub fn csv_field(value: &str) -> Result<Cow<'_, str>> {
    if value.is_empty() {
        return Ok(Cow::Borrowed(EMPTY_CSV_FIELD));
    }
    let quoted = write_single_field(value)?;
    if quoted == value {
        Ok(Cow::Borrowed(value))
    } else {
        Ok(Cow::Owned(quoted))
    }
}

fn write_single_field(value: &str) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::with_capacity(value.len() + 3));
    writer
        .write_record([value])
        .map_err(|error| ExportError::encoding("csv", error))?;
    let bytes = writer
        .into_inner()
        .map_err(|error| ExportError::encoding("csv", error))?;
    let mut text = String::from_utf8(bytes).map_err(|error| ExportError::encoding("csv", error))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Replace tabs and literal `\t` sequences with two spaces.
pub fn tsv_field(value: &str) -> Cow<'_, str> {
    if !value.contains('\t') && !value.contains("\\t") {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.replace('\t', "  ").replace("\\t", "  "))
}

/// Escape angle brackets for table markup.
///
/// Ampersands and quotes pass through unchanged.
pub fn markup_field(value: &str) -> Cow<'_, str> {
    if !value.contains(['<', '>']) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.replace('<', "&lt;").replace('>', "&gt;"))
}

/// Escape `&`, `<`, `>`, `"` and `'` for XML text and names.
pub fn xml_field(value: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(value)
}
