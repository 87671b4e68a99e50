//! CSV input for the CLI.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tabex_export::MemoryTable;
use tabex_model::Row;
use tracing::debug;

/// Read every line of a CSV file as a row. Rows may differ in length; shape
/// is checked later, where it can be reported per row.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|record| record.iter().map(str::to_string).collect())
                .with_context(|| format!("read {}", path.display()))
        })
        .collect::<Result<Vec<Row>>>()?;
    debug!(path = %path.display(), rows = rows.len(), "csv loaded");
    Ok(rows)
}

/// Load a CSV file as a memory table; the first line names the columns.
pub fn load_table(path: &Path) -> Result<MemoryTable> {
    let mut rows = read_rows(path)?.into_iter();
    let Some(columns) = rows.next() else {
        bail!("{} is empty; expected a header line", path.display());
    };
    let mut table = MemoryTable::new(columns);
    for row in rows {
        table.push_row(row);
    }
    Ok(table)
}

/// The entity and table name for a CSV file: its file stem.
pub fn entity_name(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(OsStr::to_str)
        .map(str::to_string)
        .with_context(|| format!("cannot derive an entity name from {}", path.display()))
}
