//! CSV serialisation of report tables via polars

use crate::app::models::ReportTable;
use crate::{Error, Result};
use polars::prelude::{Column, CsvWriter, DataFrame, SerWriter};
use std::path::Path;
use tracing::{debug, info};

/// Convert a rendered report table into a string-typed DataFrame
pub fn report_to_frame(table: &ReportTable) -> Result<DataFrame> {
    let columns: Vec<Column> = table
        .columns
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let values: Vec<Option<&str>> = table
                .rows
                .iter()
                .map(|row| row.get(index).and_then(|cell| cell.as_deref()))
                .collect();
            Column::new(name.as_str().into(), values)
        })
        .collect();

    DataFrame::new(columns).map_err(|e| {
        Error::report_writing(format!("Failed to build report frame: {}", e))
    })
}

/// Serialise a report table as CSV: header row, no index, nulls as empty fields
pub fn to_csv_bytes(table: &ReportTable) -> Result<Vec<u8>> {
    let mut frame = report_to_frame(table)?;
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut frame)
        .map_err(|e| Error::report_writing(format!("Failed to serialise CSV: {}", e)))?;
    debug!(
        "Serialised {} rows x {} columns ({} bytes)",
        table.len(),
        table.columns.len(),
        buffer.len()
    );
    Ok(buffer)
}

/// Write a report table to a CSV file, returning the number of bytes written
///
/// Existing files are only replaced when `force` is set.
pub fn write_report(path: &Path, table: &ReportTable, force: bool) -> Result<u64> {
    if path.exists() && !force {
        return Err(Error::output_exists(path.display().to_string()));
    }

    let bytes = to_csv_bytes(table)?;
    std::fs::write(path, &bytes)
        .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;

    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(bytes.len() as u64)
}
