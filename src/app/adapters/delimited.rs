//! Delimited (CSV) supervision export loader
//!
//! Reads a CSV export into a [`Table`]. Every non-empty field is kept as text;
//! the added-time column is coerced later by the record processor.

use crate::app::models::{CellValue, Record, Table};
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Load a CSV export whose header sits after `header_row` physical rows
///
/// Rows above the header are skipped, blank rows below it are dropped and
/// ragged rows are padded to the header width.
pub fn load_delimited(path: &Path, header_row: usize) -> Result<Table> {
    let file = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::load(&file, e.to_string()))?;

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| Error::load(&file, e.to_string()))?;
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    let mut rows = raw_rows.into_iter().skip(header_row);
    let header = rows.next().ok_or_else(|| {
        Error::load(
            &file,
            format!("no header row found after skipping {} rows", header_row),
        )
    })?;
    let columns = clean_headers(header.iter().map(|name| Some(name.as_str())));

    let records: Vec<Record> = rows
        .map(|fields| {
            Record::new(
                fields
                    .into_iter()
                    .map(|field| (!field.is_empty()).then(|| CellValue::Text(field)))
                    .collect(),
            )
        })
        .filter(|record| !record.is_empty())
        .collect();

    debug!("Header of {}: {:?}", file, columns);
    info!(
        "Loaded {} records with {} columns from {}",
        records.len(),
        columns.len(),
        file
    );

    Table::new(columns, records).map_err(|e| Error::load(&file, e.to_string()))
}

/// Normalise a raw header row
///
/// Names are trimmed, blank names become `Unnamed: <position>` and repeated
/// names get a `.1`, `.2`, ... suffix in order of appearance.
pub fn clean_headers<'a>(raw: impl IntoIterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for (index, name) in raw.into_iter().enumerate() {
        let base = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Unnamed: {}", index),
        };

        let mut candidate = base.clone();
        let mut counter = 1;
        while columns.contains(&candidate) {
            candidate = format!("{}.{}", base, counter);
            counter += 1;
        }
        columns.push(candidate);
    }
    columns
}
