//! Spreadsheet workbook loader
//!
//! The supervision system exports an `.xlsx` workbook whose `RawData` sheet
//! starts with a title row above the real header. Cells keep their type:
//! numbers stay numbers and Excel dates become date-times.

use crate::app::models::{CellValue, Record, Table};
use crate::constants::WORKBOOK_EXTENSIONS;
use crate::{Error, Result};
use calamine::{Data, DataType, Reader, open_workbook_auto};
use std::path::Path;
use tracing::{debug, info, warn};

use super::delimited::{clean_headers, load_delimited};

/// Load one sheet of a workbook
///
/// `header_row` counts physical sheet rows, so leading blank rows that the
/// workbook does not store still count towards the skip.
pub fn load_workbook(path: &Path, sheet: &str, header_row: usize) -> Result<Table> {
    let file = path.display().to_string();
    let mut workbook = open_workbook_auto(path).map_err(|e| Error::load(&file, e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    if !sheet_names.iter().any(|name| name == sheet) {
        return Err(Error::load(
            &file,
            format!(
                "sheet '{}' not found (available: {})",
                sheet,
                sheet_names.join(", ")
            ),
        ));
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| Error::load(&file, format!("failed to read sheet '{}': {}", sheet, e)))?;

    // The range starts at the first stored cell, not at A1
    let (first_row, first_col) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));
    let skip = header_row.saturating_sub(first_row);
    if first_row > header_row {
        warn!(
            "Sheet '{}' has no data before row {}; using its first stored row as header",
            sheet,
            first_row + 1
        );
    }

    let mut rows = range.rows().skip(skip);
    let header = rows.next().ok_or_else(|| {
        Error::load(
            &file,
            format!("sheet '{}' has no header row after row {}", sheet, header_row),
        )
    })?;

    let header_cells: Vec<Option<String>> = std::iter::repeat_n(None, first_col)
        .chain(header.iter().map(header_text))
        .collect();
    let columns = clean_headers(header_cells.iter().map(Option::as_deref));

    let records: Vec<Record> = rows
        .map(|cells| {
            Record::new(
                std::iter::repeat_n(None, first_col)
                    .chain(cells.iter().map(cell_value))
                    .collect(),
            )
        })
        .filter(|record| !record.is_empty())
        .collect();

    debug!("Header of {} [{}]: {:?}", file, sheet, columns);
    info!(
        "Loaded {} records with {} columns from {} [{}]",
        records.len(),
        columns.len(),
        file,
        sheet
    );

    Table::new(columns, records).map_err(|e| Error::load(&file, e.to_string()))
}

/// Load an input file, picking the loader from its extension
///
/// Workbook extensions go through [`load_workbook`]; anything else is read as
/// CSV and `sheet` is ignored.
pub fn load_table(path: &Path, sheet: &str, header_row: usize) -> Result<Table> {
    if is_workbook(path) {
        load_workbook(path, sheet, header_row)
    } else {
        debug!("Reading {} as delimited text", path.display());
        load_delimited(path, header_row)
    }
}

/// Whether a path has a spreadsheet extension
pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Map a workbook cell to a typed cell value
pub fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(text) if text.is_empty() => None,
        Data::String(text) => Some(CellValue::Text(text.clone())),
        Data::Float(number) => Some(CellValue::Number(*number)),
        Data::Int(number) => Some(CellValue::Number(*number as f64)),
        Data::Bool(flag) => Some(CellValue::Text(flag.to_string())),
        other => other
            .as_datetime()
            .map(CellValue::DateTime)
            .or_else(|| other.as_string().map(CellValue::Text)),
    }
}

fn header_text(cell: &Data) -> Option<String> {
    cell_value(cell).map(|value| value.render())
}
