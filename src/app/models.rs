//! Core data structures for port receiving supervision records
//!
//! Defines the loaded table, the enriched view produced by the record processor,
//! the two exception report rows, the time window and the fixed-schema export.
//! All of these are value objects: each pipeline stage derives new values from
//! the previous stage and nothing is mutated across stages.

use crate::constants::{DATETIME_RENDER_FORMAT, EXPORT_FILE_SUFFIX};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single typed cell value; untyped or empty cells are represented as `None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Render the value the way it appears in reports and joined fields
    pub fn render(&self) -> String {
        match self {
            CellValue::Text(text) => text.clone(),
            CellValue::Number(number) => render_number(*number),
            CellValue::DateTime(datetime) => render_datetime(datetime),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Render a number without a trailing `.0` when it is integral
pub fn render_number(number: f64) -> String {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// Render a date-time in the report format
pub fn render_datetime(datetime: &NaiveDateTime) -> String {
    datetime.format(DATETIME_RENDER_FORMAT).to_string()
}

/// One row of the source table, positionally aligned with [`Table::columns`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    cells: Vec<Option<CellValue>>,
}

impl Record {
    pub fn new(cells: Vec<Option<CellValue>>) -> Self {
        Self { cells }
    }

    /// Get the cell at a column index; out-of-range and empty cells are `None`
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index).and_then(|cell| cell.as_ref())
    }

    /// Rendered text of the cell at a column index
    pub fn text(&self, index: usize) -> Option<String> {
        self.get(index).map(CellValue::render)
    }

    pub fn cells(&self) -> &[Option<CellValue>] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    fn pad_to(&mut self, width: usize) {
        self.cells.resize(width, None);
    }
}

/// A loaded table: ordered column names and the rows beneath them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    /// Create a table, padding short rows and rejecting rows wider than the header
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Result<Self> {
        let width = columns.len();
        let mut padded = Vec::with_capacity(rows.len());

        for (index, mut row) in rows.into_iter().enumerate() {
            if row.cells.len() > width {
                let extra = &row.cells[width..];
                if extra.iter().any(Option::is_some) {
                    return Err(Error::data_validation(format!(
                        "Row {} has {} cells but the header has {} columns",
                        index + 1,
                        row.cells.len(),
                        width
                    )));
                }
                row.cells.truncate(width);
            }
            row.pad_to(width);
            padded.push(row);
        }

        Ok(Self {
            columns,
            rows: padded,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Rename a column, returning the renamed table
    pub fn with_renamed_column(mut self, from: &str, to: &str) -> Self {
        if let Some(index) = self.column_index(from) {
            self.columns[index] = to.to_string();
        }
        self
    }
}

/// Attributes parsed out of one raw bag identifier, in first-inserted order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedIdentifier {
    entries: Vec<(String, String)>,
}

impl ParsedIdentifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, overwriting the value of an existing key in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Merge another mapping over this one; the other mapping wins on collision
    pub fn merge(mut self, other: ParsedIdentifier) -> Self {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A source record widened with its parsed identifier and effective identifier
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    /// Position of the record in the loaded table
    pub source_index: usize,
    pub record: Record,
    /// Rendered raw bag identifier, absent when the cell is empty
    pub raw_identifier: Option<String>,
    pub attributes: ParsedIdentifier,
    pub effective_identifier: Option<String>,
    /// Added-time coerced to a date-time; unparseable values are absent
    pub added_time: Option<NaiveDateTime>,
}

impl EnrichedRecord {
    /// Character length of the raw identifier
    pub fn raw_identifier_length(&self) -> Option<usize> {
        self.raw_identifier
            .as_deref()
            .map(|identifier| identifier.chars().count())
    }
}

/// Where a column of the enriched view takes its values from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    /// A column of the loaded table, by index
    Base(usize),
    /// The coerced added-time column
    AddedTime,
    /// A parsed identifier attribute, by key
    Attribute(String),
    /// The derived effective identifier
    EffectiveIdentifier,
}

/// The enriched record set together with its column layout
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTable {
    columns: Vec<(String, ColumnSource)>,
    records: Vec<EnrichedRecord>,
}

impl EnrichedTable {
    pub fn new(columns: Vec<(String, ColumnSource)>, records: Vec<EnrichedRecord>) -> Self {
        Self { columns, records }
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(column, _)| column == name)
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep only the records matching a predicate, preserving the column layout
    pub fn filtered<F>(&self, predicate: F) -> Self
    where
        F: Fn(&EnrichedRecord) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            records: self
                .records
                .iter()
                .filter(|record| predicate(record))
                .cloned()
                .collect(),
        }
    }

    /// Rendered value of a named column for one record
    pub fn value(&self, record: &EnrichedRecord, column: &str) -> Option<String> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, source)| Self::render_source(record, source))
    }

    fn render_source(record: &EnrichedRecord, source: &ColumnSource) -> Option<String> {
        match source {
            ColumnSource::Base(index) => record.record.text(*index),
            ColumnSource::AddedTime => record.added_time.as_ref().map(render_datetime),
            ColumnSource::Attribute(key) => record.attributes.get(key).map(str::to_string),
            ColumnSource::EffectiveIdentifier => record.effective_identifier.clone(),
        }
    }

    /// Render the whole enriched view as a report table
    pub fn to_report(&self) -> ReportTable {
        let rows = self
            .records
            .iter()
            .map(|record| {
                self.columns
                    .iter()
                    .map(|(_, source)| Self::render_source(record, source))
                    .collect()
            })
            .collect();

        ReportTable {
            columns: self.columns.iter().map(|(name, _)| name.clone()).collect(),
            rows,
        }
    }
}

/// Comma-joined distinct added-times of a duplicate group
///
/// Kept as a string on purpose: exception rows are ordered by this text, not
/// chronologically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct JoinedTimestamps(pub String);

impl JoinedTimestamps {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinedTimestamps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One summarised duplicate group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionRow {
    pub added_time: JoinedTimestamps,
    pub effective_identifier: String,
    pub seal_numbers: String,
    pub horse_registrations: String,
    pub lot_ids: String,
}

impl ExceptionRow {
    fn cells(&self) -> Vec<Option<String>> {
        vec![
            Some(self.added_time.0.clone()),
            Some(self.effective_identifier.clone()),
            Some(self.seal_numbers.clone()),
            Some(self.horse_registrations.clone()),
            Some(self.lot_ids.clone()),
        ]
    }
}

/// A record whose raw identifier length falls in the suspicious band
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlaggedRow {
    pub added_time: Option<NaiveDateTime>,
    pub raw_identifier: String,
    pub seal_number: Option<String>,
}

impl FlaggedRow {
    fn cells(&self) -> Vec<Option<String>> {
        vec![
            self.added_time.as_ref().map(render_datetime),
            Some(self.raw_identifier.clone()),
            self.seal_number.clone(),
        ]
    }
}

/// One row of the PRN export, aligned with [`ExportTable::fields`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub values: Vec<Option<String>>,
}

/// The fixed-schema export table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub fields: Vec<String>,
    pub rows: Vec<ExportRow>,
}

impl ExportTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of a target field in one row
    pub fn value(&self, row: usize, field: &str) -> Option<&str> {
        let index = self.fields.iter().position(|name| name == field)?;
        self.rows.get(row)?.values.get(index)?.as_deref()
    }

    pub fn to_report(&self) -> ReportTable {
        ReportTable {
            columns: self.fields.clone(),
            rows: self.rows.iter().map(|row| row.values.clone()).collect(),
        }
    }
}

/// A rendered table of optional strings ready to be written out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl ReportTable {
    /// Build the duplicate exception report
    pub fn from_exceptions(rows: &[ExceptionRow]) -> Self {
        use crate::constants::duplicate_columns;
        Self {
            columns: duplicate_columns::ALL.iter().map(|s| s.to_string()).collect(),
            rows: rows.iter().map(ExceptionRow::cells).collect(),
        }
    }

    /// Build the flagged bag id report
    pub fn from_flagged(rows: &[FlaggedRow]) -> Self {
        use crate::constants::flagged_columns;
        Self {
            columns: flagged_columns::ALL.iter().map(|s| s.to_string()).collect(),
            rows: rows.iter().map(FlaggedRow::cells).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of a named column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let index = self.columns.iter().position(|column| column == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).and_then(|cell| cell.as_deref()))
                .collect(),
        )
    }
}

/// Inclusive `[start, end]` interval used to select records for export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Combine calendar dates and wall-clock times into one window
    pub fn from_parts(
        start_date: NaiveDate,
        start_time: NaiveTime,
        end_date: NaiveDate,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            start: start_date.and_time(start_time),
            end: end_date.and_time(end_time),
        }
    }

    /// Whether an instant lies within the window, both bounds inclusive
    pub fn contains(&self, instant: &NaiveDateTime) -> bool {
        self.start <= *instant && *instant <= self.end
    }

    /// A window whose start is after its end selects nothing
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Suggested export file name encoding the window bounds
    pub fn export_file_name(&self) -> String {
        format!(
            "From_{}_to_{}_{}",
            self.start.format("%Y%m%d_%H%M"),
            self.end.format("%Y%m%d_%H%M"),
            EXPORT_FILE_SUFFIX
        )
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            render_datetime(&self.start),
            render_datetime(&self.end)
        )
    }
}
