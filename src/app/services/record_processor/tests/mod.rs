//! Tests for the record processing pipeline
//!
//! Shared fixtures build small supervision tables in memory.

pub mod anomaly_tests;

use crate::app::models::{CellValue, EnrichedTable, Record, Table};
use crate::app::services::column_resolver::ResolvedColumns;
use crate::config::IdentifierThresholds;
use chrono::{NaiveDate, NaiveDateTime};

use super::enrichment::enrich_records;
use super::stats::PipelineStats;

/// Header of the minimal four-column export
pub const MINIMAL_HEADERS: &[&str] = &[
    "BAG ID",
    "RECEIVING HORSE REGISTRATION",
    "KICO SEAL NO.",
    "Added Time",
];

/// Header of a full supervision export (legacy offload date spelling)
pub const FULL_HEADERS: &[&str] = &[
    "ID",
    "BAG ID",
    "RECEIVING HORSE REGISTRATION",
    "KICO SEAL NO.",
    "MMS SEAL NO",
    "BAG OFFLOADING DATE",
    "RECORD BAG CONDITION",
    "RECEIVING WAREHOUSE",
    "Added Email ID",
    "Added Time",
];

pub fn text(value: &str) -> Option<CellValue> {
    Some(CellValue::Text(value.to_string()))
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// A minimal-table row; `None` leaves the cell empty
pub fn row(
    bag_id: Option<&str>,
    horse: &str,
    seal: &str,
    added_time: Option<NaiveDateTime>,
) -> Record {
    Record::new(vec![
        bag_id.and_then(text),
        text(horse),
        text(seal),
        added_time.map(CellValue::DateTime),
    ])
}

pub fn minimal_table(rows: Vec<Record>) -> Table {
    Table::new(
        MINIMAL_HEADERS.iter().map(|s| s.to_string()).collect(),
        rows,
    )
    .unwrap()
}

/// A full-table row with every optional column populated
pub fn full_row(id: u32, bag_id: &str, seal: &str, added_time: NaiveDateTime) -> Record {
    Record::new(vec![
        Some(CellValue::Number(id as f64)),
        text(bag_id),
        text("HR-100"),
        text(seal),
        Some(CellValue::Number(5500.0 + id as f64)),
        Some(CellValue::DateTime(added_time - chrono::Duration::hours(1))),
        text("GOOD"),
        text("WH-NORTH"),
        text("supervisor@example.com"),
        Some(CellValue::DateTime(added_time)),
    ])
}

pub fn full_table(rows: Vec<Record>) -> Table {
    Table::new(FULL_HEADERS.iter().map(|s| s.to_string()).collect(), rows).unwrap()
}

/// Resolve and enrich a table with default thresholds
pub fn enrich(table: &Table) -> (EnrichedTable, ResolvedColumns, PipelineStats) {
    let columns = ResolvedColumns::resolve(table.columns()).unwrap();
    let mut stats = PipelineStats::new();
    let enriched = enrich_records(
        table,
        &columns,
        &IdentifierThresholds::default(),
        &mut stats,
        None,
    );
    (enriched, columns, stats)
}
