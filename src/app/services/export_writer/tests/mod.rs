//! Tests for export mapping and report writing

pub mod schema_mapper_tests;

use crate::app::models::{CellValue, ColumnSource, EnrichedRecord, EnrichedTable, ReportTable};
use crate::app::models::{ParsedIdentifier, Record};
use chrono::{NaiveDate, NaiveDateTime};

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Enriched table with a bag id, a seal and an added-time column
pub fn enriched_table(rows: &[(&str, Option<&str>, Option<NaiveDateTime>)]) -> EnrichedTable {
    let layout = vec![
        ("BAG ID".to_string(), ColumnSource::Base(0)),
        ("KICO SEAL NO.".to_string(), ColumnSource::Base(1)),
        ("Added Time".to_string(), ColumnSource::AddedTime),
        (
            crate::constants::EFFECTIVE_ID_COLUMN.to_string(),
            ColumnSource::EffectiveIdentifier,
        ),
    ];
    let records = rows
        .iter()
        .enumerate()
        .map(|(index, (bag, seal, added))| EnrichedRecord {
            source_index: index,
            record: Record::new(vec![
                Some(CellValue::Text(bag.to_string())),
                seal.map(|seal| CellValue::Text(seal.to_string())),
                added.map(CellValue::DateTime),
            ]),
            raw_identifier: Some(bag.to_string()),
            attributes: ParsedIdentifier::new(),
            effective_identifier: Some(bag.to_string()),
            added_time: *added,
        })
        .collect();
    EnrichedTable::new(layout, records)
}

pub fn report(columns: &[&str], rows: Vec<Vec<Option<&str>>>) -> ReportTable {
    ReportTable {
        columns: columns.iter().map(|s| s.to_string()).collect(),
        rows: rows
            .into_iter()
            .map(|row| row.into_iter().map(|cell| cell.map(str::to_string)).collect())
            .collect(),
    }
}
