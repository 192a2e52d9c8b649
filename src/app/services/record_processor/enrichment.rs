//! Record enrichment with parsed bag identifier attributes
//!
//! This module joins the parsed identifier attributes back onto each loaded
//! record, derives the effective identifier, coerces the added-time column to a
//! date-time and orders the result newest first.

use crate::app::models::{CellValue, ColumnSource, EnrichedRecord, EnrichedTable, Table};
use crate::app::services::bag_id_parser::{derive_effective_identifier, parse_bag_identifier};
use crate::app::services::column_resolver::ResolvedColumns;
use crate::config::IdentifierThresholds;
use crate::constants::{BAG_ATTRIBUTE, EFFECTIVE_ID_COLUMN};
use chrono::{NaiveDate, NaiveDateTime};
use indicatif::ProgressBar;
use std::cmp::Ordering;
use tracing::{debug, warn};

use super::stats::{DataDefect, PipelineStats};

/// Date-time layouts accepted for text added-time cells
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%b-%Y %H:%M:%S",
];

/// Date-only layouts, read as midnight
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Coerce an added-time cell to a date-time
///
/// Date cells pass through, text is tried against the known layouts and
/// anything else is treated as absent.
pub fn coerce_added_time(cell: Option<&CellValue>) -> Option<NaiveDateTime> {
    match cell? {
        CellValue::DateTime(datetime) => Some(*datetime),
        CellValue::Text(text) => parse_datetime_text(text.trim()),
        CellValue::Number(_) => None,
    }
}

/// Parse a textual date-time, returning `None` when no layout matches
pub fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Order two optional added-times newest first, absent values last
pub fn compare_added_time_desc(a: Option<&NaiveDateTime>, b: Option<&NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Enrich every record of a loaded table
///
/// Records without a bag identifier are kept with no attributes and no
/// effective identifier. The returned table is sorted by added-time
/// descending; the sort is stable so equal timestamps keep table order.
///
/// # Arguments
///
/// * `table` - Loaded table, alias-normalised
/// * `columns` - Resolved required columns
/// * `thresholds` - Identifier length thresholds
/// * `stats` - Mutable reference to pipeline statistics
/// * `progress_bar` - Optional progress bar for tracking progress
pub fn enrich_records(
    table: &Table,
    columns: &ResolvedColumns,
    thresholds: &IdentifierThresholds,
    stats: &mut PipelineStats,
    progress_bar: Option<&ProgressBar>,
) -> EnrichedTable {
    let mut records = Vec::with_capacity(table.len());
    let mut attribute_keys: Vec<String> = Vec::new();

    for (index, record) in table.rows().iter().enumerate() {
        let raw_identifier = record.text(columns.bag_id.index);
        let added_time = coerce_added_time(record.get(columns.added_time.index));
        if added_time.is_none() {
            stats.unparsed_added_times += 1;
        }

        let (attributes, effective_identifier) = match raw_identifier.as_deref() {
            Some(raw) => {
                stats.identified_records += 1;
                let attributes = parse_bag_identifier(raw);
                for key in attributes.keys() {
                    if !attribute_keys.iter().any(|known| known == key) {
                        attribute_keys.push(key.to_string());
                    }
                }

                let effective = derive_effective_identifier(
                    raw,
                    &attributes,
                    thresholds.effective_id_min_length,
                );
                if effective.is_none() {
                    let reason = format!(
                        "identifier longer than {} characters has no '{}' attribute",
                        thresholds.effective_id_min_length, BAG_ATTRIBUTE
                    );
                    warn!("Record {}: {} ('{}')", index, reason, raw);
                    stats.add_defect(DataDefect {
                        record_index: index,
                        raw_identifier: raw.to_string(),
                        reason,
                    });
                }
                (attributes, effective)
            }
            None => {
                stats.missing_identifiers += 1;
                (Default::default(), None)
            }
        };

        records.push(EnrichedRecord {
            source_index: index,
            record: record.clone(),
            raw_identifier,
            attributes,
            effective_identifier,
            added_time,
        });

        if let Some(pb) = progress_bar {
            pb.inc(1);
        }
    }

    records.sort_by(|a, b| compare_added_time_desc(a.added_time.as_ref(), b.added_time.as_ref()));

    let layout = enriched_layout(table, columns, &attribute_keys);
    debug!(
        "Enriched {} records with {} parsed attribute columns",
        records.len(),
        attribute_keys.len()
    );

    EnrichedTable::new(layout, records)
}

/// Column layout of the enriched view
///
/// Base columns first (the added-time column reads its coerced value), then
/// parsed attribute keys in first-seen order, then the effective identifier.
/// Attribute keys that repeat a base column name are not added again.
fn enriched_layout(
    table: &Table,
    columns: &ResolvedColumns,
    attribute_keys: &[String],
) -> Vec<(String, ColumnSource)> {
    let mut layout: Vec<(String, ColumnSource)> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| name.as_str() != EFFECTIVE_ID_COLUMN)
        .map(|(index, name)| {
            let source = if index == columns.added_time.index {
                ColumnSource::AddedTime
            } else {
                ColumnSource::Base(index)
            };
            (name.clone(), source)
        })
        .collect();

    for key in attribute_keys {
        if key != EFFECTIVE_ID_COLUMN && !layout.iter().any(|(name, _)| name == key) {
            layout.push((key.clone(), ColumnSource::Attribute(key.clone())));
        }
    }

    layout.push((
        EFFECTIVE_ID_COLUMN.to_string(),
        ColumnSource::EffectiveIdentifier,
    ));
    layout
}
