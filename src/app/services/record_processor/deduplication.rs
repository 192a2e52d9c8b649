//! Duplicate bag identifier detection
//!
//! Groups enriched records by effective identifier and summarises every group
//! with two or more members into one exception row. Records are visited in
//! enriched order (newest first), which is the first-seen order used for the
//! joined fields.

use crate::app::models::{EnrichedRecord, EnrichedTable, ExceptionRow, JoinedTimestamps, render_datetime};
use crate::app::services::column_resolver::ResolvedColumns;
use crate::constants::{JOIN_SEPARATOR, LOT_ATTRIBUTE};
use std::collections::HashMap;
use tracing::{debug, info};

use super::stats::PipelineStats;

/// Detect duplicate effective identifiers and summarise each group
///
/// Records without an effective identifier are never grouped. The resulting
/// rows are sorted descending by their joined added-time text.
pub fn detect_duplicates(
    enriched: &EnrichedTable,
    columns: &ResolvedColumns,
    stats: &mut PipelineStats,
) -> Vec<ExceptionRow> {
    let groups = group_by_effective_identifier(enriched.records());

    let mut exceptions: Vec<ExceptionRow> = groups
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(identifier, members)| {
            stats.duplicate_groups += 1;
            stats.duplicate_records += members.len();
            debug!(
                "Duplicate bag identifier '{}' seen {} times",
                identifier,
                members.len()
            );
            summarise_group(identifier, &members, columns)
        })
        .collect();

    exceptions.sort_by(|a, b| b.added_time.cmp(&a.added_time));

    info!(
        "Duplicate detection complete: {} duplicate groups covering {} records",
        stats.duplicate_groups, stats.duplicate_records
    );

    exceptions
}

/// Partition records by effective identifier, groups in first-seen order
pub fn group_by_effective_identifier(
    records: &[EnrichedRecord],
) -> Vec<(&str, Vec<&EnrichedRecord>)> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&EnrichedRecord>)> = Vec::new();

    for record in records {
        let Some(identifier) = record.effective_identifier.as_deref() else {
            continue;
        };
        match positions.get(identifier) {
            Some(&position) => groups[position].1.push(record),
            None => {
                positions.insert(identifier, groups.len());
                groups.push((identifier, vec![record]));
            }
        }
    }

    groups
}

/// Reduce one duplicate group to its exception row
pub fn summarise_group(
    identifier: &str,
    members: &[&EnrichedRecord],
    columns: &ResolvedColumns,
) -> ExceptionRow {
    let added_times = join_distinct(members.iter().map(|record| {
        record
            .added_time
            .as_ref()
            .map(render_datetime)
            .unwrap_or_default()
    }));
    let seal_numbers = join_distinct(members.iter().map(|record| {
        record
            .record
            .text(columns.kico_seal.index)
            .unwrap_or_default()
    }));
    let horse_registrations = join_distinct(members.iter().map(|record| {
        record
            .record
            .text(columns.horse_registration.index)
            .unwrap_or_default()
    }));
    let lot_ids = join_distinct(
        members
            .iter()
            .filter_map(|record| record.attributes.get(LOT_ATTRIBUTE))
            .map(str::to_string),
    );

    ExceptionRow {
        added_time: JoinedTimestamps(added_times),
        effective_identifier: identifier.to_string(),
        seal_numbers,
        horse_registrations,
        lot_ids,
    }
}

/// Join distinct values in first-seen order
pub fn join_distinct(values: impl IntoIterator<Item = String>) -> String {
    let mut distinct: Vec<String> = Vec::new();
    for value in values {
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }
    distinct.join(JOIN_SEPARATOR)
}

/// Analyze duplicate patterns in a collection of enriched records
///
/// # Returns
///
/// Tuple of (distinct_identifiers, duplicate_groups, records_in_duplicate_groups)
pub fn analyze_duplicate_patterns(records: &[EnrichedRecord]) -> (usize, usize, usize) {
    let groups = group_by_effective_identifier(records);
    let total_groups = groups.len();
    let duplicate_groups = groups.iter().filter(|(_, members)| members.len() >= 2);
    let (count, records_in_groups) = duplicate_groups
        .fold((0, 0), |(count, total), (_, members)| (count + 1, total + members.len()));
    (total_groups, count, records_in_groups)
}
