//! Structurally suspicious bag identifier flagging
//!
//! A legitimate identifier is either a short bare bag number or a long
//! structured string. Raw identifiers whose length falls in the band between
//! the two are usually truncated scans or mistyped entries, so they are
//! reported whether or not they also appear in a duplicate group.

use crate::app::models::{EnrichedTable, FlaggedRow};
use crate::app::services::column_resolver::ResolvedColumns;
use crate::config::IdentifierThresholds;
use tracing::info;

use super::enrichment::compare_added_time_desc;
use super::stats::PipelineStats;

/// Project every record in the flagging band, newest first
pub fn flag_suspicious_identifiers(
    enriched: &EnrichedTable,
    columns: &ResolvedColumns,
    thresholds: &IdentifierThresholds,
    stats: &mut PipelineStats,
) -> Vec<FlaggedRow> {
    let mut flagged: Vec<FlaggedRow> = enriched
        .records()
        .iter()
        .filter(|record| {
            record
                .raw_identifier_length()
                .is_some_and(|length| thresholds.is_flagged_length(length))
        })
        .filter_map(|record| {
            Some(FlaggedRow {
                added_time: record.added_time,
                raw_identifier: record.raw_identifier.clone()?,
                seal_number: record.record.text(columns.kico_seal.index),
            })
        })
        .collect();

    flagged.sort_by(|a, b| compare_added_time_desc(a.added_time.as_ref(), b.added_time.as_ref()));
    stats.flagged_records = flagged.len();

    info!(
        "Flagged {} bag identifiers with length {}-{}",
        flagged.len(),
        thresholds.flag_min_length,
        thresholds.flag_max_length
    );

    flagged
}
