//! Pipeline statistics and non-fatal data defects
//!
//! This module provides types for tracking what each stage of one invocation
//! did, including the records whose identifiers could not yield a key.

use serde::Serialize;

/// A record whose identifier is structurally long but carries no `Bag` attribute
///
/// Such records stay in the enriched table with no effective identifier and are
/// left out of duplicate grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataDefect {
    /// Zero-based data row in the loaded table
    pub record_index: usize,
    pub raw_identifier: String,
    pub reason: String,
}

/// Statistics for one pipeline invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Records in the loaded table
    pub total_records: usize,
    /// Records carrying a raw bag identifier
    pub identified_records: usize,
    /// Records with an empty bag identifier cell
    pub missing_identifiers: usize,
    /// Records whose added-time could not be read as a date-time
    pub unparsed_added_times: usize,
    /// Distinct effective identifiers seen more than once
    pub duplicate_groups: usize,
    /// Records belonging to a duplicate group
    pub duplicate_records: usize,
    /// Records in the suspicious identifier length band
    pub flagged_records: usize,
    /// Records inside the export time window
    pub records_in_window: usize,
    /// Rows in the export table
    pub exported_rows: usize,
    /// Non-fatal identifier defects
    pub data_defects: Vec<DataDefect>,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a data defect
    pub fn add_defect(&mut self, defect: DataDefect) {
        self.data_defects.push(defect);
    }

    pub fn defect_count(&self) -> usize {
        self.data_defects.len()
    }

    /// Percentage of records with an identifier that produced an effective key
    pub fn keyed_rate(&self) -> f64 {
        if self.identified_records == 0 {
            0.0
        } else {
            let keyed = self.identified_records - self.defect_count();
            (keyed as f64 / self.identified_records as f64) * 100.0
        }
    }

    /// Get summary of pipeline statistics
    pub fn summary(&self) -> String {
        format!(
            "Pipeline Summary: {} records ({} without bag id) | Keyed: {:.1}% | \
             Duplicate groups: {} ({} records) | Flagged: {} | \
             In window: {} | Exported: {} | Defects: {}",
            self.total_records,
            self.missing_identifiers,
            self.keyed_rate(),
            self.duplicate_groups,
            self.duplicate_records,
            self.flagged_records,
            self.records_in_window,
            self.exported_rows,
            self.defect_count()
        )
    }
}
