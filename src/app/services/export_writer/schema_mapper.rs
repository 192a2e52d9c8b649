//! PRN export schema mapping
//!
//! Renames the fixed set of source columns to PRN target fields, defaults
//! missing sources to null, annotates date/time fields with the fixed offset
//! suffix and emits exactly the target fields in target order.

use crate::app::models::{EnrichedTable, ExportRow, ExportTable};
use tracing::{debug, warn};

/// Ordered source -> target mapping plus the fields that carry a timezone suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSchema {
    pub mapping: Vec<(String, String)>,
    pub timezone_fields: Vec<String>,
    pub timezone_suffix: String,
}

impl ExportSchema {
    pub fn new(mapping: &[(&str, &str)], timezone_fields: &[&str], timezone_suffix: &str) -> Self {
        Self {
            mapping: mapping
                .iter()
                .map(|(source, target)| (source.to_string(), target.to_string()))
                .collect(),
            timezone_fields: timezone_fields.iter().map(|s| s.to_string()).collect(),
            timezone_suffix: timezone_suffix.to_string(),
        }
    }

    /// Target field names in output order
    pub fn fields(&self) -> Vec<String> {
        self.mapping.iter().map(|(_, target)| target.clone()).collect()
    }

    fn carries_suffix(&self, target: &str) -> bool {
        self.timezone_fields.iter().any(|field| field == target)
    }

    /// Map the windowed records into the export table
    pub fn map(&self, records: &EnrichedTable) -> ExportTable {
        let present: Vec<bool> = self
            .mapping
            .iter()
            .map(|(source, target)| {
                let exists = records.has_column(source);
                if !exists {
                    warn!(
                        "Source column '{}' not present; '{}' exported as empty",
                        source, target
                    );
                }
                exists
            })
            .collect();

        let rows = records
            .records()
            .iter()
            .map(|record| ExportRow {
                values: self
                    .mapping
                    .iter()
                    .zip(&present)
                    .map(|((source, target), &exists)| {
                        if !exists {
                            return None;
                        }
                        let value = records.value(record, source)?;
                        if self.carries_suffix(target) {
                            Some(format!("{}{}", value, self.timezone_suffix))
                        } else {
                            Some(value)
                        }
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();

        debug!("Mapped {} records into the export schema", rows.len());

        ExportTable {
            fields: self.fields(),
            rows,
        }
    }
}
