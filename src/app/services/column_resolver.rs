//! Logical column resolution for supervision exports
//!
//! Export headers drift between versions of the supervision form (casing,
//! prefixes, trailing notes), so required columns are located by a
//! case-insensitive substring match against a short logical label. The result
//! is resolved once per invocation and passed to every downstream stage.

use crate::app::models::Table;
use crate::constants::{OFFLOAD_DATE_ALIAS, OFFLOAD_DATE_COLUMN, labels};
use crate::{Error, Result};
use serde::Serialize;
use tracing::{debug, info};

/// One resolved logical column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    /// Logical label that was searched for
    pub label: &'static str,
    /// Actual header name in the table
    pub name: String,
    /// Position of the column in the table
    pub index: usize,
}

/// Immutable set of resolved required columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumns {
    pub bag_id: ResolvedColumn,
    pub horse_registration: ResolvedColumn,
    pub kico_seal: ResolvedColumn,
    pub added_time: ResolvedColumn,
}

impl ResolvedColumns {
    /// Resolve all required labels, failing with every label that did not match
    pub fn resolve(columns: &[String]) -> Result<Self> {
        let mut missing = Vec::new();
        let mut lookup = |label: &'static str| {
            let found = find_column(columns, label).map(|index| ResolvedColumn {
                label,
                name: columns[index].clone(),
                index,
            });
            if found.is_none() {
                missing.push(label.to_string());
            }
            found
        };

        let bag_id = lookup(labels::BAG_ID);
        let horse_registration = lookup(labels::HORSE_REGISTRATION);
        let kico_seal = lookup(labels::KICO_SEAL);
        let added_time = lookup(labels::ADDED_TIME);

        match (bag_id, horse_registration, kico_seal, added_time) {
            (Some(bag_id), Some(horse_registration), Some(kico_seal), Some(added_time)) => {
                let resolved = Self {
                    bag_id,
                    horse_registration,
                    kico_seal,
                    added_time,
                };
                debug!("Resolved columns: {:?}", resolved);
                Ok(resolved)
            }
            _ => Err(Error::schema_resolution(missing)),
        }
    }

    /// Iterate the resolved columns in label order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedColumn> {
        [
            &self.bag_id,
            &self.horse_registration,
            &self.kico_seal,
            &self.added_time,
        ]
        .into_iter()
    }
}

/// First column whose lowercased name contains the label, in declared order
pub fn find_column(columns: &[String], label: &str) -> Option<usize> {
    let label = label.to_lowercase();
    columns
        .iter()
        .position(|column| column.to_lowercase().contains(&label))
}

/// Rename the legacy offload date header to its canonical name
///
/// Left untouched when the canonical column is already present, so the table
/// never ends up with two columns of the same name.
pub fn normalize_offload_alias(table: Table) -> Table {
    if table.has_column(OFFLOAD_DATE_ALIAS) && !table.has_column(OFFLOAD_DATE_COLUMN) {
        info!(
            "Normalising column '{}' to '{}'",
            OFFLOAD_DATE_ALIAS, OFFLOAD_DATE_COLUMN
        );
        table.with_renamed_column(OFFLOAD_DATE_ALIAS, OFFLOAD_DATE_COLUMN)
    } else {
        table
    }
}
