//! Time window selection for the export
//!
//! The caller supplies up to four parts (start date, start time, end date, end
//! time). Missing dates default to the earliest and latest added-time dates in
//! the data, missing times to the start and end of the day.

use crate::app::models::{EnrichedTable, TimeWindow};
use crate::constants::{DEFAULT_WINDOW_END, DEFAULT_WINDOW_START};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::stats::PipelineStats;

/// Caller-supplied window parts; any part may be left to its default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WindowBounds {
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
}

impl WindowBounds {
    /// Resolve the window against the enriched data
    ///
    /// Returns `None` only when a date is missing and the data has no
    /// parseable added-time to default it from.
    pub fn resolve(&self, enriched: &EnrichedTable) -> Option<TimeWindow> {
        let (earliest, latest) = added_date_range(enriched).unzip();

        let start_date = self.start_date.or(earliest)?;
        let end_date = self.end_date.or(latest)?;
        let start_time = self.start_time.unwrap_or_else(|| default_time(DEFAULT_WINDOW_START));
        let end_time = self.end_time.unwrap_or_else(|| default_time(DEFAULT_WINDOW_END));

        let window = TimeWindow::from_parts(start_date, start_time, end_date, end_time);
        debug!("Resolved time window {} from {:?}", window, self);
        Some(window)
    }
}

fn default_time((hour, minute): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// Earliest and latest added-time dates present in the data
pub fn added_date_range(enriched: &EnrichedTable) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = enriched
        .records()
        .iter()
        .filter_map(|record| record.added_time.map(|time| time.date()));
    let first = dates.next()?;
    Some(dates.fold((first, first), |(min, max), date| {
        (min.min(date), max.max(date))
    }))
}

/// Keep the records whose added-time lies in the window, both ends inclusive
///
/// An inverted window yields an empty result. Records without an added-time
/// are never selected.
pub fn filter_by_window(
    enriched: &EnrichedTable,
    window: &TimeWindow,
    stats: &mut PipelineStats,
) -> EnrichedTable {
    if window.is_empty() {
        warn!("Time window {} is inverted; no records selected", window);
    }

    let filtered = enriched.filtered(|record| {
        record
            .added_time
            .as_ref()
            .is_some_and(|time| window.contains(time))
    });
    stats.records_in_window = filtered.len();

    info!(
        "Time window {} selected {} of {} records",
        window,
        filtered.len(),
        enriched.len()
    );

    filtered
}
