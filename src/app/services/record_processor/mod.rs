//! Record processing module for port receiving supervision records
//!
//! This module provides the pipeline that runs after a table has been loaded.
//!
//! # Architecture
//!
//! - [`processor`] - Main RecordProcessor struct and pipeline orchestration
//! - [`enrichment`] - Identifier parsing joined back onto records, added-time coercion
//! - [`deduplication`] - Duplicate effective identifier grouping and summaries
//! - [`anomaly`] - Suspicious identifier length flagging
//! - [`time_window`] - Export window resolution and filtering
//! - [`stats`] - Pipeline statistics and data defects
//!
//! # Processing Pipeline
//!
//! 1. **Column Resolution**: Locate the required columns; missing labels abort the run
//! 2. **Enrichment**: Parse identifiers, derive effective identifiers, sort newest first
//! 3. **Exception Reports**: Duplicate groups and flagged identifiers, independently
//! 4. **Export**: Restrict to the time window and map into the PRN schema
//!
//! # Example Usage
//!
//! ```rust
//! use port_receiving::app::models::{CellValue, Record, Table};
//! use port_receiving::app::services::record_processor::{RecordProcessor, WindowBounds};
//! use port_receiving::config::Config;
//!
//! # fn example() -> port_receiving::Result<()> {
//! let text = |s: &str| Some(CellValue::Text(s.to_string()));
//! let table = Table::new(
//!     vec!["BAG ID".into(), "RECEIVING HORSE REGISTRATION".into(), "KICO SEAL NO.".into(), "Added Time".into()],
//!     vec![Record::new(vec![text("BAG001"), text("HR1"), text("S1"), text("2024-01-01 10:00:00")])],
//! )?;
//!
//! let output = RecordProcessor::from_config(&Config::default())
//!     .process(table, &WindowBounds::default())?;
//! assert_eq!(output.export.len(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod anomaly;
pub mod deduplication;
pub mod enrichment;
pub mod processor;
pub mod stats;
pub mod time_window;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use processor::{PipelineOutput, RecordProcessor};
pub use stats::{DataDefect, PipelineStats};
pub use time_window::WindowBounds;

// Re-export utility functions that might be useful externally
pub use deduplication::{analyze_duplicate_patterns, join_distinct};
pub use enrichment::{coerce_added_time, parse_datetime_text};
