//! Main RecordProcessor struct and pipeline orchestration

use crate::app::models::{EnrichedTable, ExceptionRow, ExportTable, FlaggedRow, Table, TimeWindow};
use crate::app::services::column_resolver::{ResolvedColumns, normalize_offload_alias};
use crate::app::services::export_writer::ExportSchema;
use crate::config::{Config, IdentifierThresholds};
use crate::constants::{EXPORT_COLUMN_MAPPING, EXPORT_FILE_SUFFIX, TIMEZONE_SUFFIX_FIELDS};
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use super::anomaly::flag_suspicious_identifiers;
use super::deduplication::{analyze_duplicate_patterns, detect_duplicates};
use super::enrichment::enrich_records;
use super::stats::PipelineStats;
use super::time_window::{WindowBounds, filter_by_window};

/// Everything one invocation produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub columns: ResolvedColumns,
    pub enriched: EnrichedTable,
    pub duplicates: Vec<ExceptionRow>,
    pub flagged: Vec<FlaggedRow>,
    /// Resolved export window; `None` when it could not be defaulted from data
    pub window: Option<TimeWindow>,
    pub export: ExportTable,
    pub stats: PipelineStats,
}

impl PipelineOutput {
    /// File name for the export, encoding the window when there is one
    pub fn export_file_name(&self) -> String {
        match &self.window {
            Some(window) => window.export_file_name(),
            None => EXPORT_FILE_SUFFIX.to_string(),
        }
    }
}

/// Runs the record pipeline over one loaded table
#[derive(Debug, Clone)]
pub struct RecordProcessor {
    thresholds: IdentifierThresholds,
    export_schema: ExportSchema,
    show_progress: bool,
}

impl RecordProcessor {
    /// Create a processor with explicit thresholds and export schema
    pub fn new(thresholds: IdentifierThresholds, export_schema: ExportSchema) -> Self {
        Self {
            thresholds,
            export_schema,
            show_progress: false,
        }
    }

    /// Create a processor from the layered configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.thresholds,
            ExportSchema::new(
                EXPORT_COLUMN_MAPPING,
                TIMEZONE_SUFFIX_FIELDS,
                &config.export.timezone_suffix,
            ),
        )
    }

    /// Show a progress bar during enrichment
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Resolve the required columns of a table without processing it
    pub fn resolve_columns(&self, table: &Table) -> Result<ResolvedColumns> {
        ResolvedColumns::resolve(table.columns())
    }

    /// Run the full pipeline
    ///
    /// Column resolution is a hard gate: when any required label is missing the
    /// call fails before anything else is computed.
    pub fn process(&self, table: Table, bounds: &WindowBounds) -> Result<PipelineOutput> {
        let table = normalize_offload_alias(table);
        let columns = self.resolve_columns(&table)?;
        info!(
            "Processing {} records ({} columns)",
            table.len(),
            table.columns().len()
        );

        let mut stats = PipelineStats::new();
        stats.total_records = table.len();

        // Stage 1: enrichment
        let progress_bar = self.show_progress.then(|| create_progress_bar(table.len() as u64));
        let enriched = enrich_records(
            &table,
            &columns,
            &self.thresholds,
            &mut stats,
            progress_bar.as_ref(),
        );
        if let Some(pb) = &progress_bar {
            pb.finish_and_clear();
        }
        if stats.defect_count() > 0 {
            warn!(
                "{} records have no effective bag identifier and are excluded from duplicate detection",
                stats.defect_count()
            );
        }

        // Stage 2: exception reports
        let (distinct, duplicate_groups, _) = analyze_duplicate_patterns(enriched.records());
        debug!(
            "{} distinct effective identifiers, {} duplicated",
            distinct, duplicate_groups
        );
        let duplicates = detect_duplicates(&enriched, &columns, &mut stats);
        let flagged = flag_suspicious_identifiers(&enriched, &columns, &self.thresholds, &mut stats);

        // Stage 3: time window and export
        let window = bounds.resolve(&enriched);
        let export = match &window {
            Some(window) => {
                let selected = filter_by_window(&enriched, window, &mut stats);
                self.export_schema.map(&selected)
            }
            None => {
                warn!("No added-time values to default the time window from; export is empty");
                self.export_schema.map(&enriched.filtered(|_| false))
            }
        };
        stats.exported_rows = export.len();

        info!("{}", stats.summary());

        Ok(PipelineOutput {
            columns,
            enriched,
            duplicates,
            flagged,
            window,
            export,
            stats,
        })
    }
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message("Enriching records");
    pb
}
