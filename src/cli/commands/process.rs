//! Process command implementation
//!
//! Loads the input, runs the record pipeline and writes the enriched table,
//! both exception reports and the PRN export into the output directory.

use super::shared::{RunStats, load_configuration, load_input, setup_logging};
use crate::app::models::ReportTable;
use crate::app::services::export_writer::{to_csv_bytes, write_report};
use crate::app::services::record_processor::{PipelineOutput, RecordProcessor};
use crate::cli::args::{OutputFormat, ProcessArgs};
use crate::constants::{DUPLICATES_FILE_NAME, ENRICHED_FILE_NAME, FLAGGED_FILE_NAME};
use crate::{Error, Result};
use colored::*;
use indicatif::HumanDuration;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Process command runner
///
/// 1. Set up logging and configuration
/// 2. Load the input table and run the pipeline
/// 3. Write the four CSV outputs (or report them on a dry run)
/// 4. Print the final report
pub fn run_process(args: &ProcessArgs) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(&args.input)?;
    info!("Starting port receiving pipeline");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_configuration(&args.input)?;
    debug!("Loaded configuration: {:?}", config);

    let table = load_input(&args.input.input, &config)?;
    let records_loaded = table.len();

    let processor = RecordProcessor::from_config(&config).with_progress(args.input.show_progress());
    let output = processor.process(table, &args.window_bounds())?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.export.output_dir.clone());
    let reports = output_reports(&output);

    let output_sizes = if args.dry_run {
        dry_run(&output_dir, &reports)?
    } else {
        write_outputs(&output_dir, &reports, args.force_overwrite)?
    };

    let stats = RunStats {
        records_loaded,
        output_sizes,
        processing_time: start_time.elapsed(),
    };

    generate_final_report(args, &output, &stats)?;
    Ok(stats)
}

/// The four outputs of one run, keyed by file name
pub fn output_reports(output: &PipelineOutput) -> Vec<(String, ReportTable)> {
    vec![
        (ENRICHED_FILE_NAME.to_string(), output.enriched.to_report()),
        (
            DUPLICATES_FILE_NAME.to_string(),
            ReportTable::from_exceptions(&output.duplicates),
        ),
        (
            FLAGGED_FILE_NAME.to_string(),
            ReportTable::from_flagged(&output.flagged),
        ),
        (output.export_file_name(), output.export.to_report()),
    ]
}

/// Write every report, refusing to start when any target exists and `force` is unset
pub fn write_outputs(
    output_dir: &Path,
    reports: &[(String, ReportTable)],
    force: bool,
) -> Result<Vec<(String, u64)>> {
    std::fs::create_dir_all(output_dir).map_err(|e| {
        Error::io(
            format!("Failed to create output directory {}", output_dir.display()),
            e,
        )
    })?;

    let targets: Vec<PathBuf> = reports
        .iter()
        .map(|(name, _)| output_dir.join(name))
        .collect();
    if !force {
        if let Some(existing) = targets.iter().find(|path| path.exists()) {
            return Err(Error::output_exists(existing.display().to_string()));
        }
    }

    let mut sizes = Vec::with_capacity(reports.len());
    for ((name, table), path) in reports.iter().zip(&targets) {
        let size = write_report(path, table, force)?;
        sizes.push((name.clone(), size));
    }

    info!("Wrote {} files to {}", sizes.len(), output_dir.display());
    Ok(sizes)
}

/// Serialise every report without touching the filesystem
fn dry_run(output_dir: &Path, reports: &[(String, ReportTable)]) -> Result<Vec<(String, u64)>> {
    info!("Performing dry run - no files will be created");

    reports
        .iter()
        .map(|(name, table)| {
            let size = to_csv_bytes(table)?.len() as u64;
            info!(
                "Would create: {} ({} rows)",
                output_dir.join(name).display(),
                table.len()
            );
            Ok((name.clone(), size))
        })
        .collect()
}

fn generate_final_report(args: &ProcessArgs, output: &PipelineOutput, stats: &RunStats) -> Result<()> {
    info!("Generating final report");

    match args.input.output_format {
        OutputFormat::Human => generate_human_report(args, output, stats),
        OutputFormat::Json => generate_json_report(args, output, stats),
    }
}

/// Generate human-readable report
fn generate_human_report(args: &ProcessArgs, output: &PipelineOutput, stats: &RunStats) -> Result<()> {
    let pipeline = &output.stats;
    let title = if args.dry_run {
        "Port Receiving Dry Run Complete"
    } else {
        "Port Receiving Processing Complete"
    };

    println!("\n{}", title.green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Processing Summary:");
    println!("   • Records loaded: {}", stats.records_loaded);
    println!("   • Without bag id: {}", pipeline.missing_identifiers);
    println!(
        "   • Duplicate groups: {} ({} records)",
        pipeline.duplicate_groups, pipeline.duplicate_records
    );
    println!("   • Flagged bag ids: {}", pipeline.flagged_records);
    match &output.window {
        Some(window) => println!("   • Time window: {}", window),
        None => println!("   • Time window: {}", "unresolved".yellow()),
    }
    println!("   • Exported rows: {}", pipeline.exported_rows);
    println!("   • Processing time: {}", HumanDuration(stats.processing_time));

    if pipeline.defect_count() > 0 {
        println!(
            "{}",
            format!(
                "   {} records have a long bag id without a Bag attribute",
                pipeline.defect_count()
            )
            .yellow()
        );
        for defect in pipeline.data_defects.iter().take(5) {
            println!("     - row {}: {}", defect.record_index + 1, defect.raw_identifier);
        }
    }

    if !stats.output_sizes.is_empty() {
        let heading = if args.dry_run { "Would write:" } else { "Output Files:" };
        println!("\n{}", heading);
        for (filename, size) in &stats.output_sizes {
            println!("   • {}: {}", filename.cyan(), RunStats::format_size(*size));
        }
    }

    println!();
    Ok(())
}

/// Generate JSON report for machine consumption
fn generate_json_report(args: &ProcessArgs, output: &PipelineOutput, stats: &RunStats) -> Result<()> {
    let report = serde_json::json!({
        "dry_run": args.dry_run,
        "records_loaded": stats.records_loaded,
        "columns": output.columns,
        "window": output.window,
        "pipeline": output.stats,
        "processing_time_seconds": stats.processing_time.as_secs_f64(),
        "total_output_size_bytes": stats.total_output_size(),
        "output_files": stats.output_sizes.iter().map(|(name, size)| {
            serde_json::json!({
                "filename": name,
                "size_bytes": size
            })
        }).collect::<Vec<_>>()
    });

    let rendered = serde_json::to_string_pretty(&report)
        .map_err(|e| Error::report_writing(format!("Failed to render JSON report: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
