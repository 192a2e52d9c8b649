//! Check command implementation
//!
//! Loads the input and resolves the required columns without running the
//! pipeline, so a new export layout can be verified before processing.

use super::shared::{RunStats, load_configuration, load_input, setup_logging};
use crate::app::services::column_resolver::{ResolvedColumns, find_column};
use crate::cli::args::{CheckArgs, OutputFormat};
use crate::constants::labels;
use crate::{Error, Result};
use colored::*;
use std::time::Instant;
use tracing::{debug, info};

/// Check command runner
///
/// Fails with a schema resolution error when any required label is missing,
/// after reporting which labels did resolve.
pub fn run_check(args: &CheckArgs) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(&args.input)?;
    info!("Checking {}", args.input.input.display());
    debug!("Command line arguments: {:?}", args);

    args.input.validate()?;
    let config = load_configuration(&args.input)?;
    let table = load_input(&args.input.input, &config)?;

    let mapping: Vec<(&str, Option<&str>)> = labels::REQUIRED
        .iter()
        .map(|label| {
            let column = find_column(table.columns(), label).map(|index| table.columns()[index].as_str());
            (*label, column)
        })
        .collect();

    match args.input.output_format {
        OutputFormat::Human => {
            println!("\n{}", "Column Resolution".bold());
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            for (label, column) in &mapping {
                match column {
                    Some(column) => println!("   {} {:<30} -> {}", "✓".green(), label, column),
                    None => println!("   {} {:<30} -> {}", "✗".red(), label, "not found".red()),
                }
            }
            println!("   {} records, {} columns\n", table.len(), table.columns().len());
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "input": args.input.input.display().to_string(),
                "records": table.len(),
                "columns": table.columns(),
                "resolved": mapping.iter().map(|(label, column)| {
                    serde_json::json!({ "label": label, "column": column })
                }).collect::<Vec<_>>(),
            });
            let rendered = serde_json::to_string_pretty(&report)
                .map_err(|e| Error::report_writing(format!("Failed to render JSON report: {}", e)))?;
            println!("{}", rendered);
        }
    }

    ResolvedColumns::resolve(table.columns())?;
    info!("All required columns resolved");

    Ok(RunStats {
        records_loaded: table.len(),
        output_sizes: Vec::new(),
        processing_time: start_time.elapsed(),
    })
}
