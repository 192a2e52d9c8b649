//! Shared components for CLI commands
//!
//! Logging setup, layered configuration loading and input loading used by
//! every command.

use crate::app::adapters::load_table;
use crate::app::models::Table;
use crate::cli::args::InputArgs;
use crate::config::Config;
use crate::Result;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Run statistics reported at the end of a command
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Records loaded from the input
    pub records_loaded: usize,
    /// Files written (or that would be written on a dry run) and their sizes
    pub output_sizes: Vec<(String, u64)>,
    /// Total processing time
    #[serde(rename = "processing_time_seconds", serialize_with = "serialize_secs")]
    pub processing_time: std::time::Duration,
}

fn serialize_secs<S: serde::Serializer>(
    duration: &std::time::Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl RunStats {
    /// Calculate total output size in bytes
    pub fn total_output_size(&self) -> u64 {
        self.output_sizes.iter().map(|(_, size)| size).sum()
    }

    /// Format output size in human-readable format
    pub fn format_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn setup_logging(args: &InputArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("port_receiving={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using the layered approach (defaults -> file -> args)
pub fn load_configuration(args: &InputArgs) -> Result<Config> {
    info!("Loading configuration");

    match &args.config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => match Config::default_config_path() {
            Ok(path) if path.exists() => info!("Using config file: {}", path.display()),
            _ => info!("No config file found, using defaults"),
        },
    }

    let mut config = Config::load_layered(args.config_file.as_deref())?;
    apply_cli_overrides(&mut config, args);
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &InputArgs) {
    if let Some(sheet) = &args.sheet {
        config.input.sheet_name = sheet.clone();
    }
    if let Some(header_row) = args.header_row {
        config.input.header_row = header_row;
    }
}

/// Load the input table with the configured sheet and header row
pub fn load_input(path: &Path, config: &Config) -> Result<Table> {
    info!(
        "Loading {} (sheet '{}', header after {} rows)",
        path.display(),
        config.input.sheet_name,
        config.input.header_row
    );
    load_table(path, &config.input.sheet_name, config.input.header_row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        input: InputArgs,
    }

    fn input_args(args: &[&str]) -> InputArgs {
        Wrapper::try_parse_from(std::iter::once("test").chain(args.iter().copied()))
            .unwrap()
            .input
    }

    #[test]
    fn test_run_stats_total_output_size() {
        let stats = RunStats {
            output_sizes: vec![
                ("enriched_records.csv".to_string(), 1000),
                ("flagged_bag_ids.csv".to_string(), 2000),
            ],
            ..Default::default()
        };
        assert_eq!(stats.total_output_size(), 3000);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(RunStats::format_size(500), "500 B");
        assert_eq!(RunStats::format_size(1536), "1.50 KB");
        assert_eq!(RunStats::format_size(1048576), "1.00 MB");
    }

    #[test]
    fn test_cli_overrides_win_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[input]\nsheet_name = \"FromFile\"\nheader_row = 3\n").unwrap();

        let args = input_args(&[
            "in.csv",
            "-c",
            config_path.to_str().unwrap(),
            "--sheet",
            "FromCli",
        ]);
        let config = load_configuration(&args).unwrap();
        assert_eq!(config.input.sheet_name, "FromCli");
        assert_eq!(config.input.header_row, 3);
    }

    #[test]
    fn test_empty_sheet_override_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();

        let args = input_args(&["in.csv", "-c", config_path.to_str().unwrap(), "--sheet", " "]);
        assert!(load_configuration(&args).is_err());
    }

    #[test]
    fn test_load_input_reads_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path: PathBuf = temp_dir.path().join("export.csv");
        std::fs::write(&path, "title\nBAG ID,Added Time\nBAG1,2024-01-01 10:00\n").unwrap();

        let table = load_input(&path, &Config::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.columns(), &["BAG ID", "Added Time"]);
    }
}
