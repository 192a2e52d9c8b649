//! Command-line argument definitions for the port receiving pipeline
//!
//! This module defines the CLI interface using the clap derive API.

use crate::app::services::record_processor::WindowBounds;
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the port receiving supervision cleaner
///
/// Reads the supervision export, reports duplicate and suspicious bag
/// identifiers and writes the PRN ingestion CSV for a time window.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "port-receiving",
    version,
    about = "Clean port-receiving supervision exports and produce the PRN ingestion CSV",
    long_about = "Reads the RawData sheet of a port-receiving supervision export, parses the \
                  free-text bag identifier field, reports duplicate and structurally suspicious \
                  bag identifiers and writes the records of a time window in the fixed PRN \
                  export schema."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write the reports and the PRN export
    Process(ProcessArgs),
    /// Load an input and check that every required column resolves
    Check(CheckArgs),
}

/// Arguments shared by every command that loads an input
#[derive(Debug, Clone, Parser)]
pub struct InputArgs {
    /// Supervision export (.xlsx workbook or .csv)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Workbook sheet holding the records (ignored for CSV)
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Physical rows above the header row
    #[arg(long = "header-row", value_name = "ROWS")]
    pub header_row: Option<usize>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// <config dir>/port-receiving/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the final report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// First day of the export window (defaults to the earliest added date)
    #[arg(long = "start-date", value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,

    /// Start time on the first day (defaults to 00:00)
    #[arg(long = "start-time", value_name = "HH:MM", value_parser = parse_time)]
    pub start_time: Option<NaiveTime>,

    /// Last day of the export window (defaults to the latest added date)
    #[arg(long = "end-date", value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub end_date: Option<NaiveDate>,

    /// End time on the last day (defaults to 23:59)
    #[arg(long = "end-time", value_name = "HH:MM", value_parser = parse_time)]
    pub end_time: Option<NaiveTime>,

    /// Directory for the reports and the export
    ///
    /// Defaults to the configured output directory.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory for generated CSV files"
    )]
    pub output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(long = "force", help = "Force overwrite of existing output files")]
    pub force_overwrite: bool,

    /// Run the pipeline and print the summary without writing files
    #[arg(
        long = "dry-run",
        help = "Show what would be written without creating output files"
    )]
    pub dry_run: bool,
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Output format options for the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| Error::datetime_parsing(format!("Invalid date '{}', expected YYYY-MM-DD", value), e))
}

/// Parse an `HH:MM` (or `HH:MM:SS`) wall-clock time
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|e| Error::datetime_parsing(format!("Invalid time '{}', expected HH:MM", value), e))
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Option<&Commands> {
        self.command.as_ref()
    }
}

impl InputArgs {
    /// Validate the input arguments
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            return Err(Error::configuration(format!(
                "Input file does not exist: {}",
                self.input.display()
            )));
        }

        if !self.input.is_file() {
            return Err(Error::configuration(format!(
                "Input path is not a file: {}",
                self.input.display()
            )));
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        self.input.validate()?;

        if let Some(output_dir) = &self.output_dir {
            if output_dir.exists() && !output_dir.is_dir() {
                return Err(Error::configuration(format!(
                    "Output path is not a directory: {}",
                    output_dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Window parts given on the command line; the rest default from the data
    pub fn window_bounds(&self) -> WindowBounds {
        WindowBounds {
            start_date: self.start_date,
            start_time: self.start_time,
            end_date: self.end_date,
            end_time: self.end_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("port-receiving").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_parse_date_and_time() {
        assert_eq!(
            parse_date("2024-01-31").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        assert!(parse_date("31/01/2024").is_err());
        assert_eq!(
            parse_time("07:45").unwrap(),
            NaiveTime::from_hms_opt(7, 45, 0).unwrap()
        );
        assert_eq!(
            parse_time("07:45:30").unwrap(),
            NaiveTime::from_hms_opt(7, 45, 30).unwrap()
        );
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn test_process_command_parsing() {
        let args = parse(&[
            "process",
            "supervision.xlsx",
            "--start-date",
            "2024-01-01",
            "--end-time",
            "18:30",
            "-o",
            "out",
            "--force",
            "-vv",
        ]);

        let Some(Commands::Process(process)) = args.get_command() else {
            panic!("expected process command");
        };
        assert_eq!(process.input.input, PathBuf::from("supervision.xlsx"));
        assert_eq!(process.output_dir, Some(PathBuf::from("out")));
        assert!(process.force_overwrite);
        assert!(!process.dry_run);
        assert_eq!(process.input.get_log_level(), "debug");
        assert_eq!(process.input.output_format, OutputFormat::Human);

        let bounds = process.window_bounds();
        assert_eq!(bounds.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(bounds.start_time, None);
        assert_eq!(bounds.end_date, None);
        assert_eq!(bounds.end_time, NaiveTime::from_hms_opt(18, 30, 0));
    }

    #[test]
    fn test_check_command_parsing() {
        let args = parse(&["check", "export.csv", "--format", "json", "--header-row", "0"]);
        let Some(Commands::Check(check)) = args.get_command() else {
            panic!("expected check command");
        };
        assert_eq!(check.input.output_format, OutputFormat::Json);
        assert_eq!(check.input.header_row, Some(0));
    }

    #[test]
    fn test_invalid_date_is_rejected_by_parser() {
        let result = Args::try_parse_from(["port-receiving", "process", "in.csv", "--start-date", "yesterday"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Args::try_parse_from(["port-receiving", "check", "in.csv", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level_and_progress() {
        let args = parse(&["check", "in.csv"]);
        let Some(Commands::Check(check)) = args.get_command() else {
            panic!("expected check command");
        };
        assert_eq!(check.input.get_log_level(), "warn");
        assert!(check.input.show_progress());

        let args = parse(&["check", "in.csv", "-q"]);
        let Some(Commands::Check(check)) = args.get_command() else {
            panic!("expected check command");
        };
        assert_eq!(check.input.get_log_level(), "error");
        assert!(!check.input.show_progress());
    }

    #[test]
    fn test_validation() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("export.csv");
        let mut file = std::fs::File::create(&input).unwrap();
        writeln!(file, "BAG ID").unwrap();

        let input_str = input.to_str().unwrap();
        let args = parse(&["process", input_str]);
        let Some(Commands::Process(process)) = args.get_command() else {
            panic!("expected process command");
        };
        assert!(process.validate().is_ok());

        // Output pointing at a file
        let mut invalid = process.clone();
        invalid.output_dir = Some(input.clone());
        assert!(invalid.validate().is_err());

        // Missing input
        let mut invalid = process.clone();
        invalid.input.input = temp_dir.path().join("missing.csv");
        assert!(invalid.validate().is_err());

        // Directory as input
        let mut invalid = process.clone();
        invalid.input.input = temp_dir.path().to_path_buf();
        assert!(invalid.validate().is_err());

        // Missing config file
        let mut invalid = process.clone();
        invalid.input.config_file = Some(temp_dir.path().join("missing.toml"));
        assert!(invalid.validate().is_err());
    }
}
