//! Port Receiving Library
//!
//! A Rust library for cleaning port-receiving supervision exports and turning
//! them into the fixed-schema CSV consumed by the PRN ingestion system.
//!
//! This library provides tools for:
//! - Loading the `RawData` sheet of a supervision workbook (or a CSV export)
//! - Resolving the required logical columns by case-insensitive substring match
//! - Parsing the dual-grammar bag identifier field into attributes
//! - Detecting duplicate bag identifiers and structurally suspicious identifiers
//! - Filtering records by an inclusive time window
//! - Remapping columns into the PRN export schema and writing CSV reports

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod bag_id_parser;
        pub mod column_resolver;
        pub mod export_writer;
        pub mod record_processor;
    }
    pub mod adapters {
        pub mod delimited;
        pub mod workbook;

        pub use delimited::load_delimited;
        pub use workbook::{load_table, load_workbook};
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{CellValue, EnrichedRecord, Record, Table, TimeWindow};
pub use config::Config;

/// Result type alias for the port receiving pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for one pipeline invocation
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The input could not be read as a table at all
    #[error("Failed to load '{file}': {message}")]
    Load { file: String, message: String },

    /// One or more required logical columns could not be located
    #[error("Required columns not found: {}", missing.join(", "))]
    SchemaResolution { missing: Vec<String> },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Date/time parsing error
    #[error("Date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Report serialisation failed
    #[error("Report writing error: {message}")]
    ReportWriting { message: String },

    /// Refusing to overwrite an existing output file
    #[error("Output file already exists: {path} (use --force to overwrite)")]
    OutputExists { path: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a load error for an input file
    pub fn load(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a schema resolution error listing the labels that failed
    pub fn schema_resolution(missing: Vec<String>) -> Self {
        Self::SchemaResolution { missing }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Create a report writing error
    pub fn report_writing(message: impl Into<String>) -> Self {
        Self::ReportWriting {
            message: message.into(),
        }
    }

    /// Create an output-exists error
    pub fn output_exists(path: impl Into<String>) -> Self {
        Self::OutputExists { path: path.into() }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Load {
            file: "unknown".to_string(),
            message: error.to_string(),
        }
    }
}

impl From<calamine::Error> for Error {
    fn from(error: calamine::Error) -> Self {
        Self::Load {
            file: "unknown".to_string(),
            message: error.to_string(),
        }
    }
}

impl From<polars::error::PolarsError> for Error {
    fn from(error: polars::error::PolarsError) -> Self {
        Self::ReportWriting {
            message: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid config file: {}", error),
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "Date/time parsing failed".to_string(),
            source: error,
        }
    }
}
