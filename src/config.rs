//! Configuration management and validation.
//!
//! Provides the layered configuration for one invocation: built-in defaults,
//! then an optional TOML file, then command-line overrides. The identifier
//! thresholds live here as named values so the effective identifier cutoff and
//! the flagging band stay two separate settings.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_EFFECTIVE_ID_MIN_LENGTH, DEFAULT_FLAG_MAX_LENGTH,
    DEFAULT_FLAG_MIN_LENGTH, DEFAULT_HEADER_ROW, DEFAULT_SHEET_NAME, DEFAULT_TIMEZONE_SUFFIX,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Input loading settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Workbook sheet holding the supervision records
    pub sheet_name: String,
    /// Physical rows skipped before the header row
    pub header_row: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            header_row: DEFAULT_HEADER_ROW,
        }
    }
}

/// Business-rule thresholds on raw bag identifier length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifierThresholds {
    /// Identifiers strictly longer than this use their parsed `Bag` attribute
    pub effective_id_min_length: usize,
    /// Inclusive lower bound of the flagging band
    pub flag_min_length: usize,
    /// Inclusive upper bound of the flagging band
    pub flag_max_length: usize,
}

impl Default for IdentifierThresholds {
    fn default() -> Self {
        Self {
            effective_id_min_length: DEFAULT_EFFECTIVE_ID_MIN_LENGTH,
            flag_min_length: DEFAULT_FLAG_MIN_LENGTH,
            flag_max_length: DEFAULT_FLAG_MAX_LENGTH,
        }
    }
}

impl IdentifierThresholds {
    /// Whether a raw identifier length falls in the flagging band
    pub fn is_flagged_length(&self, length: usize) -> bool {
        (self.flag_min_length..=self.flag_max_length).contains(&length)
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Literal offset annotation appended to date/time export fields
    pub timezone_suffix: String,
    /// Directory receiving the reports and the export file
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            timezone_suffix: DEFAULT_TIMEZONE_SUFFIX.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Global configuration for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub thresholds: IdentifierThresholds,
    pub export: ExportConfig,
}

impl Config {
    /// Default config file location under the user config directory
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            Error::configuration("Could not determine user config directory".to_string())
        })?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        debug!("Loaded config file {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Load defaults, then the explicit file or the default file if it exists
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        match config_file {
            Some(path) => Self::from_file(path),
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.input.sheet_name.trim().is_empty() {
            return Err(Error::configuration("Sheet name cannot be empty".to_string()));
        }

        if self.thresholds.flag_min_length > self.thresholds.flag_max_length {
            return Err(Error::configuration(format!(
                "Flag band is inverted: min length {} exceeds max length {}",
                self.thresholds.flag_min_length, self.thresholds.flag_max_length
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.sheet_name, "RawData");
        assert_eq!(config.input.header_row, 1);
        assert_eq!(config.thresholds.effective_id_min_length, 20);
        assert_eq!(config.export.timezone_suffix, "+02:00");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [thresholds]
            flag_max_length = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.thresholds.flag_max_length, 30);
        assert_eq!(config.thresholds.flag_min_length, 16);
        assert_eq!(config.input.sheet_name, "RawData");
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let result = Config::from_toml_str("[thresholds\nflag_max_length = ");
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_inverted_flag_band_rejected() {
        let mut config = Config::default();
        config.thresholds.flag_min_length = 30;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_layered_from_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[input]\nsheet_name = \"Export\"\n").unwrap();

        let config = Config::load_layered(Some(&path)).unwrap();
        assert_eq!(config.input.sheet_name, "Export");
        assert_eq!(config.input.header_row, 1);
    }

    #[test]
    fn test_flag_band_is_inclusive() {
        let thresholds = IdentifierThresholds::default();
        assert!(!thresholds.is_flagged_length(15));
        assert!(thresholds.is_flagged_length(16));
        assert!(thresholds.is_flagged_length(24));
        assert!(!thresholds.is_flagged_length(25));
    }
}
