//! Configuration management for drecalc
//!
//! Loads and validates drecalc configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Ledger snapshot location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding exported snapshots
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Snapshot file name
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            snapshot_file: default_snapshot_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_snapshot_file() -> String {
    "ledger.json".to_string()
}

/// Report defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    /// Sub-period width for series when the caller does not pick one
    #[serde(default)]
    pub default_granularity: DefaultGranularity,
    /// Drop sub-periods without activity from series output
    #[serde(default)]
    pub activity_only: bool,
    /// Company to report on when the caller does not pick one
    #[serde(default)]
    pub default_company: Option<String>,
}

/// Series granularity enumeration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultGranularity {
    /// Calendar months
    Month,
    /// Calendar quarters
    Quarter,
    /// Calendar years
    Year,
}

impl Default for DefaultGranularity {
    fn default() -> Self {
        DefaultGranularity::Month
    }
}

impl std::str::FromStr for DefaultGranularity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" => Ok(DefaultGranularity::Month),
            "quarter" => Ok(DefaultGranularity::Quarter),
            "year" => Ok(DefaultGranularity::Year),
            _ => Err(format!("Invalid granularity: {}", s)),
        }
    }
}

impl std::fmt::Display for DefaultGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultGranularity::Month => write!(f, "month"),
            DefaultGranularity::Quarter => write!(f, "quarter"),
            DefaultGranularity::Year => write!(f, "year"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Snapshot location
    #[serde(default)]
    pub data: DataConfig,
    /// Report defaults
    #[serde(default)]
    pub report: ReportConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }
        let content = std::fs::read_to_string(&path).map_err(|_| ConfigError::IoError)?;

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::InvalidYaml {
                message: e.to_string(),
            }
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.snapshot_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data.snapshot_file".to_string(),
                reason: "Snapshot file name must not be empty".to_string(),
            });
        }

        match self.logging.level.as_str() {
            "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "logging.level".to_string(),
                    reason: format!("Unknown log level: {}", other),
                });
            }
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Get the full path to the snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        self.data.path.join(&self.data.snapshot_file)
    }
}

// ==================== Tests ====================
