//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub local: LocalConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub finance: FinanceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which data service backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    /// Remote HTTP/JSON service.
    #[default]
    Remote,
    /// On-disk JSON store (offline).
    Local,
}

/// Data service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub mode: ServiceMode,
    pub base_url: String,
    /// Bearer token sent with every request (empty = none).
    #[serde(default)]
    pub api_token: String,
    /// Request timeout in seconds (default: 15).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

/// Local store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Path of the JSON store; empty means the platform data directory.
    #[serde(default)]
    pub data_path: String,
}

/// Batch floor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub drain_duration_secs: u64,
    /// Wash seconds per recipe base weight.
    pub wash_secs_per_base: u64,
    pub default_base_weight_kg: f64,
    /// Allowed gap between good + wastage and input weight.
    pub qc_tolerance_kg: f64,
}

/// Finance view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceConfig {
    pub currency: String,
    pub default_selling_price: f64,
    pub default_stock_threshold: i64,
}

/// Log output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write a daily rolling log file in addition to stdout.
    pub file_enabled: bool,
    /// Log directory; empty means next to the config file.
    #[serde(default)]
    pub directory: String,
}

impl AppConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.mode == ServiceMode::Remote {
            if self.service.base_url.trim().is_empty() {
                return Err(ConfigError::Validation("Service URL cannot be empty".to_string()));
            }
            if !self.service.base_url.starts_with("http") {
                return Err(ConfigError::Validation(
                    "Service URL must start with http:// or https://".to_string(),
                ));
            }
        }
        if self.service.timeout_secs < 1 {
            return Err(ConfigError::Validation(
                "Service timeout must be at least 1 second".to_string(),
            ));
        }
        if self.processing.default_base_weight_kg <= 0.0 {
            return Err(ConfigError::Validation(
                "Default base weight must be greater than 0".to_string(),
            ));
        }
        if self.processing.qc_tolerance_kg <= 0.0 || self.processing.qc_tolerance_kg > 5.0 {
            return Err(ConfigError::Validation(
                "QC tolerance must be between 0 and 5 kg".to_string(),
            ));
        }
        if self.finance.default_selling_price < 0.0 {
            return Err(ConfigError::Validation(
                "Default selling price cannot be negative".to_string(),
            ));
        }
        if self.finance.default_stock_threshold < 0 {
            return Err(ConfigError::Validation(
                "Default stock threshold cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve where the local JSON store lives.
    pub fn local_store_path(&self) -> PathBuf {
        if !self.local.data_path.trim().is_empty() {
            return PathBuf::from(&self.local.data_path);
        }
        directories::ProjectDirs::from("com", "ShroomTrack", "shroomtrack")
            .map(|dirs| dirs.data_dir().join("store.json"))
            .unwrap_or_else(|| PathBuf::from("store.json"))
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            mode: ServiceMode::Remote,
            base_url: "http://localhost:8080/api".to_string(),
            api_token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            drain_duration_secs: 120,
            wash_secs_per_base: 60,
            default_base_weight_kg: 0.5,
            qc_tolerance_kg: 0.1,
        }
    }
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            currency: "RM".to_string(),
            default_selling_price: 15.0,
            default_stock_threshold: 50,
        }
    }
}
