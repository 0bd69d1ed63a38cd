use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "triplog";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Reimbursement per driven mile
    #[serde(default = "default_rate_per_mile")]
    pub rate_per_mile: Decimal,

    /// Rows per page on the Trips, Expenses and Templates tabs
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Data file location. Defaults to the platform data directory.
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    #[serde(default)]
    pub distance: DistanceConfig,

    /// Cursor blink interval of the input line
    #[serde(default = "default_cursor_blink_ms")]
    pub cursor_blink_ms: u64,
}

fn default_rate_per_mile() -> Decimal {
    Decimal::new(70, 2)
}

fn default_page_size() -> usize {
    10
}

fn default_cursor_blink_ms() -> u64 {
    530
}

/// Distance lookup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    crate::services::distance::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rate_per_mile: default_rate_per_mile(),
            page_size: default_page_size(),
            data_file: None,
            distance: DistanceConfig::default(),
            cursor_blink_ms: default_cursor_blink_ms(),
        }
    }
}

impl Config {
    /// `~/.config/triplog/config.json` (platform equivalent)
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
    }

    /// `~/.local/share/triplog/data.json` (platform equivalent)
    pub fn default_data_file() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR)
            .join("data.json")
    }

    /// Data file from config, falling back to the platform default
    pub fn data_file_path(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(Self::default_data_file)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the explicit config file if given, else the default location.
    ///
    /// A missing default file yields defaults; a missing explicit file is an
    /// error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from_file(path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Validation(
                "page_size must be at least 1".to_string(),
            ));
        }
        if self.rate_per_mile.is_sign_negative() {
            return Err(ConfigError::Validation(
                "rate_per_mile must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}
