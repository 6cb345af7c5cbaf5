//! Pipeline configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all)
//! reproduces the stock layout:
//!
//! ```toml
//! [data]
//! symbol = "AAPL"
//! period = "6mo"
//! raw_path = "data/raw/apple_stock.csv"
//! cleaned_path = "data/processed/apple_stock_cleaned.csv"
//! features_path = "data/processed/apple_stock_features.csv"
//!
//! [model]
//! test_fraction = 0.2
//!
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//! placeholder_symbol = "AAPL"
//! placeholder_prediction = 189.75
//! ```

use crate::data::Period;
use crate::model::TrainerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub data: DataConfig,
    pub model: TrainerConfig,
    pub server: ServerConfig,
}

/// Where stage files live and what to download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub symbol: String,
    pub period: Period,
    pub raw_path: PathBuf,
    pub cleaned_path: PathBuf,
    pub features_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            symbol: "AAPL".into(),
            period: Period::SixMonths,
            raw_path: PathBuf::from("data/raw/apple_stock.csv"),
            cleaned_path: PathBuf::from("data/processed/apple_stock_cleaned.csv"),
            features_path: PathBuf::from("data/processed/apple_stock_features.csv"),
        }
    }
}

/// Prediction service settings, including the static payload it returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub placeholder_symbol: String,
    pub placeholder_prediction: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            placeholder_symbol: "AAPL".into(),
            placeholder_prediction: 189.75,
        }
    }
}

impl PipelineConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = self.model.test_fraction;
        if !(f > 0.0 && f < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "model.test_fraction must be in (0, 1), got {f}"
            )));
        }
        if self.data.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("data.symbol must not be empty".into()));
        }
        Ok(())
    }
}
