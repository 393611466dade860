//! Runtime configuration.
//!
//! Loaded from YAML. Every field has a default, so an empty document (or no
//! file at all) yields a working offline-capable setup:
//!
//! ```yaml
//! inventory_file: restaurant_inventory.csv
//! low_stock_threshold: 10
//! forecast_days: 7
//! oracle:
//!   provider: openai
//!   model: gpt-3.5-turbo
//!   timeout: 15s
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::providers::CompletionConfig;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration for the Pantry runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// CSV file holding the record set
    pub inventory_file: PathBuf,

    /// Stock strictly below this is low
    pub low_stock_threshold: i64,

    /// Forecast horizon in days
    pub forecast_days: u32,

    /// Safety stock for reorder suggestions; defaults to the low-stock threshold
    pub safety_stock: Option<i64>,

    /// Advisory oracle settings
    pub oracle: OracleConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            inventory_file: PathBuf::from("restaurant_inventory.csv"),
            low_stock_threshold: 10,
            forecast_days: 7,
            safety_stock: None,
            oracle: OracleConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Effective safety stock for reorder suggestions.
    pub fn safety_stock(&self) -> i64 {
        self.safety_stock.unwrap_or(self.low_stock_threshold)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.safety_stock.is_some_and(|s| s < 0) {
            return Err(ConfigError::Invalid("safety_stock must not be negative".to_string()));
        }
        self.oracle.validate()
    }
}

/// Settings for the advisory oracle and its transport.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Set to false to always use the fallback formulas
    pub enabled: bool,

    /// Provider type registered in the provider registry
    pub provider: String,

    /// Model name passed to the provider
    pub model: String,

    /// Maximum reply tokens
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Per-call timeout, e.g. "15s"
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,

    /// Custom API endpoint
    pub base_url: Option<String>,

    /// API key; the provider's environment variable is used when absent
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        let completion = CompletionConfig::default();
        Self {
            enabled: true,
            provider: "openai".to_string(),
            model: completion.model,
            max_tokens: completion.max_tokens,
            temperature: completion.temperature,
            timeout: completion.timeout,
            base_url: None,
            api_key: None,
        }
    }
}

impl OracleConfig {
    /// Completion settings for each decision request.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
        }
    }

    /// Provider-specific JSON passed to the provider factory.
    pub fn provider_config(&self) -> JsonValue {
        let mut config = serde_json::Map::new();
        if let Some(key) = &self.api_key {
            config.insert("api_key".to_string(), JsonValue::String(key.clone()));
        }
        if let Some(url) = &self.base_url {
            config.insert("base_url".to_string(), JsonValue::String(url.clone()));
        }
        JsonValue::Object(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("oracle.timeout must be positive".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(
                "oracle.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleConfig")
            .field("enabled", &self.enabled)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
