//! `slotctl.toml` configuration.
//!
//! Every field is optional; a missing default config file means all defaults.
//!
//! ```toml
//! store_path = "timeslots.json"
//!
//! [recommend]
//! default_duration_minutes = 30
//! invalid_slots = "skip"
//! dst = "earliest"
//!
//! [logging]
//! level = "warn"
//! format = "compact"
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use timeslot_engine::{DstPolicy, InvalidSlotPolicy, RecommendOptions};

pub const DEFAULT_CONFIG_FILE: &str = "slotctl.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON document holding users and their slots.
    pub store_path: PathBuf,
    pub recommend: RecommendConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("timeslots.json"),
            recommend: RecommendConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Used when a request does not carry a duration.
    pub default_duration_minutes: u32,
    pub invalid_slots: InvalidSlotPolicy,
    pub dst: DstPolicy,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: 30,
            invalid_slots: InvalidSlotPolicy::default(),
            dst: DstPolicy::default(),
        }
    }
}

impl RecommendConfig {
    pub fn options(&self) -> RecommendOptions {
        RecommendOptions {
            invalid_slots: self.invalid_slots,
            dst: self.dst,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file that must exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        tracing::Level::from_str(&self.logging.level).map_err(|_| {
            ConfigError::Invalid(format!("unknown log level '{}'", self.logging.level))
        })?;
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store_path must not be empty".to_string()));
        }
        Ok(())
    }
}
