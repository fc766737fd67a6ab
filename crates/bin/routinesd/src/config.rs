//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `routines.toml` in the working directory, or the file named by
//! `ROUTINES_CONFIG`. The `[app]` table holds the routine arguments and is
//! validated later by `RoutineConfig::from_args`; the file is therefore
//! required. Environment variables take precedence over file values.

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::Deserialize;

use routines_app::config::AppArgs;
use routines_domain::time::LocalZone;

const DEFAULT_PATH: &str = "routines.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Zone for wake times that carry no offset.
    pub clock: ClockConfig,
    /// Routine arguments, handed over verbatim.
    pub app: AppArgs,
}

/// Clock configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Fixed offset from UTC. The system zone, with its DST rules, when unset.
    pub utc_offset_minutes: Option<i32>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the config file then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or malformed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os("ROUTINES_CONFIG")
            .map_or_else(|| PathBuf::from(DEFAULT_PATH), PathBuf::from);
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(ConfigError::Parse)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ROUTINES_UTC_OFFSET_MINUTES") {
            if let Ok(minutes) = val.parse() {
                self.clock.utc_offset_minutes = Some(minutes);
            }
        }
        if let Ok(val) = std::env::var("ROUTINES_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.is_empty() {
            return Err(ConfigError::Validation(
                "the [app] table must hold the routine arguments".to_string(),
            ));
        }
        self.local_zone()?;
        Ok(())
    }

    /// Zone assumed for wake times without an explicit offset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the offset is a day or more.
    pub fn local_zone(&self) -> Result<LocalZone, ConfigError> {
        let Some(minutes) = self.clock.utc_offset_minutes else {
            return Ok(LocalZone::System);
        };
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(LocalZone::Fixed)
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "clock.utc_offset_minutes must be within a day, got {minutes}"
                ))
            })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "routinesd=info,routines_app=info,routines_adapter_virtual=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
