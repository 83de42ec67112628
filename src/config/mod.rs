//! Application configuration loading, validation, and management.
//!
//! This module provides the top-level `Config` structure that aggregates
//! logging, metrics, and transport configurations. Values come from three
//! places, later ones winning: built-in defaults, an optional TOML file, and
//! command-line / environment overrides for the destination URL and the log
//! level. Validation runs once, after every source has been merged.
//!
//! The configuration is loaded early in the application lifecycle and is
//! intended to remain immutable thereafter.

use std::{
    fs,
    path::{Path, PathBuf},
};

use relaybee_hook::{HookConfig, HookConfigError};
use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use validator::Validate;

use crate::{
    config::{logger::LoggerConfig, metrics::MetricsConfig},
    core::collectors::CollectorRegistry,
};

pub mod logger;
pub mod metrics;

/// Config file read when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/relaybee/config.toml";

/// UTC timestamp used by the early print macros.
#[doc(hidden)]
pub fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

/// Simple macros for printing timestamped messages before the tracing subscriber
/// is initialized. These are used during early configuration loading.
#[macro_export]
macro_rules! print_info {
    ($($arg:tt)*) => {
        println!("{}  {} {}",
            console::style($crate::config::timestamp()).dim(),
            console::style("INFO").green(),
            format_args!($($arg)*)
        );
    };
}

#[macro_export]
macro_rules! print_warn {
    ($($arg:tt)*) => {
        println!("{}  {} {}",
            console::style($crate::config::timestamp()).dim(),
            console::style("WARN").yellow(),
            format_args!($($arg)*)
        );
    };
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {
        eprintln!("{}  {} {}",
            console::style($crate::config::timestamp()).dim(),
            console::style("ERROR").red(),
            format_args!($($arg)*)
        );
    };
}

/// Errors that can occur during configuration loading, parsing or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A config file was named explicitly but does not exist.
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// IO error while accessing configuration files.
    #[error("IO error while reading configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// Failure to parse the TOML configuration file.
    #[error("Parse error while reading configuration: {0}")]
    ParseError(String),

    /// Validation failure after all sources were merged.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No destination URL from any source.
    #[error("No destination configured: set the HOOK_URL environment variable or pass --hook-url")]
    MissingEndpoint,

    /// The destination URL is present but unusable.
    #[error("Invalid destination: {0}")]
    Transport(#[from] HookConfigError),

    /// `metrics.collectors` names a producer that is not compiled in.
    #[error("Unknown collector '{name}', available: {available}")]
    UnknownCollector { name: String, available: String },
}

/// Top-level application configuration.
#[derive(Serialize, Deserialize, Debug, Validate, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// Logging subsystem configuration.
    #[validate(nested)]
    pub logger: LoggerConfig,

    /// Collection schedule and producer selection.
    #[validate(nested)]
    pub metrics: MetricsConfig,

    /// Destination of the forwarded payloads.
    #[validate(nested)]
    pub transport: HookConfig,
}

/// Values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub hook_url: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Builds the effective configuration from every source and validates it.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if an explicitly named file is missing, the
    /// file cannot be read or parsed, or the merged result is invalid.
    pub fn resolve(overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut config = match Self::get_config_path(overrides.config_path.as_deref())? {
            Some(path) => Self::load(&path)?,
            None => {
                print_info!("No configuration file found, using built-in defaults");
                Config::default()
            }
        };

        config.apply_overrides(overrides);
        config.check()?;
        Ok(config)
    }

    /// Determines the configuration file path.
    ///
    /// Priority:
    /// 1. `--config` flag or `RELAYBEE_CONFIG` environment variable
    /// 2. `/etc/relaybee/config.toml`, when it exists
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if an explicitly given path does not exist.
    fn get_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            print_info!("Using config from: {}", path.display());
            return Ok(Some(path.to_path_buf()));
        }

        let fallback = Path::new(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            print_info!("Using default config path: {}", fallback.display());
            return Ok(Some(fallback.to_path_buf()));
        }

        Ok(None)
    }

    /// Reads and parses the TOML file at `path` without validating it.
    ///
    /// # Errors
    ///
    /// Propagates IO and parsing errors as `ConfigError`.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        print_info!("Loading configuration from: {}", path.display());

        let config_str = fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&config_str).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Applies command-line and environment values on top of the file.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = overrides.hook_url.as_deref().filter(|u| !u.trim().is_empty()) {
            self.transport.endpoint = url.trim().to_string();
        }
        if let Some(level) = &overrides.log_level {
            self.logger.level = level.clone();
        }
    }

    /// Validates the merged configuration.
    ///
    /// # Errors
    ///
    /// `MissingEndpoint` when no destination is set, `Transport` for a
    /// malformed one, `UnknownCollector` for a producer name that is not
    /// compiled in, and `ValidationError` for everything else.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.transport.is_endpoint_missing() {
            return Err(ConfigError::MissingEndpoint);
        }
        self.transport.endpoint_url()?;

        self.validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if let Some(names) = &self.metrics.collectors {
            if let Some(name) = names.iter().find(|n| !CollectorRegistry::is_available(n)) {
                return Err(ConfigError::UnknownCollector {
                    name: name.clone(),
                    available: CollectorRegistry::available().join(", "),
                });
            }
        }

        Ok(())
    }
}
