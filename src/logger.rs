//! Centralized logging configuration and initialization manager.
//!
//! The `LoggerManager` validates logging configuration and initializes
//! the global `tracing` subscriber with appropriate layers for console
//! and/or systemd journald output. It supports multiple log formats,
//! ANSI coloring, thread/span information, and environment-based filtering.

use std::io;

use thiserror::Error;
use tracing_subscriber::{fmt, fmt::format::FmtSpan, prelude::*, EnvFilter, Layer};
use validator::{Validate, ValidationErrors};

use crate::{
    config::logger::{ConsoleConfig, LogFormat, LoggerConfig},
    print_info, print_warn,
};

type BoxedLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>;

/// Errors that can occur during logger configuration or initialization.
#[derive(Error, Debug)]
pub enum LoggerError {
    /// Validation errors from the logger configuration struct.
    #[error("Logger configuration validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    /// IO error, typically during journald socket operations.
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Journald output was requested but this build has no journald support.
    #[error("Journald output is not available in this build")]
    JournaldUnavailable,

    /// No output layers were successfully configured.
    #[error("No logging layers were configured or successfully initialized")]
    NoLayersConfigured,

    /// Journald logger failed to initialize while console output is enabled.
    #[error(
        "Failed to initialize journald logger, and console logger is enabled. Please check your configuration."
    )]
    JournaldFailedWithConsoleEnabled,

    /// A global subscriber was already installed.
    #[error("Logger initialization error: {0}")]
    InitializationError(String),
}

/// Manages logging configuration and global subscriber initialization.
pub struct LoggerManager {
    config: LoggerConfig,
}

impl LoggerManager {
    /// Creates a new `LoggerManager` and validates the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns `LoggerError::ValidationError` if configuration validation fails.
    pub fn new(config: LoggerConfig) -> Result<Self, LoggerError> {
        config.validate()?;

        Ok(LoggerManager { config })
    }

    /// Initializes the global `tracing` subscriber with configured layers.
    ///
    /// Must be called once at application startup before any tracing macros
    /// are used.
    ///
    /// # Errors
    ///
    /// Returns an error if no valid layers can be created, if journald
    /// initialization fails while console output is also requested, or if a
    /// global subscriber already exists.
    pub fn init(&self) -> Result<(), LoggerError> {
        let layers = self.build_layers()?;
        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .map_err(|e| LoggerError::InitializationError(e.to_string()))
    }

    fn build_layers(&self) -> Result<Vec<BoxedLayer>, LoggerError> {
        let mut layers = Vec::new();

        if let Some(console_config) = self.config.console.as_ref().filter(|c| c.enabled) {
            layers.push(self.init_console_logger(console_config, self.filter()));
        }

        if let Some(journald_config) = self.config.journald.as_ref().filter(|j| j.enabled) {
            match self.init_journald_logger(&journald_config.identifier, self.filter()) {
                Ok(journald_layer) => {
                    layers.push(journald_layer);
                    print_info!(
                        "Systemd journald logger initialized with identifier: {}",
                        journald_config.identifier
                    );
                }
                Err(e) => {
                    print_warn!("Failed to initialize systemd journald logger: {}", e);
                    if self.config.console_enabled() {
                        return Err(LoggerError::JournaldFailedWithConsoleEnabled);
                    }
                }
            }
        }

        if layers.is_empty() {
            print_warn!("No logging layers were initialized. Please check your configuration.");
            return Err(LoggerError::NoLayersConfigured);
        }
        Ok(layers)
    }

    /// `RUST_LOG` when set, otherwise the configured level.
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.config.level))
    }

    /// Constructs a console output layer according to the provided configuration.
    fn init_console_logger(&self, config: &ConsoleConfig, filter: EnvFilter) -> BoxedLayer {
        let span_events = if config.show_spans {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let base = fmt::layer()
            .with_target(config.show_target)
            .with_thread_ids(config.show_thread_ids)
            .with_span_events(span_events)
            .with_ansi(config.ansi_colors)
            .with_writer(io::stdout);

        match config.format {
            LogFormat::Json => base.json().with_filter(filter).boxed(),
            LogFormat::Pretty => base.pretty().with_filter(filter).boxed(),
            LogFormat::Compact => base.compact().with_filter(filter).boxed(),
        }
    }

    #[cfg(all(feature = "journald", target_os = "linux"))]
    fn init_journald_logger(
        &self,
        identifier: &str,
        filter: EnvFilter,
    ) -> Result<BoxedLayer, LoggerError> {
        let journald_layer =
            tracing_journald::layer()?.with_syslog_identifier(identifier.to_string());
        Ok(journald_layer.with_filter(filter).boxed())
    }

    #[cfg(not(all(feature = "journald", target_os = "linux")))]
    fn init_journald_logger(
        &self,
        _identifier: &str,
        _filter: EnvFilter,
    ) -> Result<BoxedLayer, LoggerError> {
        Err(LoggerError::JournaldUnavailable)
    }
}
