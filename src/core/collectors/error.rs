use thiserror::Error;

/// Custom error type for the collector system.
/// Uses `thiserror` for clean, automatic derivation of `Debug`, `Display`, and `Error`
/// traits, with context-rich error messages.
#[derive(Error, Debug)]
pub enum CollectorError {
    /// The running operating system has no metrics source.
    /// Raised on every gather so that an unsupported host never ships an empty payload.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Refreshing host statistics failed (for example the blocking task panicked).
    #[error("Failed to capture host snapshot: {0}")]
    Snapshot(String),

    /// Two producers were registered under the same name.
    #[error("Collector already registered: {0}")]
    DuplicateCollector(String),

    /// Tried to enable a collector by name, but it was not registered.
    #[error("Collector not found for: {0}")]
    CollectorNotFound(String),

    /// Two producers emitted a family with the same name in one gather.
    #[error("Metric family '{family}' collected by both '{first}' and '{second}'")]
    DuplicateFamily {
        family: String,
        first: String,
        second: String,
    },

    /// A metric could not be built or registered (invalid name or label,
    /// duplicate registration within one producer).
    #[error("Metric error: {0}")]
    Metric(#[from] prometheus::Error),

    /// A single producer could not derive its metrics from the host snapshot.
    /// Recorded in the scrape-success family; never fails a gather on its own.
    #[error("Collector '{collector}' failed: {reason}")]
    Probe { collector: String, reason: String },
}

impl CollectorError {
    pub fn probe(collector: &str, reason: impl Into<String>) -> Self {
        CollectorError::Probe {
            collector: collector.to_string(),
            reason: reason.into(),
        }
    }
}
