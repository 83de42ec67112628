//! Configuration for the collection schedule and the enabled producers.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Seconds between two collection cycles unless configured otherwise.
pub const DEFAULT_INTERVAL_SECS: u64 = 15;

/// `[metrics]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MetricsConfig {
    /// Interval (in seconds) at which metrics are collected and forwarded.
    ///
    /// Must be at least 1 second.
    #[validate(range(min = 1, message = "Collection interval must be at least 1 second"))]
    pub interval: u64,

    /// Names of the producers to run. All compiled-in producers run when
    /// this is absent.
    #[validate(length(
        min = 1,
        message = "At least one collector must be enabled when the list is given, possible values: cpu, memory, filesystem, network, loadavg, system"
    ))]
    pub collectors: Option<Vec<String>>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL_SECS,
            collectors: None,
        }
    }
}

impl MetricsConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Return enabled collector names, `None` meaning all of them.
    pub fn enabled_names(&self) -> Option<Vec<String>> {
        self.collectors.clone()
    }

    /// Whether the producer `name` is selected by this configuration.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.collectors
            .as_ref()
            .map_or(true, |names| names.iter().any(|n| n == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MetricsConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(15));
        assert!(config.enabled_names().is_none());
        assert!(config.is_enabled("cpu"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = MetricsConfig {
            interval: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at least 1 second"));
    }

    #[test]
    fn test_empty_collector_list_rejected() {
        let config = MetricsConfig {
            collectors: Some(Vec::new()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_list_limits_enabled() {
        let config: MetricsConfig = toml::from_str(
            r#"
            interval = 30
            collectors = ["memory", "network"]
            "#,
        )
        .unwrap();

        assert_eq!(config.interval, 30);
        assert!(config.is_enabled("memory"));
        assert!(!config.is_enabled("cpu"));
    }
}
