use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{
    error::CollectorError, host::HostSnapshot, registry::CollectorRegistry,
    types::CollectorResult,
};
use crate::core::exposition::MetricFamily;

/// Where a collection cycle gets its metric families from.
///
/// Implementations must not keep mutable state between calls: every
/// `gather` starts from fresh producers and a fresh view of the host.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Short platform name used in startup logs.
    fn platform(&self) -> &'static str;

    /// Gathers all enabled families, sorted by name.
    async fn gather(&self) -> CollectorResult<Vec<MetricFamily>>;
}

/// Host metrics backed by `sysinfo` and the compiled-in producers.
#[derive(Debug, Clone, Default)]
pub struct HostSource {
    enabled: Option<Vec<String>>,
}

impl HostSource {
    /// `enabled == None` runs every available producer.
    pub fn new(enabled: Option<Vec<String>>) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl MetricsSource for HostSource {
    fn platform(&self) -> &'static str {
        std::env::consts::OS
    }

    async fn gather(&self) -> CollectorResult<Vec<MetricFamily>> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(CollectorError::UnsupportedPlatform(
                std::env::consts::OS.to_string(),
            ));
        }

        let registry = CollectorRegistry::from_inventory(self.enabled.as_deref())?;
        debug!("Gathering from collectors: {:?}", registry.names());

        let host = tokio::task::spawn_blocking(HostSnapshot::capture)
            .await
            .map_err(|e| CollectorError::Snapshot(e.to_string()))?;

        registry.gather(&host)
    }
}

/// Stand-in for operating systems without a host probe. Every gather fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSource;

#[async_trait]
impl MetricsSource for UnsupportedSource {
    fn platform(&self) -> &'static str {
        std::env::consts::OS
    }

    async fn gather(&self) -> CollectorResult<Vec<MetricFamily>> {
        Err(CollectorError::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        ))
    }
}

/// Returns the metrics source compiled in for this target.
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "windows",
    target_os = "freebsd"
))]
pub fn platform_source(enabled: Option<Vec<String>>) -> Arc<dyn MetricsSource> {
    Arc::new(HostSource::new(enabled))
}

/// Returns the metrics source compiled in for this target.
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "windows",
    target_os = "freebsd"
)))]
pub fn platform_source(_enabled: Option<Vec<String>>) -> Arc<dyn MetricsSource> {
    Arc::new(UnsupportedSource)
}
