//! Configuration for the HTTP hook transport.
//!
//! The configuration is usually embedded as the `[transport]` table of the
//! application config file, but the endpoint is commonly supplied from the
//! environment or command line and merged in before validation.
//!
//! ```toml
//! [transport]
//! endpoint = "https://collector.example.com/api/v1/hook"
//! timeout_secs = 10
//! ```

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::HookConfigError;

/// Default bound on a full request/response round trip.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Destination and limits for metric delivery.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HookConfig {
    /// Absolute `http` or `https` URL that receives the payload.
    ///
    /// Empty by default: there is no sensible fallback destination, so the
    /// application must refuse to start until one is provided.
    #[validate(custom(function = "validate_endpoint"))]
    pub endpoint: String,

    /// Timeout in seconds covering connect, request and response body.
    #[validate(range(
        min = 1,
        max = 300,
        message = "Timeout must be between 1 and 300 seconds"
    ))]
    pub timeout_secs: u64,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HookConfig {
    /// Creates a configuration for `endpoint` with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Returns `true` when no endpoint has been configured yet.
    pub fn is_endpoint_missing(&self) -> bool {
        self.endpoint.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parses the endpoint into a URL, enforcing an absolute `http(s)` URL.
    pub fn endpoint_url(&self) -> Result<Url, HookConfigError> {
        parse_endpoint(self.endpoint.trim()).map_err(|reason| HookConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason,
        })
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, String> {
    if endpoint.is_empty() {
        return Err("endpoint must not be empty".to_string());
    }

    let url = Url::parse(endpoint).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}', expected http or https", other)),
    }
    if url.host_str().is_none() {
        return Err("endpoint has no host".to_string());
    }

    Ok(url)
}

/// Validates that the endpoint is an absolute `http(s)` URL.
fn validate_endpoint(endpoint: &str) -> Result<(), ValidationError> {
    parse_endpoint(endpoint.trim()).map(|_| ()).map_err(|reason| {
        let mut err = ValidationError::new("invalid_endpoint");
        err.message = Some(format!("Invalid endpoint '{}': {}", endpoint, reason).into());
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_endpoint_and_ten_second_timeout() {
        let config = HookConfig::default();
        assert!(config.is_endpoint_missing());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_err());
    }

    #[test]
    fn accepts_http_and_https_endpoints() {
        for endpoint in [
            "http://127.0.0.1:9091/metrics/job/node",
            "https://collector.example.com/api/v1/hook",
        ] {
            let config = HookConfig::new(endpoint);
            assert!(config.validate().is_ok(), "{endpoint} should be valid");
            assert_eq!(config.endpoint_url().unwrap().as_str(), endpoint);
        }
    }

    #[test]
    fn rejects_relative_and_foreign_scheme_endpoints() {
        for endpoint in ["/api/hook", "collector:9091", "ftp://example.com/x", "   "] {
            let config = HookConfig::new(endpoint);
            assert!(config.validate().is_err(), "{endpoint:?} should be rejected");
            assert!(matches!(
                config.endpoint_url(),
                Err(HookConfigError::InvalidEndpoint { .. })
            ));
        }
    }

    #[test]
    fn endpoint_whitespace_is_trimmed() {
        let config = HookConfig::new("  http://localhost:8080/hook  ");
        assert!(!config.is_endpoint_missing());
        assert_eq!(
            config.endpoint_url().unwrap().as_str(),
            "http://localhost:8080/hook"
        );
    }

    #[test]
    fn timeout_out_of_range_fails_validation() {
        let config = HookConfig {
            endpoint: "http://localhost/".into(),
            timeout_secs: 0,
        };
        assert!(config.validate().is_err());
    }
}
