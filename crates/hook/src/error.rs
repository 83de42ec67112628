use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use validator::ValidationErrors;

/// Errors raised while turning a [`crate::HookConfig`] into a usable client.
///
/// These only happen at startup; once a `HookClient` exists its endpoint is
/// known to be well formed.
#[derive(Debug, Error)]
pub enum HookConfigError {
    /// The endpoint is empty, relative, or not an `http(s)` URL.
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Field-level validation failed (for example the timeout range).
    #[error("Hook configuration validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// The underlying HTTP client could not be constructed (TLS backend setup).
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Classified failure of a single delivery attempt.
///
/// Every variant is recoverable from the caller's point of view: the payload
/// is dropped and the next attempt starts from scratch.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The full round trip did not complete within the configured timeout.
    #[error("Request to {endpoint} timed out after {}s", .timeout.as_secs())]
    Timeout {
        endpoint: String,
        timeout: Duration,
        #[source]
        source: reqwest::Error,
    },

    /// Connection refused, DNS failure, TLS failure, reset mid-request, etc.
    #[error("Failed to send request to {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a status outside `200..300`.
    #[error("Unexpected status code {}: {body}", .status.as_u16())]
    Status { status: StatusCode, body: String },

    /// The endpoint answered with a status outside `200..300` and the body
    /// could not be read.
    #[error(
        "Unexpected status code {}, failed to read response body: {source}",
        .status.as_u16()
    )]
    UnreadableBody {
        status: StatusCode,
        #[source]
        source: reqwest::Error,
    },
}

impl DeliveryError {
    /// Response status, when the endpoint answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DeliveryError::Status { status, .. }
            | DeliveryError::UnreadableBody { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body of a rejected delivery.
    pub fn body(&self) -> Option<&str> {
        match self {
            DeliveryError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// `true` when no HTTP response was received.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DeliveryError::Transport { .. } | DeliveryError::Timeout { .. }
        )
    }

    /// Short machine-friendly label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            DeliveryError::Timeout { .. } => "timeout",
            DeliveryError::Transport { .. } => "transport",
            DeliveryError::Status { .. } | DeliveryError::UnreadableBody { .. } => "status",
        }
    }
}
