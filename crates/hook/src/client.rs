//! Stateless HTTP sender for exposition payloads.
//!
//! A `HookClient` is bound to one endpoint at construction. Each call to
//! [`HookClient::send`] issues exactly one `POST`; there is no retry and no
//! state carried between calls beyond the connection pool that `reqwest`
//! keeps internally.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{header, Client, StatusCode, Url};
use tracing::{debug, instrument, warn};
use validator::Validate;

use crate::{
    config::HookConfig,
    error::{DeliveryError, HookConfigError},
};

/// Content type of the Prometheus text exposition format, version 0.0.4.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Fixed identifier sent with every request.
pub const USER_AGENT: &str = concat!("relaybee/", env!("CARGO_PKG_VERSION"));

/// Successful delivery: the endpoint answered with a 2xx status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub status: StatusCode,
    /// Size of the payload that was sent.
    pub bytes: usize,
}

/// Result of one delivery attempt.
pub type DeliveryOutcome = Result<Delivery, DeliveryError>;

/// Sender bound to a single validated endpoint.
#[derive(Debug, Clone)]
pub struct HookClient {
    endpoint: Url,
    timeout: Duration,
    http: Client,
}

impl HookClient {
    /// Validates `config` and builds the underlying HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `HookConfigError` if the endpoint is missing or malformed, the
    /// timeout is out of range, or the TLS backend cannot be initialized.
    pub fn from_config(config: &HookConfig) -> Result<Self, HookConfigError> {
        let endpoint = config.endpoint_url()?;
        config.validate()?;

        let timeout = config.timeout();
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(HookConfigError::Client)?;

        Ok(Self {
            endpoint,
            timeout,
            http,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends `payload` to the endpoint and classifies the result.
    ///
    /// Success is exactly a status in `200..300`. Any other status is a
    /// [`DeliveryError::Status`] carrying the full response body, or
    /// [`DeliveryError::UnreadableBody`] when that body cannot be read.
    #[instrument(skip_all, fields(endpoint = %self.endpoint, bytes = payload.len()))]
    pub async fn send(&self, payload: Bytes) -> DeliveryOutcome {
        let bytes = payload.len();

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(header::CONTENT_TYPE, CONTENT_TYPE)
            .body(payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status.is_success() {
            debug!("Endpoint accepted payload with status {}", status.as_u16());
            return Ok(Delivery { status, bytes });
        }

        match response.text().await {
            Ok(body) => Err(DeliveryError::Status { status, body }),
            Err(source) => {
                warn!(
                    "Failed to read response body of status {}: {}",
                    status.as_u16(),
                    source
                );
                Err(DeliveryError::UnreadableBody { status, source })
            }
        }
    }

    fn classify(&self, source: reqwest::Error) -> DeliveryError {
        let endpoint = self.endpoint.to_string();
        if source.is_timeout() {
            DeliveryError::Timeout {
                endpoint,
                timeout: self.timeout,
                source,
            }
        } else {
            DeliveryError::Transport { endpoint, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread,
    };

    use wiremock::{
        matchers::{body_string, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn client_for(server: &MockServer, timeout_secs: u64) -> HookClient {
        let config = HookConfig {
            endpoint: format!("{}/hook", server.uri()),
            timeout_secs,
        };
        HookClient::from_config(&config).expect("valid config")
    }

    #[tokio::test]
    async fn posts_payload_with_exposition_headers() {
        let server = MockServer::start().await;
        let payload = "# TYPE up gauge\nup 1\n";

        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("content-type", CONTENT_TYPE))
            .and(header("user-agent", USER_AGENT))
            .and(body_string(payload))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, 10);
        let delivery = client
            .send(Bytes::from_static(payload.as_bytes()))
            .await
            .expect("delivery should succeed");

        assert_eq!(delivery.status, StatusCode::OK);
        assert_eq!(delivery.bytes, payload.len());
    }

    #[tokio::test]
    async fn any_2xx_status_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let delivery = client_for(&server, 10).send(Bytes::new()).await.unwrap();
        assert_eq!(delivery.status, StatusCode::NO_CONTENT);
        assert_eq!(delivery.bytes, 0);
    }

    #[tokio::test]
    async fn non_2xx_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, 10)
            .send(Bytes::from_static(b"up 1\n"))
            .await
            .expect_err("503 must be a failure");

        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(err.body(), Some("overloaded"));
        assert_eq!(err.kind(), "status");
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "Unexpected status code 503: overloaded");
    }

    #[tokio::test]
    async fn client_errors_are_failures_too() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such hook"))
            .mount(&server)
            .await;

        let err = client_for(&server, 10)
            .send(Bytes::from_static(b"up 1\n"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.body(), Some("no such hook"));
    }

    #[tokio::test]
    async fn truncated_error_body_is_reported_not_dropped() {
        // Announces a 100 byte body, sends 5, then hangs up.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            stream
                .write_all(
                    b"HTTP/1.1 503 Service Unavailable\r\n\
                      content-length: 100\r\n\
                      connection: close\r\n\r\n\
                      short",
                )
                .unwrap();
        });

        let config = HookConfig::new(format!("http://127.0.0.1:{port}/hook"));
        let err = HookClient::from_config(&config)
            .unwrap()
            .send(Bytes::new())
            .await
            .expect_err("503 must be a failure");
        server.join().unwrap();

        assert!(matches!(err, DeliveryError::UnreadableBody { .. }));
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(err.kind(), "status");
        assert!(!err.is_transport());
        assert!(err
            .to_string()
            .starts_with("Unexpected status code 503, failed to read response body"));
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        // Reserve a port, then free it so nothing is listening there.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = HookConfig::new(format!("http://127.0.0.1:{port}/hook"));
        let client = HookClient::from_config(&config).unwrap();

        let err = client
            .send(Bytes::from_static(b"up 1\n"))
            .await
            .expect_err("nothing is listening");

        assert!(err.is_transport());
        assert_eq!(err.kind(), "transport");
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let err = client_for(&server, 1)
            .send(Bytes::from_static(b"up 1\n"))
            .await
            .expect_err("must time out");

        assert_eq!(err.kind(), "timeout");
        assert!(err.is_transport());
    }

    #[test]
    fn missing_endpoint_is_rejected_at_construction() {
        let err = HookClient::from_config(&HookConfig::default()).unwrap_err();
        assert!(matches!(err, HookConfigError::InvalidEndpoint { .. }));
    }

    #[test]
    fn exposes_bound_endpoint_and_timeout() {
        let config = HookConfig {
            endpoint: "https://collector.example.com/push".into(),
            timeout_secs: 7,
        };
        let client = HookClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint().as_str(), "https://collector.example.com/push");
        assert_eq!(client.timeout(), Duration::from_secs(7));
    }

    #[test]
    fn user_agent_is_fixed_identifier() {
        assert!(USER_AGENT.starts_with("relaybee/"));
    }
}
