//! relaybee-hook, the HTTP transport for relaybee
//!
//! Delivers Prometheus text exposition payloads to a single remote endpoint
//! with one `POST` per call. The crate owns everything about the wire side of
//! the forwarder: endpoint configuration and validation, the HTTP client with
//! its fixed timeout and user agent, and classification of every delivery
//! attempt into a [`Delivery`] or a [`DeliveryError`].
//!
//! Nothing is retried or buffered. A failed delivery is reported to the
//! caller and forgotten; the next attempt is whatever the caller sends next.
//!
//! ## Modules
//!
//! * `config`: `HookConfig`, loadable from TOML and validated with `validator`.
//! * `client`: `HookClient`, the stateless sender.
//! * `error`: configuration and delivery error types.

pub mod client;
pub mod config;
pub mod error;

pub use client::{Delivery, DeliveryOutcome, HookClient, CONTENT_TYPE, USER_AGENT};
pub use config::HookConfig;
pub use error::{DeliveryError, HookConfigError};
pub use reqwest::{StatusCode, Url};
