//! relaybee, a lightweight host metrics forwarder
//!
//! This crate collects host metrics (CPU, memory, filesystems, network,
//! load, system identity), encodes them in the Prometheus text exposition
//! format 0.0.4 and pushes the payload to a single HTTP endpoint on a fixed
//! interval. It is designed for long-running unattended operation: runtime
//! failures are logged and the next tick starts fresh.
//!
//! ## Modules
//!
//! * `config`: Configuration structures, loading, validation, and defaults.
//!   Supports TOML configuration files with validation via the `validator` crate,
//!   with the destination URL and log level overridable from the command line.
//!
//! * `core`: Core runtime components:
//!   - Metrics source and the producer registry
//!   - Exposition encoder
//!   - Snapshot collector
//!   - Scheduling executor and its state tracker
//!
//! * `logger`: Centralized logging initialization using `tracing`.
//!   Supports console output in multiple formats (compact, pretty, JSON)
//!   and optional systemd journald integration.
//!
//! * `cli`: `clap` command-line definition.
//!
//! The HTTP side lives in the `relaybee-hook` workspace crate.
//!
//! ## Features
//!
//! * `journald`: Enables the systemd journald log output on Linux
//!   (default: enabled).

pub mod cli;
pub mod config;
pub mod core;
pub mod logger;
