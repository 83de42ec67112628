//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;

/// Collects host metrics and forwards them as Prometheus text to an HTTP endpoint.
#[derive(Debug, Clone, Parser)]
#[command(name = "relaybee", version, about)]
pub struct Cli {
    /// Destination URL for metric payloads.
    #[arg(long, env = "HOOK_URL", value_name = "URL")]
    pub hook_url: Option<String>,

    /// Path to the TOML configuration file.
    #[arg(short, long, env = "RELAYBEE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "RELAYBEE_LOG_LEVEL", value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_path: self.config.clone(),
            hook_url: self.hook_url.clone(),
            log_level: self.log_level.clone(),
        }
    }
}
