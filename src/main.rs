use std::{collections::BTreeSet, process, sync::Arc};

use clap::Parser;
use relaybee::{
    cli::Cli,
    config::{metrics::MetricsConfig, Config},
    core::{
        collector::Collector,
        collectors::{platform_source, CollectorRegistry},
        executor::Executor,
        status::SchedulerStatus,
    },
    logger::LoggerManager,
    print_error,
};
use relaybee_hook::HookClient;
use tracing::{debug, error, info, info_span};

fn log_collectors_table(metrics: &MetricsConfig, available: Vec<&'static str>) {
    let configured: BTreeSet<&str> = metrics
        .collectors
        .iter()
        .flatten()
        .map(String::as_str)
        .collect();
    let all_names: BTreeSet<&str> = available.iter().copied().chain(configured).collect();

    let name_width = all_names
        .iter()
        .map(|s| s.len())
        .max()
        .unwrap_or(10)
        .max("Collector".len());

    info!("{:<width$} | Status", "Collector", width = name_width);
    info!("{}-+-{}", "-".repeat(name_width), "-".repeat(12));

    for name in all_names {
        let status = match (metrics.is_enabled(name), available.contains(&name)) {
            (true, true) => "ENABLED",
            // Rejected during config validation; listed for completeness.
            (true, false) => "ENABLED (missing)",
            (false, _) => "DISABLED",
        };
        info!("{:<width$} | {}", name, status, width = name_width);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cfg = Config::resolve(&cli.overrides()).unwrap_or_else(|e| {
        print_error!("{}", e);
        process::exit(1);
    });

    let logger_manager = LoggerManager::new(cfg.logger.clone()).unwrap_or_else(|e| {
        print_error!("Failed to setup Log Manager: {}", e);
        process::exit(1);
    });
    logger_manager.init().unwrap_or_else(|e| {
        print_error!("Failed to init Log Manager: {}", e);
        process::exit(1);
    });

    let client = HookClient::from_config(&cfg.transport).unwrap_or_else(|e| {
        error!("Failed to create HTTP client: {}", e);
        process::exit(1);
    });

    let source = platform_source(cfg.metrics.enabled_names());

    info!("Starting relaybee version {}...", env!("CARGO_PKG_VERSION"));
    info!("Target endpoint: {}", client.endpoint());
    info!("Platform: {}", source.platform());
    info!(
        "Collection interval: {}s, request timeout: {}s",
        cfg.metrics.interval,
        client.timeout().as_secs()
    );
    info!("Log level: {}", cfg.logger.level);
    debug!("{:#?}", cfg);
    log_collectors_table(&cfg.metrics, CollectorRegistry::available());

    let span = info_span!("forwarder");
    let collector = Collector::with_span(source, span.clone());
    let executor = Executor::with_span(
        collector,
        Arc::new(client),
        cfg.metrics.interval(),
        SchedulerStatus::new(),
        span,
    );

    tokio::select! {
        _ = executor.run() => {
            error!("Executor unexpectedly finished");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }
    Ok(())
}
