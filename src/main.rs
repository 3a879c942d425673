//! dispatch-balancer
//!
//! Runs a dispatcher over a pool of in-process backend workers and prunes
//! dead backends on a fixed interval.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller ──submit──▶ ┌────────────┐   snapshot   ┌──────────────┐
//!                      │ dispatcher │─────────────▶│   registry   │◀──── prune_to ──┐
//!                      └─────┬──────┘              └──────────────┘                 │
//!                            │ select + forward                                     │
//!                            ▼                                               ┌──────┴───────┐
//!              ┌──────────┐ ┌──────────┐                                     │    health    │
//!              │backend A │ │backend B │ ◀──────── is_alive() ───────────────│   monitor    │
//!              └──────────┘ └──────────┘                                     └──────────────┘
//! ```

use std::path::PathBuf;
use clap::Parser;
use dispatch_balancer::config::{self, BalancerConfig, ConfigError};
use dispatch_balancer::lifecycle::{self, signals, Shutdown};
use dispatch_balancer::observability::logging;
use dispatch_balancer::{LoggingHandler, Request};

#[derive(Parser, Debug)]
#[command(name = "dispatch-balancer")]
#[command(about = "Dispatch requests across a health-checked pool of backend workers", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of demo requests to submit after startup.
    #[arg(short = 'n', long, default_value_t = 3)]
    requests: usize,

    /// Override the health sweep interval.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Override the log level.
    #[arg(long)]
    log_level: Option<String>,
}

/// Read the config file, or fall back to defaults. Not yet validated.
fn read_base(cli: &Cli) -> Result<BalancerConfig, ConfigError> {
    match &cli.config {
        Some(path) => config::read_config(path),
        None => Ok(BalancerConfig::default()),
    }
}

/// Log level to start with: CLI flag, then config file, then `info`.
fn startup_log_level(cli: &Cli, base: Option<&BalancerConfig>) -> String {
    cli.log_level
        .clone()
        .or_else(|| base.map(|c| c.observability.log_level.clone()))
        .unwrap_or_else(|| "info".to_string())
}

/// Apply CLI overrides, then validate once.
fn finalize_config(mut config: BalancerConfig, cli: &Cli) -> Result<BalancerConfig, ConfigError> {
    if let Some(interval_ms) = cli.interval_ms {
        config.health_check.interval_ms = interval_ms;
    }
    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }
    config::validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let base = read_base(&cli);
    logging::init(&startup_log_level(&cli, base.as_ref().ok()));

    let config = base
        .and_then(|config| finalize_config(config, &cli))
        .map_err(|e| {
            tracing::error!(error = %e, "Configuration rejected");
            e
        })?;

    tracing::info!("dispatch-balancer v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    let balancer = lifecycle::start(&config, LoggingHandler, &shutdown).await?;

    for i in 0..cli.requests {
        let request = Request::new(format!("request-{}", i));
        let request_id = request.id;
        match balancer.dispatcher.submit(request).await {
            Ok(backend) => tracing::info!(request_id = %request_id, backend = %backend, "Request dispatched"),
            Err(e) => tracing::warn!(request_id = %request_id, error = %e, "Request rejected"),
        }
    }

    tracing::info!("Waiting for shutdown signal");
    signals::wait_for_signal().await;

    shutdown.trigger();
    balancer.join().await;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_are_validated() {
        let cli = Cli::parse_from(["dispatch-balancer", "--interval-ms", "0"]);
        let base = read_base(&cli).unwrap();
        let err = finalize_config(base, &cli).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_overrides_applied_to_defaults() {
        let cli = Cli::parse_from(["dispatch-balancer", "--interval-ms", "250", "--log-level", "debug"]);
        let config = finalize_config(read_base(&cli).unwrap(), &cli).unwrap();
        assert_eq!(config.health_check.interval_ms, 250);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_startup_log_level_precedence() {
        let mut base = BalancerConfig::default();
        base.observability.log_level = "warn".to_string();

        let cli = Cli::parse_from(["dispatch-balancer"]);
        assert_eq!(startup_log_level(&cli, Some(&base)), "warn");
        assert_eq!(startup_log_level(&cli, None), "info");

        let cli = Cli::parse_from(["dispatch-balancer", "--log-level", "trace"]);
        assert_eq!(startup_log_level(&cli, Some(&base)), "trace");
    }
}
