//! Active health sweeps.
//!
//! # Responsibilities
//! - Poll every registered backend's liveness on a fixed interval
//! - Replace the registry with the live subset
//! - Stop promptly on the shutdown signal

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};
use crate::config::HealthCheckConfig;
use crate::load_balancer::registry::BackendRegistry;
use crate::observability::metrics;

/// Outcome of a single sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Number of members polled.
    pub checked: usize,
    /// Identities removed from the registry, in registry order.
    pub evicted: Vec<String>,
}

pub struct HealthMonitor {
    registry: Arc<BackendRegistry>,
    config: HealthCheckConfig,
}

impl HealthMonitor {
    pub fn new(registry: Arc<BackendRegistry>, config: HealthCheckConfig) -> Self {
        Self { registry, config }
    }

    /// Sweep on every tick until shutdown. The first sweep happens one
    /// full interval after start.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Health sweeps disabled");
            return;
        }

        tracing::info!(
            interval_ms = self.config.interval_ms,
            timeout_ms = self.config.timeout_ms,
            "Health monitor starting"
        );

        let interval = Duration::from_millis(self.config.interval_ms.max(1));
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Poll every member and keep only the live ones.
    ///
    /// The registry lock is held from the first poll until the replacement,
    /// so dispatch never observes a half-filtered pool. A poll that does not
    /// answer within `timeout_ms` counts as dead.
    pub async fn sweep(&self) -> SweepReport {
        let timeout = Duration::from_millis(self.config.timeout_ms);
        let guard = self.registry.lock().await;
        let checked = guard.members().len();

        tracing::debug!(members = checked, "Checking health of backends");

        let mut alive = Vec::with_capacity(checked);
        let mut evicted = Vec::new();
        for backend in guard.members() {
            let healthy = match time::timeout(timeout, backend.is_alive()).await {
                Ok(healthy) => healthy,
                Err(_) => {
                    tracing::warn!(backend = %backend.id(), "Liveness check timed out");
                    false
                }
            };

            metrics::record_backend_health(backend.id(), healthy);
            if healthy {
                alive.push(backend.clone());
            } else {
                tracing::warn!(backend = %backend.id(), "Evicting dead backend");
                evicted.push(backend.id().to_string());
            }
        }

        let remaining = guard.prune_to(alive);
        metrics::record_health_sweep();
        tracing::info!(checked, alive = remaining, "Health sweep complete");

        SweepReport { checked, evicted }
    }
}
