//! Startup orchestration.
//!
//! # Responsibilities
//! - Spawn one worker per configured backend, then register it
//! - Spawn the dispatcher and the health monitor over the same registry
//! - Hand back the handles the surrounding process needs

use std::sync::Arc;
use tokio::task::JoinHandle;
use crate::config::BalancerConfig;
use crate::dispatch::{DispatchHandle, Dispatcher};
use crate::health::HealthMonitor;
use crate::lifecycle::Shutdown;
use crate::load_balancer::backend::{Backend, RequestHandler};
use crate::load_balancer::build_policy;
use crate::load_balancer::registry::BackendRegistry;
use crate::load_balancer::types::RegistryError;

/// A running balancer session.
#[derive(Debug)]
pub struct Balancer {
    /// Shared pool membership.
    pub registry: Arc<BackendRegistry>,
    /// Entry point for new work.
    pub dispatcher: DispatchHandle,
    /// Every backend started for this session, including evicted ones.
    pub backends: Vec<Arc<Backend>>,
    tasks: Vec<JoinHandle<()>>,
}

impl Balancer {
    /// Look up a started backend by identity.
    pub fn backend(&self, id: &str) -> Option<&Arc<Backend>> {
        self.backends.iter().find(|b| b.id() == id)
    }

    /// Wait for every spawned loop to finish. Call after triggering
    /// shutdown.
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Worker task failed");
            }
        }
    }
}

/// Start all subsystems in dependency order. `config` is expected to have
/// passed validation. On error every worker spawned so far is aborted.
pub async fn start<H>(
    config: &BalancerConfig,
    handler: H,
    shutdown: &Shutdown,
) -> Result<Balancer, RegistryError>
where
    H: RequestHandler + Clone,
{
    let registry = Arc::new(BackendRegistry::new());
    let mut backends = Vec::with_capacity(config.backends.len());
    let mut tasks = Vec::with_capacity(config.backends.len() + 2);

    for backend_config in &config.backends {
        let (backend, task) = Backend::spawn(
            backend_config.name.clone(),
            config.backend.queue_capacity,
            handler.clone(),
            shutdown.subscribe(),
        );
        tasks.push(task);
        backend.set_alive(backend_config.alive).await;
        if let Err(e) = registry.add(backend.clone()).await {
            tracing::error!(error = %e, "Startup aborted, stopping spawned workers");
            for task in &tasks {
                task.abort();
            }
            return Err(e);
        }
        backends.push(backend);
    }

    let policy = build_policy(config.dispatcher.policy);
    let (dispatcher, handle) = Dispatcher::new(
        registry.clone(),
        policy,
        config.dispatcher.queue_capacity,
    );
    tasks.push(tokio::spawn(dispatcher.run(shutdown.subscribe())));

    let monitor = HealthMonitor::new(registry.clone(), config.health_check.clone());
    tasks.push(tokio::spawn(monitor.run(shutdown.subscribe())));

    tracing::info!(
        backends = backends.len(),
        policy = ?config.dispatcher.policy,
        "Balancer started"
    );

    Ok(Balancer {
        registry,
        dispatcher: handle,
        backends,
        tasks,
    })
}
