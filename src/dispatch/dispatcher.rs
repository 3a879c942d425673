//! Dispatcher loop and its submission handle.

use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use crate::load_balancer::SelectionPolicy;
use crate::load_balancer::registry::BackendRegistry;
use crate::load_balancer::types::{DispatchError, Request};
use crate::observability::metrics;

type Outcome = Result<String, DispatchError>;

/// A queued request plus the channel its outcome is reported on.
#[derive(Debug)]
struct Envelope {
    request: Request,
    reply: oneshot::Sender<Outcome>,
}

/// Routes requests from its inbound queue to backends in the registry.
#[derive(Debug)]
pub struct Dispatcher {
    rx: mpsc::Receiver<Envelope>,
    registry: Arc<BackendRegistry>,
    policy: Arc<dyn SelectionPolicy>,
}

/// Cloneable entry point for injecting work into a [`Dispatcher`].
#[derive(Debug, Clone)]
pub struct DispatchHandle {
    tx: mpsc::Sender<Envelope>,
}

impl DispatchHandle {
    /// Queue a request and wait until it has been handed to a backend.
    ///
    /// Returns the identity of the chosen backend.
    pub async fn submit(&self, request: Request) -> Result<String, DispatchError> {
        let (reply, outcome) = oneshot::channel();
        self.tx
            .send(Envelope { request, reply })
            .await
            .map_err(|_| DispatchError::DispatcherClosed)?;
        outcome.await.map_err(|_| DispatchError::DispatcherClosed)?
    }
}

impl Dispatcher {
    /// Create a dispatcher bound to `registry`. A capacity of zero is
    /// raised to one.
    pub fn new(
        registry: Arc<BackendRegistry>,
        policy: Arc<dyn SelectionPolicy>,
        queue_capacity: usize,
    ) -> (Self, DispatchHandle) {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        (
            Self { rx, registry, policy },
            DispatchHandle { tx },
        )
    }

    /// One dispatch step: snapshot, guard, select, forward.
    pub async fn dispatch(&self, request: Request) -> Result<String, DispatchError> {
        let members = self.registry.snapshot_alive().await;
        if members.is_empty() {
            return Err(DispatchError::EmptyPool);
        }

        let backend = self.policy.select(&members).map_err(|e| {
            tracing::error!(
                policy = self.policy.name(),
                required = self.policy.min_members(),
                available = members.len(),
                error = %e,
                "Selection policy rejected snapshot"
            );
            e
        })?;

        let backend_id = backend.id().to_string();
        tracing::debug!(
            request_id = %request.id,
            backend = %backend_id,
            "Forwarding request to backend"
        );
        backend.submit(request).await?;
        metrics::record_dispatch(&backend_id);
        Ok(backend_id)
    }

    /// Serve the inbound queue until shutdown or until every handle is
    /// dropped.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(policy = self.policy.name(), "Dispatcher running");

        loop {
            tokio::select! {
                next = self.rx.recv() => {
                    let Some(Envelope { request, reply }) = next else {
                        tracing::info!("All dispatch handles dropped, dispatcher exiting");
                        break;
                    };
                    let request_id = request.id;
                    // Forwarding may wait on a full backend queue.
                    let outcome = tokio::select! {
                        outcome = self.dispatch(request) => outcome,
                        _ = shutdown.recv() => {
                            tracing::info!(
                                request_id = %request_id,
                                "Dispatcher received shutdown signal while forwarding, exiting loop"
                            );
                            let _ = reply.send(Err(DispatchError::DispatcherClosed));
                            break;
                        }
                    };
                    if let Err(e) = &outcome {
                        tracing::warn!(request_id = %request_id, error = %e, "Dispatch failed");
                        metrics::record_dispatch_error(e.kind());
                    }
                    // The caller may have stopped waiting.
                    let _ = reply.send(outcome);
                }
                _ = shutdown.recv() => {
                    tracing::info!("Dispatcher received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::backend::{Backend, LoggingHandler};
    use crate::load_balancer::{RandomIndex, RandomPair};
    use crate::load_balancer::types::SelectionError;
    use std::time::Duration;

    #[tokio::test]
    async fn test_dispatch_on_empty_registry_fails_fast() {
        let registry = Arc::new(BackendRegistry::new());
        let (dispatcher, _handle) = Dispatcher::new(registry, Arc::new(RandomIndex::new()), 1);

        let err = dispatcher.dispatch(Request::new("hello")).await.unwrap_err();
        assert_eq!(err, DispatchError::EmptyPool);
    }

    #[tokio::test]
    async fn test_legacy_policy_rejects_single_member() {
        let (tx, rx) = broadcast::channel(1);
        let registry = Arc::new(BackendRegistry::new());
        let (a, _task) = Backend::spawn("A", 1, LoggingHandler, rx);
        registry.add(a).await.unwrap();

        let (dispatcher, _handle) = Dispatcher::new(registry, Arc::new(RandomPair::new()), 1);
        let err = dispatcher.dispatch(Request::new("hello")).await.unwrap_err();
        assert_eq!(
            err,
            DispatchError::Selection(SelectionError::Range { required: 2, available: 1 })
        );
        tx.send(()).unwrap();
    }

    #[tokio::test]
    async fn test_submit_reports_chosen_backend() {
        let (tx, rx) = broadcast::channel(1);
        let registry = Arc::new(BackendRegistry::new());
        let (a, _task) = Backend::spawn("A", 1, LoggingHandler, tx.subscribe());
        registry.add(a).await.unwrap();

        let (dispatcher, handle) = Dispatcher::new(registry, Arc::new(RandomIndex::new()), 1);
        let loop_task = tokio::spawn(dispatcher.run(rx));

        assert_eq!(handle.submit(Request::new("hello")).await.unwrap(), "A");

        tx.send(()).unwrap();
        loop_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_blocked_forward() {
        let (tx, rx) = broadcast::channel(1);
        let registry = Arc::new(BackendRegistry::new());
        // Nobody serves this worker, so its single slot never drains.
        let (a, _worker) = Backend::new("A", 1);
        registry.add(a).await.unwrap();

        let (dispatcher, handle) = Dispatcher::new(registry, Arc::new(RandomIndex::new()), 1);
        let loop_task = tokio::spawn(dispatcher.run(rx));

        assert_eq!(handle.submit(Request::new("fills-slot")).await.unwrap(), "A");

        let blocked = {
            let handle = handle.clone();
            tokio::spawn(async move { handle.submit(Request::new("blocked")).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!blocked.is_finished(), "second forward should be waiting on the full queue");

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(2), loop_task)
            .await
            .expect("dispatcher should exit while a forward is blocked")
            .unwrap();

        let outcome = blocked.await.unwrap();
        assert_eq!(outcome.unwrap_err(), DispatchError::DispatcherClosed);
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_reports_closed() {
        let (tx, rx) = broadcast::channel(1);
        let registry = Arc::new(BackendRegistry::new());
        let (dispatcher, handle) = Dispatcher::new(registry, Arc::new(RandomIndex::new()), 1);
        let loop_task = tokio::spawn(dispatcher.run(rx));

        tx.send(()).unwrap();
        loop_task.await.unwrap();

        let err = handle.submit(Request::new("late")).await.unwrap_err();
        assert_eq!(err, DispatchError::DispatcherClosed);
    }
}
