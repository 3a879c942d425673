//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single backend worker with a private inbound queue
//! - Drain the queue and hand each request to the opaque handler
//! - Track liveness (read and written only under its own lock)
//!
//! # Design Decisions
//! - The queue is a bounded mpsc channel; a full queue blocks the sender,
//!   which is how a slow backend pushes back on the dispatcher
//! - The worker stops on the shutdown signal or once every `Backend`
//!   handle has been dropped and the queue closes

use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;
use crate::load_balancer::types::{DispatchError, Request};
use crate::observability::metrics;

/// Business logic a backend runs for each request. The core never
/// observes a result.
pub trait RequestHandler: Send + Sync + 'static {
    fn handle(&self, backend: &str, request: Request);
}

impl<F> RequestHandler for F
where
    F: Fn(&str, Request) + Send + Sync + 'static,
{
    fn handle(&self, backend: &str, request: Request) {
        self(backend, request)
    }
}

/// Handler that only logs what it receives.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl RequestHandler for LoggingHandler {
    fn handle(&self, backend: &str, request: Request) {
        tracing::info!(
            backend = %backend,
            request_id = %request.id,
            payload = %request.payload,
            "Handling request"
        );
    }
}

/// Handle to a single backend worker.
#[derive(Debug)]
pub struct Backend {
    /// Identity, unique within a registry and fixed for the backend's lifetime.
    id: String,
    /// Liveness flag.
    alive: Mutex<bool>,
    /// Sending half of the worker's inbound queue.
    tx: mpsc::Sender<Request>,
}

impl Backend {
    /// Create a backend and the worker that must be served for it to
    /// accept requests. A capacity of zero is raised to one.
    pub fn new(id: impl Into<String>, queue_capacity: usize) -> (Arc<Self>, BackendWorker) {
        let id = id.into();
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let backend = Arc::new(Self {
            id: id.clone(),
            alive: Mutex::new(true),
            tx,
        });
        (backend, BackendWorker { id, rx })
    }

    /// Create a backend and launch its serve loop on the runtime.
    pub fn spawn<H: RequestHandler>(
        id: impl Into<String>,
        queue_capacity: usize,
        handler: H,
        shutdown: broadcast::Receiver<()>,
    ) -> (Arc<Self>, JoinHandle<()>) {
        let (backend, worker) = Self::new(id, queue_capacity);
        let task = tokio::spawn(worker.serve(handler, shutdown));
        (backend, task)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current liveness flag. No side effects.
    pub async fn is_alive(&self) -> bool {
        *self.alive.lock().await
    }

    /// Flip the liveness flag.
    pub async fn set_alive(&self, alive: bool) {
        let mut flag = self.alive.lock().await;
        if *flag != alive {
            tracing::info!(backend = %self.id, alive, "Backend liveness changed");
        }
        *flag = alive;
    }

    /// Hold the liveness lock so `is_alive` cannot answer.
    #[cfg(test)]
    pub(crate) async fn hold_liveness(&self) -> tokio::sync::MutexGuard<'_, bool> {
        self.alive.lock().await
    }

    /// Enqueue a request, waiting while the queue is full.
    pub async fn submit(&self, request: Request) -> Result<(), DispatchError> {
        self.tx
            .send(request)
            .await
            .map_err(|_| DispatchError::BackendClosed {
                backend: self.id.clone(),
            })
    }
}

/// Receiving side of a backend, consumed by [`BackendWorker::serve`].
#[derive(Debug)]
pub struct BackendWorker {
    id: String,
    rx: mpsc::Receiver<Request>,
}

impl BackendWorker {
    /// Drain the inbound queue in FIFO order until shutdown or until the
    /// queue closes.
    pub async fn serve<H: RequestHandler>(mut self, handler: H, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(backend = %self.id, "Backend worker running");

        loop {
            tokio::select! {
                next = self.rx.recv() => {
                    let Some(request) = next else {
                        tracing::info!(backend = %self.id, "Backend queue closed, worker exiting");
                        break;
                    };
                    tracing::debug!(backend = %self.id, request_id = %request.id, "Backend received request");
                    metrics::record_request_handled(&self.id);
                    handler.handle(&self.id, request);
                }
                _ = shutdown.recv() => {
                    tracing::info!(backend = %self.id, "Backend worker received shutdown signal");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    fn recording_handler() -> (Arc<StdMutex<Vec<(String, String)>>>, impl RequestHandler) {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = seen.clone();
        let handler = move |backend: &str, request: Request| {
            sink.lock().unwrap().push((backend.to_string(), request.payload));
        };
        (seen, handler)
    }

    #[tokio::test]
    async fn test_is_alive_is_idempotent() {
        let (backend, _worker) = Backend::new("a", 1);
        assert!(backend.is_alive().await);
        assert!(backend.is_alive().await);

        backend.set_alive(false).await;
        assert!(!backend.is_alive().await);
        assert!(!backend.is_alive().await);
    }

    #[tokio::test]
    async fn test_serve_preserves_fifo() {
        let (tx, rx) = broadcast::channel(1);
        let (seen, handler) = recording_handler();
        let (backend, task) = Backend::spawn("a", 1, handler, rx);

        for i in 0..5 {
            backend.submit(Request::new(format!("r{}", i))).await.unwrap();
        }

        for _ in 0..100 {
            if seen.lock().unwrap().len() == 5 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let payloads: Vec<String> = seen.lock().unwrap().iter().map(|(_, p)| p.clone()).collect();
        assert_eq!(payloads, vec!["r0", "r1", "r2", "r3", "r4"]);
        assert!(seen.lock().unwrap().iter().all(|(b, _)| b == "a"));

        tx.send(()).unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_exits_when_handles_dropped() {
        let (_tx, rx) = broadcast::channel::<()>(1);
        let (backend, task) = Backend::spawn("a", 1, LoggingHandler, rx);
        drop(backend);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("worker should stop once its queue closes")
            .unwrap();
    }

    #[tokio::test]
    async fn test_submit_to_stopped_worker_fails() {
        let (tx, rx) = broadcast::channel(1);
        let (backend, task) = Backend::spawn("a", 1, LoggingHandler, rx);
        tx.send(()).unwrap();
        task.await.unwrap();

        let err = backend.submit(Request::new("late")).await.unwrap_err();
        assert_eq!(err, DispatchError::BackendClosed { backend: "a".into() });
    }
}
