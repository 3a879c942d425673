//! Shutdown coordination for worker loops.

use tokio::sync::broadcast;

/// Coordinator for cooperative shutdown.
///
/// Backend workers, the dispatcher and the health monitor each hold a
/// receiver and leave their loops once the signal is sent.
#[derive(Debug)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for a new worker loop.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscribed loop. Sending with no subscribers is not an
    /// error.
    pub fn trigger(&self) {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::info!(loops = notified, "Shutdown triggered");
    }

    /// Number of receivers still alive.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
