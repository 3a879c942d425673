//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use dispatch_balancer::{Request, RequestHandler};

/// Collects every request handed to a backend, tagged with the backend id.
#[derive(Debug, Default)]
pub struct Recorder {
    deliveries: Mutex<Vec<(String, Request)>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn deliveries(&self) -> Vec<(String, Request)> {
        self.deliveries.lock().unwrap().clone()
    }

    pub fn count_for(&self, backend: &str) -> usize {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .filter(|(b, _)| b == backend)
            .count()
    }

    pub fn len(&self) -> usize {
        self.deliveries.lock().unwrap().len()
    }
}

/// Handler that appends to `recorder`.
pub fn recording_handler(recorder: Arc<Recorder>) -> impl RequestHandler + Clone {
    move |backend: &str, request: Request| {
        recorder
            .deliveries
            .lock()
            .unwrap()
            .push((backend.to_string(), request));
    }
}

/// Wait until the recorder has seen at least `expected` requests.
pub async fn wait_for_deliveries(recorder: &Recorder, expected: usize) {
    let waited = tokio::time::timeout(Duration::from_secs(5), async {
        while recorder.len() < expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(
        waited.is_ok(),
        "expected {} deliveries, saw {}",
        expected,
        recorder.len()
    );
}
