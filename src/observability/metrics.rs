//! Balancer metrics.
//!
//! # Metrics
//! - `balancer_requests_dispatched_total` (counter): by backend
//! - `balancer_dispatch_errors_total` (counter): by error kind
//! - `balancer_requests_handled_total` (counter): by backend
//! - `balancer_registry_size` (gauge): members eligible for routing
//! - `balancer_backend_health` (gauge): 1=alive, 0=dead, by backend
//! - `balancer_health_sweeps_total` (counter)

use ::metrics::{counter, gauge};

pub fn record_dispatch(backend: &str) {
    counter!("balancer_requests_dispatched_total", "backend" => backend.to_string()).increment(1);
}

pub fn record_dispatch_error(kind: &'static str) {
    counter!("balancer_dispatch_errors_total", "kind" => kind).increment(1);
}

pub fn record_request_handled(backend: &str) {
    counter!("balancer_requests_handled_total", "backend" => backend.to_string()).increment(1);
}

pub fn record_registry_size(size: usize) {
    gauge!("balancer_registry_size").set(size as f64);
}

pub fn record_backend_health(backend: &str, alive: bool) {
    let value = if alive { 1.0 } else { 0.0 };
    gauge!("balancer_backend_health", "backend" => backend.to_string()).set(value);
}

pub fn record_health_sweep() {
    counter!("balancer_health_sweeps_total").increment(1);
}
