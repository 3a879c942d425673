//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Backends, dispatcher, registry and health monitor produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Request id travels in every dispatch-path log event
//! - No exporter is bundled; metrics are no-ops until the host process
//!   installs a recorder

pub mod logging;
pub mod metrics;
