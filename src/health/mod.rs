//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Periodic timer (active.rs)
//!     → lock registry
//!     → poll is_alive() on each member (bounded wait per member)
//!     → replace registry with the live subset
//!     → release lock
//! ```
//!
//! # Design Decisions
//! - Eviction is immediate: one failed poll removes a backend
//! - Evicted workers are not stopped; they only leave the routing pool
//! - The sweep shares nothing with the request path except the registry

pub mod active;

pub use active::{HealthMonitor, SweepReport};
