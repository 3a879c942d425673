//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → spawn backend workers → register them
//!         → spawn dispatcher → spawn health monitor
//!
//! Shutdown (shutdown.rs):
//!     trigger() → every worker loop observes the broadcast and exits
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Backends are serving before they become routable
//! - One broadcast channel reaches every long-running loop
//! - Dropping the coordinator counts as a shutdown signal

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{start, Balancer};
