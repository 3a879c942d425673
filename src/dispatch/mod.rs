//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! caller → DispatchHandle::submit
//!     → dispatcher inbound queue
//!     → Dispatcher::run loop
//!     → registry snapshot → selection policy
//!     → Backend::submit (chosen worker's queue)
//!     → outcome returned to the caller
//! ```
//!
//! # Design Decisions
//! - The dispatcher owns its inbound queue; callers only hold handles
//! - Every submit carries a reply channel, so an empty pool is reported to
//!   the caller instead of being dropped inside the loop
//! - Forwarding waits on the backend queue; backpressure propagates to
//!   the caller

pub mod dispatcher;

pub use dispatcher::{DispatchHandle, Dispatcher};
