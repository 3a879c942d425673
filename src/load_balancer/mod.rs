//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher receives a request
//!     → registry.rs (snapshot the live members)
//!     → Apply the selection policy:
//!         - random_index.rs (random draw modulo pool size)
//!         - random_pair.rs (legacy even/odd pick between the first two)
//!     → backend.rs (enqueue on the chosen worker)
//! ```
//!
//! # Design Decisions
//! - Policies are stateless; the registry owns membership
//! - The dispatcher guards against an empty snapshot before selecting
//! - Policies declare how many members they need so the guard can be exact

pub mod backend;
pub mod random_index;
pub mod random_pair;
pub mod registry;
pub mod types;

use std::fmt::Debug;
use std::sync::Arc;
use crate::config::PolicyKind;
use crate::load_balancer::backend::Backend;
use crate::load_balancer::types::SelectionError;

pub use random_index::RandomIndex;
pub use random_pair::RandomPair;

/// Maps a registry snapshot to one of its members.
pub trait SelectionPolicy: Send + Sync + Debug {
    /// Choose a member of `members`. The returned backend is always one
    /// of the handles passed in.
    fn select(&self, members: &[Arc<Backend>]) -> Result<Arc<Backend>, SelectionError>;

    /// Smallest snapshot this policy can select from.
    fn min_members(&self) -> usize;

    fn name(&self) -> &'static str;
}

/// Build the policy named in configuration.
pub fn build_policy(kind: PolicyKind) -> Arc<dyn SelectionPolicy> {
    match kind {
        PolicyKind::RandomIndex => Arc::new(RandomIndex::new()),
        PolicyKind::RandomPair => Arc::new(RandomPair::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_policy_matches_kind() {
        assert_eq!(build_policy(PolicyKind::RandomIndex).name(), "random_index");
        assert_eq!(build_policy(PolicyKind::RandomPair).name(), "random_pair");
        assert_eq!(build_policy(PolicyKind::RandomPair).min_members(), 2);
    }
}
