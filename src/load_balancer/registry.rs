//! Backend registry.
//!
//! # Responsibilities
//! - Hold the ordered set of backends eligible for routing
//! - Append new backends, rejecting duplicate identities
//! - Replace the membership wholesale with a filtered subset
//!
//! # Design Decisions
//! - One lock guards the whole member list; readers always see either the
//!   list before a change or after it, never a partial one
//! - Membership changes only through `add` and `prune_to`

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use crate::load_balancer::backend::Backend;
use crate::load_balancer::types::RegistryError;
use crate::observability::metrics;

/// Lock-guarded, ordered collection of backend handles.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    members: Mutex<Vec<Arc<Backend>>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a backend. Fails only if its identity is already registered.
    pub async fn add(&self, backend: Arc<Backend>) -> Result<(), RegistryError> {
        let mut members = self.members.lock().await;
        if members.iter().any(|m| m.id() == backend.id()) {
            return Err(RegistryError::DuplicateBackend(backend.id().to_string()));
        }

        let id = backend.id().to_string();
        members.push(backend);
        let size = members.len();
        metrics::record_registry_size(size);
        tracing::info!(backend = %id, pool_size = size, "Backend registered");
        Ok(())
    }

    /// Copy of the members currently considered live, in registry order.
    pub async fn snapshot_alive(&self) -> Vec<Arc<Backend>> {
        self.members.lock().await.clone()
    }

    /// Atomically replace the membership with `subset`.
    pub async fn prune_to(&self, subset: Vec<Arc<Backend>>) -> usize {
        self.lock().await.prune_to(subset)
    }

    /// Hold the registry lock, for read-filter-replace sequences that must
    /// not interleave with other readers or writers.
    pub async fn lock(&self) -> RegistryGuard<'_> {
        RegistryGuard {
            members: self.members.lock().await,
        }
    }

    pub async fn len(&self) -> usize {
        self.members.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.members.lock().await.is_empty()
    }

    /// Identities of the current members, in order.
    pub async fn names(&self) -> Vec<String> {
        self.members
            .lock()
            .await
            .iter()
            .map(|b| b.id().to_string())
            .collect()
    }
}

/// Exclusive access to the member list.
pub struct RegistryGuard<'a> {
    members: MutexGuard<'a, Vec<Arc<Backend>>>,
}

impl RegistryGuard<'_> {
    pub fn members(&self) -> &[Arc<Backend>] {
        &self.members
    }

    /// Replace the members with `subset` and release the lock. Later
    /// duplicates of an identity are dropped. Returns the new size.
    pub fn prune_to(mut self, mut subset: Vec<Arc<Backend>>) -> usize {
        let mut seen = HashSet::new();
        subset.retain(|b| seen.insert(b.id().to_string()));

        *self.members = subset;
        let size = self.members.len();
        metrics::record_registry_size(size);
        size
    }
}
