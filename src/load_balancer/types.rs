//! Shared request and error types for the dispatch path.

use thiserror::Error;
use uuid::Uuid;

/// A unit of work routed through the balancer.
///
/// The payload is opaque to the core; the id only serves log correlation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Correlation id (UUID v4).
    pub id: Uuid,
    /// Opaque payload handed to the backend handler.
    pub payload: String,
}

impl Request {
    /// Wrap a payload in a new request with a fresh id.
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload: payload.into(),
        }
    }
}

impl From<&str> for Request {
    fn from(payload: &str) -> Self {
        Self::new(payload)
    }
}

impl From<String> for Request {
    fn from(payload: String) -> Self {
        Self::new(payload)
    }
}

/// Selection policy invoked with fewer members than it requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("selection requires at least {required} backends, snapshot has {available}")]
    Range { required: usize, available: usize },
}

/// Errors surfaced to callers of the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("no live backends in the pool")]
    EmptyPool,

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("backend {backend} is no longer accepting requests")]
    BackendClosed { backend: String },

    #[error("dispatcher is not running")]
    DispatcherClosed,
}

impl DispatchError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::EmptyPool => "empty_pool",
            DispatchError::Selection(_) => "selection_range",
            DispatchError::BackendClosed { .. } => "backend_closed",
            DispatchError::DispatcherClosed => "dispatcher_closed",
        }
    }
}

/// Errors from registry membership changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("backend {0} is already registered")]
    DuplicateBackend(String),
}
