//! Configuration validation.
//!
//! Returns every violation found, not just the first.

use std::collections::HashSet;
use thiserror::Error;
use crate::config::schema::{BalancerConfig, PolicyKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend name must not be empty")]
    EmptyBackendName,

    #[error("backend {0} is defined more than once")]
    DuplicateBackend(String),

    #[error("{0} queue capacity must be greater than zero")]
    ZeroQueueCapacity(&'static str),

    #[error("health check {0} must be greater than zero")]
    ZeroHealthDuration(&'static str),

    #[error("log level must not be empty")]
    EmptyLogLevel,

    #[error("random_pair policy needs at least 2 backends, {0} configured")]
    TooFewBackendsForPolicy(usize),
}

/// Check a parsed config for semantic errors.
pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for backend in &config.backends {
        if backend.name.trim().is_empty() {
            errors.push(ValidationError::EmptyBackendName);
        } else if !seen.insert(backend.name.as_str()) {
            errors.push(ValidationError::DuplicateBackend(backend.name.clone()));
        }
    }

    if config.dispatcher.queue_capacity == 0 {
        errors.push(ValidationError::ZeroQueueCapacity("dispatcher"));
    }
    if config.backend.queue_capacity == 0 {
        errors.push(ValidationError::ZeroQueueCapacity("backend"));
    }

    if config.health_check.enabled {
        if config.health_check.interval_ms == 0 {
            errors.push(ValidationError::ZeroHealthDuration("interval_ms"));
        }
        if config.health_check.timeout_ms == 0 {
            errors.push(ValidationError::ZeroHealthDuration("timeout_ms"));
        }
    }

    if config.observability.log_level.trim().is_empty() {
        errors.push(ValidationError::EmptyLogLevel);
    }

    if config.dispatcher.policy == PolicyKind::RandomPair && config.backends.len() < 2 {
        errors.push(ValidationError::TooFewBackendsForPolicy(config.backends.len()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
