//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a balancer session.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Dispatcher queue and selection policy.
    pub dispatcher: DispatcherConfig,

    /// Settings shared by every backend worker.
    pub backend: BackendWorkerConfig,

    /// Health sweep settings.
    pub health_check: HealthCheckConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Backends started and registered at startup.
    pub backends: Vec<BackendConfig>,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            dispatcher: DispatcherConfig::default(),
            backend: BackendWorkerConfig::default(),
            health_check: HealthCheckConfig::default(),
            observability: ObservabilityConfig::default(),
            backends: vec![
                BackendConfig { name: "A".to_string(), alive: true },
                BackendConfig { name: "B".to_string(), alive: true },
            ],
        }
    }
}

/// Which selection policy the dispatcher applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// `members[random % len]`.
    #[default]
    RandomIndex,
    /// Even draw → first member, odd draw → second. Needs two members.
    RandomPair,
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Inbound queue capacity. Submitters wait once it is full.
    pub queue_capacity: usize,

    /// Selection policy.
    pub policy: PolicyKind,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1,
            policy: PolicyKind::default(),
        }
    }
}

/// Backend worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendWorkerConfig {
    /// Per-backend inbound queue capacity.
    pub queue_capacity: usize,
}

impl Default for BackendWorkerConfig {
    fn default() -> Self {
        Self { queue_capacity: 1 }
    }
}

/// A backend to start.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Unique backend identifier.
    pub name: String,

    /// Initial liveness flag.
    #[serde(default = "default_alive")]
    pub alive: bool,
}

fn default_alive() -> bool {
    true
}

/// Health sweep configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Enable periodic sweeps.
    pub enabled: bool,

    /// Sweep interval in milliseconds.
    pub interval_ms: u64,

    /// Upper bound on a single liveness poll in milliseconds.
    pub timeout_ms: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 3000,
            timeout_ms: 500,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
