//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → BalancerConfig (validated)
//!     → lifecycle::start wires the session from it
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_config, ConfigError};
pub use schema::{
    BackendConfig, BackendWorkerConfig, BalancerConfig, DispatcherConfig, HealthCheckConfig,
    ObservabilityConfig, PolicyKind,
};
pub use validation::{validate_config, ValidationError};
