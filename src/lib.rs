//! In-process request dispatcher with a health-pruned backend pool.

pub mod config;
pub mod dispatch;
pub mod health;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;

pub use config::schema::BalancerConfig;
pub use dispatch::{DispatchHandle, Dispatcher};
pub use health::HealthMonitor;
pub use lifecycle::Shutdown;
pub use load_balancer::backend::{Backend, LoggingHandler, RequestHandler};
pub use load_balancer::registry::BackendRegistry;
pub use load_balancer::types::{DispatchError, RegistryError, Request, SelectionError};
