//! Domain model for provider adapters.
//!
//! Holds the error taxonomy, capability and health vocabulary, adapter
//! metadata, and typed adapter configuration.

mod bulk;
mod capability;
pub mod config;
mod error;
mod health;
mod info;
mod name;
mod validation;

pub use bulk::BulkFailure;
pub use capability::{Capability, CapabilitySet};
pub use config::{
    AdapterConfig, AuthConfig, CachePolicy, ConnectionConfig, RateLimitConfig, RegistryConfig,
    RetryPolicy,
};
pub use error::{ErrorKind, ProviderError, ProviderResult};
pub use health::{HealthSnapshot, HealthStatus};
pub use info::{ProviderDescriptor, ProviderInfo};
pub use name::{ProviderName, ProviderNameError};
pub use validation::validate_task;
