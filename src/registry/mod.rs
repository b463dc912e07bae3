//! Named provider registry.
//!
//! Adapters are built from configuration through an explicit
//! [`ProviderFactories`] map, health-checked concurrently at start-up, and
//! looked up by name. One adapter may be marked as the default.
//!
//! - Entry lifecycle in [`EntryState`]
//! - Backend constructors in [`ProviderFactories`]
//! - Orchestration in [`ProviderRegistry`]

mod entry;
mod factory;
mod report;
mod service;

pub use entry::{EntryState, RegistryEntry};
pub use factory::{ProviderFactories, ProviderFactory};
pub use report::InitializationReport;
pub use service::ProviderRegistry;

#[cfg(test)]
mod tests;
