//! Shared world state for provider registry BDD scenarios.

use rstest::fixture;
use std::sync::Arc;
use trackbridge::provider::adapters::InMemoryTaskProvider;
use trackbridge::provider::domain::{ProviderError, ProviderInfo, ProviderResult};
use trackbridge::provider::ports::SharedProvider;
use trackbridge::registry::{InitializationReport, ProviderFactories, ProviderRegistry};

/// Backend tag whose adapters fail every health check.
pub const FAILING_BACKEND: &str = "failing";

/// Scenario world for provider registry behaviour tests.
pub struct RegistryWorld {
    /// The registry under test.
    pub registry: ProviderRegistry,
    /// Result of the last `add` call made by a `when` step.
    pub last_add: Option<ProviderResult<ProviderInfo>>,
    /// Result of the last `list` call.
    pub listed: Vec<ProviderInfo>,
    /// Report of the last initialization.
    pub report: Option<InitializationReport>,
}

impl RegistryWorld {
    /// Creates a world around an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(ProviderRegistry::new(factories()))
    }

    /// Creates a world around `registry`.
    #[must_use]
    pub const fn with_registry(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            last_add: None,
            listed: Vec::new(),
            report: None,
        }
    }
}

impl Default for RegistryWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RegistryWorld {
    RegistryWorld::default()
}

/// Built-in factories plus a backend whose health checks always fail.
#[must_use]
pub fn factories() -> ProviderFactories {
    ProviderFactories::with_builtin().with(FAILING_BACKEND, |config| {
        let provider = InMemoryTaskProvider::from_config(config)?;
        provider.set_unhealthy(Some(ProviderError::network("backend unreachable")))?;
        Ok(Arc::new(provider) as SharedProvider)
    })
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
