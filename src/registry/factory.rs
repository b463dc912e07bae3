//! Backend constructors keyed by backend tag.

use crate::provider::adapters::{InMemoryTaskProvider, MEMORY_BACKEND};
use crate::provider::domain::{AdapterConfig, ProviderError, ProviderResult};
use crate::provider::ports::SharedProvider;
use crate::youtrack::{YOUTRACK_BACKEND, YouTrackProvider};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds an adapter from its configuration.
pub type ProviderFactory =
    Arc<dyn Fn(&AdapterConfig) -> ProviderResult<SharedProvider> + Send + Sync>;

/// Explicit map from backend tag to constructor.
///
/// Nothing registers itself: callers start from [`ProviderFactories::new`]
/// or [`ProviderFactories::with_builtin`] and add what they need.
#[derive(Clone, Default)]
pub struct ProviderFactories {
    factories: HashMap<String, ProviderFactory>,
}

impl ProviderFactories {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map holding the bundled `youtrack` and `memory` backends.
    #[must_use]
    pub fn with_builtin() -> Self {
        Self::new()
            .with(YOUTRACK_BACKEND, |config| {
                Ok(Arc::new(YouTrackProvider::from_config(config)?) as SharedProvider)
            })
            .with(MEMORY_BACKEND, |config| {
                Ok(Arc::new(InMemoryTaskProvider::from_config(config)?) as SharedProvider)
            })
    }

    /// Registers `factory` under `backend`, replacing any previous one.
    pub fn register<F>(&mut self, backend: impl Into<String>, factory: F)
    where
        F: Fn(&AdapterConfig) -> ProviderResult<SharedProvider> + Send + Sync + 'static,
    {
        self.factories.insert(backend.into(), Arc::new(factory));
    }

    /// Builder form of [`ProviderFactories::register`].
    #[must_use]
    pub fn with<F>(mut self, backend: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&AdapterConfig) -> ProviderResult<SharedProvider> + Send + Sync + 'static,
    {
        self.register(backend, factory);
        self
    }

    /// Returns whether a constructor exists for `backend`.
    #[must_use]
    pub fn contains(&self, backend: &str) -> bool {
        self.factories.contains_key(backend)
    }

    /// Returns the registered backend tags, sorted.
    #[must_use]
    pub fn backends(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Builds the adapter described by `config`.
    ///
    /// # Errors
    ///
    /// Returns a `configuration` error for an unknown backend tag, or the
    /// constructor's own error.
    pub fn build(&self, config: &AdapterConfig) -> ProviderResult<SharedProvider> {
        let factory = self.factories.get(&config.backend).ok_or_else(|| {
            ProviderError::configuration(format!(
                "unknown backend '{}' for provider '{}'",
                config.backend, config.name
            ))
            .with_context("backend", &config.backend)
            .with_context("provider", &config.name)
        })?;
        factory(config)
    }
}

impl fmt::Debug for ProviderFactories {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ProviderFactories")
            .field("backends", &self.backends())
            .finish()
    }
}
