//! Outcome of registry start-up.

use crate::provider::domain::{HealthSnapshot, HealthStatus, ProviderError, ProviderName};
use std::collections::BTreeMap;

/// Per-adapter results of [`ProviderRegistry::initialize`].
///
/// A failing adapter never aborts the others; its error is kept here.
///
/// [`ProviderRegistry::initialize`]: super::ProviderRegistry::initialize
#[derive(Debug, Clone, Default)]
pub struct InitializationReport {
    /// Recorded health of every checked adapter.
    pub health: BTreeMap<ProviderName, HealthSnapshot>,
    /// Errors of adapters whose check failed or timed out.
    pub failures: BTreeMap<ProviderName, ProviderError>,
}

impl InitializationReport {
    /// Returns whether every checked adapter passed.
    #[must_use]
    pub fn all_healthy(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the health status recorded for `name`.
    #[must_use]
    pub fn status_of(&self, name: &str) -> Option<HealthStatus> {
        self.health.get(name).map(HealthSnapshot::status)
    }

    /// Returns the error recorded for `name`.
    #[must_use]
    pub fn failure_of(&self, name: &str) -> Option<&ProviderError> {
        self.failures.get(name)
    }

    /// Returns the number of adapters checked.
    #[must_use]
    pub fn checked(&self) -> usize {
        self.health.len()
    }

    pub(crate) fn record(
        &mut self,
        name: ProviderName,
        health: HealthSnapshot,
        outcome: Result<(), ProviderError>,
    ) {
        if let Err(error) = outcome {
            self.failures.insert(name.clone(), error);
        }
        self.health.insert(name, health);
    }
}
