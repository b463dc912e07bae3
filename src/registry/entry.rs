//! Registry entry and its lifecycle.

use crate::provider::domain::{
    AdapterConfig, HealthSnapshot, ProviderError, ProviderInfo, ProviderName, ProviderResult,
};
use crate::provider::ports::SharedProvider;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    /// Known by name but not yet built.
    Unconfigured,
    /// Start-up health check in flight.
    Initializing,
    /// Accepting calls.
    Enabled,
    /// Built but refusing calls.
    Disabled,
    /// Closed and dropped from the registry.
    Removed,
}

impl EntryState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Initializing => "initializing",
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::Removed => "removed",
        }
    }

    /// Returns whether the entry hands out its adapter.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Initializing | Self::Enabled)
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Unconfigured,
                Self::Initializing | Self::Enabled | Self::Disabled
            ) | (Self::Initializing, Self::Enabled | Self::Disabled | Self::Removed)
                | (
                    Self::Enabled,
                    Self::Initializing | Self::Enabled | Self::Disabled | Self::Removed
                )
                | (Self::Disabled, Self::Enabled | Self::Disabled | Self::Removed)
        )
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One named adapter with its configuration, state and last health.
pub struct RegistryEntry {
    name: ProviderName,
    config: AdapterConfig,
    provider: SharedProvider,
    state: EntryState,
    health: HealthSnapshot,
}

impl RegistryEntry {
    /// Wraps a freshly built adapter. The entry starts enabled or disabled
    /// according to `config.enabled`.
    #[must_use]
    pub fn new(name: ProviderName, config: AdapterConfig, provider: SharedProvider) -> Self {
        let state = if config.enabled {
            EntryState::Enabled
        } else {
            EntryState::Disabled
        };
        Self {
            name,
            config,
            provider,
            state,
            health: HealthSnapshot::unchecked(),
        }
    }

    /// Returns the entry name.
    #[must_use]
    pub const fn name(&self) -> &ProviderName {
        &self.name
    }

    /// Returns the configuration the adapter was built from.
    #[must_use]
    pub const fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Returns a handle to the adapter.
    #[must_use]
    pub fn provider(&self) -> SharedProvider {
        SharedProvider::clone(&self.provider)
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EntryState {
        self.state
    }

    /// Returns the last recorded health.
    #[must_use]
    pub const fn health(&self) -> &HealthSnapshot {
        &self.health
    }

    /// Moves the entry to `target`.
    ///
    /// # Errors
    ///
    /// Returns an `internal` error when the transition is not allowed.
    pub fn transition_to(&mut self, target: EntryState) -> ProviderResult<()> {
        if !self.state.can_transition_to(target) {
            return Err(ProviderError::internal(format!(
                "provider '{}' cannot move from {} to {target}",
                self.name, self.state
            ))
            .with_context("provider", &self.name)
            .with_context("state", self.state));
        }
        self.state = target;
        Ok(())
    }

    /// Stores a health snapshot.
    pub fn record_health(&mut self, health: HealthSnapshot) {
        self.health = health;
    }

    /// Stores the start-up health and leaves the initializing state.
    ///
    /// Entries disabled while their check was in flight stay disabled.
    pub fn complete_initialization(&mut self, health: HealthSnapshot) {
        self.health = health;
        if self.state == EntryState::Initializing {
            self.state = EntryState::Enabled;
        }
    }

    /// Returns the read-only snapshot of this entry.
    #[must_use]
    pub fn info(&self, is_default: bool) -> ProviderInfo {
        ProviderInfo::new(
            self.name.clone(),
            self.provider.info(),
            &self.health,
            self.state.is_available(),
            is_default,
        )
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("backend", &self.config.backend)
            .field("state", &self.state)
            .field("health", &self.health)
            .finish_non_exhaustive()
    }
}
