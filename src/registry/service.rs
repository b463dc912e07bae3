//! Registry orchestration service.

use super::{EntryState, InitializationReport, ProviderFactories, RegistryEntry};
use crate::provider::domain::{
    AdapterConfig, ErrorKind, HealthSnapshot, ProviderError, ProviderInfo, ProviderName,
    ProviderResult, RegistryConfig,
};
use crate::provider::ports::SharedProvider;
use crate::rest::{CallContext, CallInterrupted};
use futures::future::join_all;
use mockable::{Clock, DefaultClock};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct RegistryState {
    entries: BTreeMap<ProviderName, RegistryEntry>,
    default: Option<ProviderName>,
}

impl RegistryState {
    fn entry(&self, name: &str) -> ProviderResult<&RegistryEntry> {
        self.entries.get(name).ok_or_else(|| missing(name))
    }

    fn entry_mut(&mut self, name: &str) -> ProviderResult<&mut RegistryEntry> {
        self.entries.get_mut(name).ok_or_else(|| missing(name))
    }

    fn is_default(&self, name: &ProviderName) -> bool {
        self.default.as_ref() == Some(name)
    }
}

fn missing(name: &str) -> ProviderError {
    ProviderError::not_found(format!("provider '{name}' is not registered"))
        .with_context("provider", name)
}

/// Thread-safe registry of named adapters.
///
/// Lookups take a shared lock; mutations take it exclusively. Adapter calls
/// (health checks, close) never run while the lock is held.
pub struct ProviderRegistry<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    factories: ProviderFactories,
    state: RwLock<RegistryState>,
    clock: Arc<C>,
}

impl ProviderRegistry<DefaultClock> {
    /// Creates an empty registry using the system clock.
    #[must_use]
    pub fn new(factories: ProviderFactories) -> Self {
        Self::with_clock(factories, Arc::new(DefaultClock))
    }

    /// Creates a registry holding every adapter in `config`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while adding an adapter or applying
    /// the default.
    pub async fn from_config(
        factories: ProviderFactories,
        config: &RegistryConfig,
    ) -> ProviderResult<Self> {
        let registry = Self::new(factories);
        registry.load(config).await?;
        Ok(registry)
    }
}

impl<C> ProviderRegistry<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty registry with an injected clock.
    #[must_use]
    pub fn with_clock(factories: ProviderFactories, clock: Arc<C>) -> Self {
        Self {
            factories,
            state: RwLock::new(RegistryState::default()),
            clock,
        }
    }

    /// Adds every adapter in `config` and applies its default.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while adding an adapter or applying
    /// the default. Adapters added before the failure stay registered.
    pub async fn load(&self, config: &RegistryConfig) -> ProviderResult<()> {
        for adapter in &config.providers {
            self.add(adapter.clone()).await?;
        }
        if let Some(default) = &config.default {
            self.set_default(default).await?;
        }
        Ok(())
    }

    /// Builds an adapter from `config` and registers it under
    /// `config.name`.
    ///
    /// The factory runs under the write lock, so a taken name never
    /// builds an adapter.
    ///
    /// # Errors
    ///
    /// Returns `configuration` for an invalid configuration or unknown
    /// backend, and `validation` when the name is taken.
    pub async fn add(&self, config: AdapterConfig) -> ProviderResult<ProviderInfo> {
        config.validate()?;
        let name = config.provider_name()?;
        let mut state = self.state.write().await;
        if state.entries.contains_key(&name) {
            return Err(duplicate(&name));
        }
        let provider = self.factories.build(&config)?;
        let entry = RegistryEntry::new(name.clone(), config, provider);
        let snapshot = entry.info(false);
        info!(
            provider = %name,
            backend = %entry.config().backend,
            state = %entry.state(),
            "registered provider"
        );
        state.entries.insert(name, entry);
        Ok(snapshot)
    }

    /// Health-checks every enabled adapter concurrently.
    ///
    /// Each check runs under its own `timeout`. Failures and timeouts mark
    /// only the affected adapter unhealthy; the rest still complete.
    pub async fn initialize(&self, timeout: Duration) -> InitializationReport {
        let targets: Vec<(ProviderName, SharedProvider)> = {
            let mut state = self.state.write().await;
            state
                .entries
                .values_mut()
                .filter(|entry| entry.state() == EntryState::Enabled)
                .filter_map(|entry| {
                    entry
                        .transition_to(EntryState::Initializing)
                        .ok()
                        .map(|()| (entry.name().clone(), entry.provider()))
                })
                .collect()
        };

        let outcomes = join_all(targets.into_iter().map(|(name, provider)| async move {
            let outcome = bounded_health_check(&provider, timeout).await;
            (name, outcome)
        }))
        .await;

        let mut report = InitializationReport::default();
        let mut state = self.state.write().await;
        for (name, outcome) in outcomes {
            let health = HealthSnapshot::from_check(&outcome, self.clock.utc());
            if let Some(entry) = state.entries.get_mut(&name) {
                entry.complete_initialization(health.clone());
            }
            if let Err(error) = &outcome {
                warn!(provider = %name, error = %error, "provider failed its start-up check");
            }
            report.record(name, health, outcome);
        }
        info!(
            checked = report.checked(),
            failed = report.failures.len(),
            "initialized providers"
        );
        report
    }

    /// Re-enables a disabled adapter.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when `name` is not registered.
    pub async fn enable(&self, name: &str) -> ProviderResult<()> {
        self.set_state(name, EntryState::Enabled).await
    }

    /// Disables an adapter without closing it.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when `name` is not registered.
    pub async fn disable(&self, name: &str) -> ProviderResult<()> {
        self.set_state(name, EntryState::Disabled).await
    }

    async fn set_state(&self, name: &str, target: EntryState) -> ProviderResult<()> {
        let mut state = self.state.write().await;
        let entry = state.entry_mut(name)?;
        entry.transition_to(target)?;
        info!(provider = %name, state = %target, "changed provider state");
        Ok(())
    }

    /// Removes an adapter and closes it.
    ///
    /// Clears the default when it pointed at `name`. The entry is gone even
    /// when closing fails.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when `name` is not registered, or the adapter's
    /// close error.
    pub async fn remove(&self, name: &str) -> ProviderResult<()> {
        let mut entry = {
            let mut state = self.state.write().await;
            let removed = state.entries.remove(name).ok_or_else(|| missing(name))?;
            if state.is_default(removed.name()) {
                state.default = None;
            }
            removed
        };
        entry.transition_to(EntryState::Removed)?;
        info!(provider = %name, "removed provider");
        entry.provider().close().await.map_err(|err| {
            ProviderError::wrap(err, format!("provider '{name}' was removed but failed to close"))
        })
    }

    /// Marks `name` as the default adapter.
    ///
    /// The current default is kept when this fails.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when `name` is not registered and `validation`
    /// when it is disabled.
    pub async fn set_default(&self, name: &str) -> ProviderResult<()> {
        let mut state = self.state.write().await;
        let entry = state.entry(name)?;
        if !entry.state().is_available() {
            return Err(ProviderError::validation(format!(
                "provider '{name}' is disabled and cannot be the default"
            ))
            .with_context("provider", name)
            .with_context("state", entry.state()));
        }
        let chosen = entry.name().clone();
        info!(provider = %chosen, "set default provider");
        state.default = Some(chosen);
        Ok(())
    }

    /// Returns the default adapter.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when no default is set, and `configuration` when
    /// the default has been disabled.
    pub async fn get_default(&self) -> ProviderResult<SharedProvider> {
        let state = self.state.read().await;
        let name = state
            .default
            .as_ref()
            .ok_or_else(|| ProviderError::not_found("no default provider is set"))?;
        available(state.entry(name.as_str())?)
    }

    /// Returns the name of the default adapter, if any.
    pub async fn default_name(&self) -> Option<ProviderName> {
        self.state.read().await.default.clone()
    }

    /// Returns the adapter registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when `name` is not registered, and
    /// `configuration` when it is disabled.
    pub async fn get(&self, name: &str) -> ProviderResult<SharedProvider> {
        let state = self.state.read().await;
        available(state.entry(name)?)
    }

    /// Returns a snapshot of every entry, ordered by name.
    pub async fn list(&self) -> Vec<ProviderInfo> {
        let state = self.state.read().await;
        state
            .entries
            .values()
            .map(|entry| entry.info(state.is_default(entry.name())))
            .collect()
    }

    /// Returns the last recorded health of every entry.
    pub async fn health(&self) -> BTreeMap<ProviderName, HealthSnapshot> {
        let state = self.state.read().await;
        state
            .entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.health().clone()))
            .collect()
    }

    /// Health-checks one adapter now and records the result.
    ///
    /// A failing check is reported through the returned snapshot, not as an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when `name` is not registered, and
    /// `configuration` when it is disabled.
    pub async fn check_health(
        &self,
        ctx: &CallContext,
        name: &str,
    ) -> ProviderResult<HealthSnapshot> {
        let provider = self.get(name).await?;
        let outcome = provider.health_check(ctx).await;
        let health = HealthSnapshot::from_check(&outcome, self.clock.utc());
        let mut state = self.state.write().await;
        if let Ok(entry) = state.entry_mut(name) {
            entry.record_health(health.clone());
        }
        Ok(health)
    }

    /// Closes and drops every adapter.
    ///
    /// # Errors
    ///
    /// Returns the first close error; every adapter is still closed.
    pub async fn shutdown(&self) -> ProviderResult<()> {
        let entries = {
            let mut state = self.state.write().await;
            state.default = None;
            std::mem::take(&mut state.entries)
        };
        let closes = join_all(
            entries
                .values()
                .map(|entry| async move { (entry.name(), entry.provider().close().await) }),
        )
        .await;
        let mut first_error = None;
        for (name, outcome) in closes {
            if let Err(error) = outcome {
                warn!(provider = %name, error = %error, "provider failed to close");
                first_error.get_or_insert(error);
            }
        }
        info!(closed = entries.len(), "shut down provider registry");
        first_error.map_or(Ok(()), Err)
    }
}

fn duplicate(name: &ProviderName) -> ProviderError {
    ProviderError::validation(format!("provider '{name}' is already registered"))
        .with_context("provider", name)
}

fn available(entry: &RegistryEntry) -> ProviderResult<SharedProvider> {
    if entry.state().is_available() {
        Ok(entry.provider())
    } else {
        Err(ProviderError::configuration(format!(
            "provider '{}' is disabled",
            entry.name()
        ))
        .with_context("provider", entry.name())
        .with_context("state", entry.state()))
    }
}

async fn bounded_health_check(provider: &SharedProvider, timeout: Duration) -> ProviderResult<()> {
    let ctx = CallContext::with_timeout(timeout);
    tokio::time::timeout(timeout, provider.health_check(&ctx))
        .await
        .unwrap_or_else(|_| {
            Err(ProviderError::with_cause(
                ErrorKind::Internal,
                format!("health check did not finish within {}ms", timeout.as_millis()),
                CallInterrupted::DeadlineExceeded,
            )
            .with_context("operation", "health_check"))
        })
}
