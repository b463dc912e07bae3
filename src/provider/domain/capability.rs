//! Provider capability flags.

use super::{ProviderError, ProviderResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Optional feature a provider may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Task CRUD.
    Tasks,
    /// Board listing.
    Boards,
    /// Push-based synchronization.
    RealTimeSync,
    /// Backend custom fields.
    CustomFields,
    /// Configurable workflows.
    Workflows,
    /// Estimates and spent time.
    TimeTracking,
    /// Parent and child tasks.
    HierarchicalTasks,
    /// Reports and dashboards.
    Reporting,
    /// Backend query language.
    AdvancedSearch,
    /// Outbound webhooks.
    Webhooks,
    /// Programmatic API access.
    Api,
    /// Document storage.
    Documents,
    /// Task templates.
    Templates,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Tasks,
        Self::Boards,
        Self::RealTimeSync,
        Self::CustomFields,
        Self::Workflows,
        Self::TimeTracking,
        Self::HierarchicalTasks,
        Self::Reporting,
        Self::AdvancedSearch,
        Self::Webhooks,
        Self::Api,
        Self::Documents,
        Self::Templates,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Boards => "boards",
            Self::RealTimeSync => "real_time_sync",
            Self::CustomFields => "custom_fields",
            Self::Workflows => "workflows",
            Self::TimeTracking => "time_tracking",
            Self::HierarchicalTasks => "hierarchical_tasks",
            Self::Reporting => "reporting",
            Self::AdvancedSearch => "advanced_search",
            Self::Webhooks => "webhooks",
            Self::Api => "api",
            Self::Documents => "documents",
            Self::Templates => "templates",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of capabilities declared by one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    /// Returns whether `capability` is declared.
    #[must_use]
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Iterates declared capabilities in order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    /// Fails with an `unsupported` error unless `capability` is declared.
    ///
    /// # Errors
    ///
    /// Returns an `internal` [`ProviderError`] naming `operation` when the
    /// capability is missing.
    pub fn require(
        &self,
        capability: Capability,
        provider: &str,
        operation: &str,
    ) -> ProviderResult<()> {
        if self.contains(capability) {
            Ok(())
        } else {
            Err(ProviderError::unsupported(provider, operation)
                .with_context("capability", capability))
        }
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
