//! Provider metadata.

use super::{CapabilitySet, HealthSnapshot, HealthStatus, ProviderName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Static description an adapter reports about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Registered adapter name.
    pub name: String,
    /// Backend type tag, e.g. `youtrack`.
    pub backend: String,
    /// Declared capabilities.
    pub capabilities: CapabilitySet,
    /// Longest title the backend accepts, in characters.
    pub max_title_length: usize,
}

/// Read-only snapshot of one registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Registered adapter name.
    pub name: ProviderName,
    /// Backend type tag.
    pub backend: String,
    /// Declared capabilities.
    pub capabilities: CapabilitySet,
    /// Health as of the last check.
    pub health: HealthStatus,
    /// When health was last checked.
    pub last_health_check: Option<DateTime<Utc>>,
    /// Whether the entry accepts calls.
    pub enabled: bool,
    /// Whether the entry is the registry default.
    pub is_default: bool,
}

impl ProviderInfo {
    /// Builds the snapshot from its parts.
    #[must_use]
    pub fn new(
        name: ProviderName,
        descriptor: ProviderDescriptor,
        health: &HealthSnapshot,
        enabled: bool,
        is_default: bool,
    ) -> Self {
        Self {
            name,
            backend: descriptor.backend,
            capabilities: descriptor.capabilities,
            health: health.status(),
            last_health_check: health.checked_at(),
            enabled,
            is_default,
        }
    }
}
