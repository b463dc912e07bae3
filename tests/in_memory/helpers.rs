//! Shared helpers for memory-backed registry tests.

use mockable::DefaultClock;
use trackbridge::provider::domain::RegistryConfig;
use trackbridge::registry::{ProviderFactories, ProviderRegistry};
use trackbridge::task::domain::Task;

/// Two memory adapters: `primary` (the default) and a disabled `archive`
/// with a short title limit.
pub const REGISTRY_TOML: &str = r#"
default = "primary"

[[provider]]
name = "primary"
backend = "memory"

[[provider]]
name = "archive"
backend = "memory"
enabled = false

[provider.settings]
max_title_length = 12
"#;

/// Parses [`REGISTRY_TOML`].
///
/// # Panics
///
/// Panics when the document does not parse.
#[must_use]
pub fn registry_config() -> RegistryConfig {
    RegistryConfig::from_toml_str(REGISTRY_TOML).expect("registry config should parse")
}

/// Builds a registry from [`REGISTRY_TOML`] with the built-in backends.
///
/// # Panics
///
/// Panics when the registry fails to load.
pub async fn loaded_registry() -> ProviderRegistry {
    ProviderRegistry::from_config(ProviderFactories::with_builtin(), &registry_config())
        .await
        .expect("registry should load")
}

/// A task draft in project `ops`.
#[must_use]
pub fn draft(title: &str) -> Task {
    Task::new(title, "ops", &DefaultClock)
}
