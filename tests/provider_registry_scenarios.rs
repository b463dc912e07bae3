//! Behaviour tests for the provider registry.

#[path = "provider_registry_steps/mod.rs"]
mod provider_registry_steps_defs;

use provider_registry_steps_defs::world::{RegistryWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/provider_registry.feature",
    name = "Load adapters from configuration"
)]
#[tokio::test(flavor = "multi_thread")]
async fn load_adapters_from_configuration(world: RegistryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/provider_registry.feature",
    name = "Reject a duplicate adapter name"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_duplicate_adapter_name(world: RegistryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/provider_registry.feature",
    name = "Disabled adapters refuse lookups"
)]
#[tokio::test(flavor = "multi_thread")]
async fn disabled_adapters_refuse_lookups(world: RegistryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/provider_registry.feature",
    name = "Initialization isolates failing adapters"
)]
#[tokio::test(flavor = "multi_thread")]
async fn initialization_isolates_failures(world: RegistryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/provider_registry.feature",
    name = "Removing the default adapter clears the default"
)]
#[tokio::test(flavor = "multi_thread")]
async fn removing_default_clears_it(world: RegistryWorld) {
    let _ = world;
}
