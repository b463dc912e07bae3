//! When steps for provider registry BDD scenarios.

use super::world::{RegistryWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use std::time::Duration;
use trackbridge::provider::domain::AdapterConfig;

#[when("the registry is listed")]
fn list_registry(world: &mut RegistryWorld) {
    world.listed = run_async(world.registry.list());
}

#[when(r#"a memory adapter named "{name}" is added again"#)]
fn add_again(world: &mut RegistryWorld, name: String) {
    world.last_add = Some(run_async(
        world.registry.add(AdapterConfig::new(name, "memory")),
    ));
}

#[when(r#"the adapter "{name}" is disabled"#)]
fn disable_adapter(world: &mut RegistryWorld, name: String) -> Result<(), eyre::Report> {
    run_async(world.registry.disable(&name)).wrap_err("disable adapter")?;
    Ok(())
}

#[when(r#"the adapter "{name}" is removed"#)]
fn remove_adapter(world: &mut RegistryWorld, name: String) -> Result<(), eyre::Report> {
    run_async(world.registry.remove(&name)).wrap_err("remove adapter")?;
    Ok(())
}

#[when("the registry is initialized")]
fn initialize_registry(world: &mut RegistryWorld) {
    world.report = Some(run_async(world.registry.initialize(Duration::from_secs(2))));
}
