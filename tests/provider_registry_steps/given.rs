//! Given steps for provider registry BDD scenarios.

use super::world::{FAILING_BACKEND, RegistryWorld, factories, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use trackbridge::provider::domain::{AdapterConfig, RegistryConfig};
use trackbridge::registry::ProviderRegistry;

#[given("an empty registry")]
fn an_empty_registry(world: &mut RegistryWorld) {
    *world = RegistryWorld::new();
}

#[given(r#"a registry configured with memory adapters "{first}" and "{second}" defaulting to "{default}""#)]
fn a_configured_registry(
    world: &mut RegistryWorld,
    first: String,
    second: String,
    default: String,
) -> Result<(), eyre::Report> {
    let source = format!(
        "default = \"{default}\"\n\n\
         [[provider]]\nname = \"{first}\"\nbackend = \"memory\"\n\n\
         [[provider]]\nname = \"{second}\"\nbackend = \"memory\"\n"
    );
    let config = RegistryConfig::from_toml_str(&source).wrap_err("parse registry config")?;
    let registry = run_async(ProviderRegistry::from_config(factories(), &config))
        .wrap_err("load registry from config")?;
    *world = RegistryWorld::with_registry(registry);
    Ok(())
}

#[given(r#"a memory adapter named "{name}" is added"#)]
fn memory_adapter_added(world: &mut RegistryWorld, name: String) -> Result<(), eyre::Report> {
    run_async(world.registry.add(AdapterConfig::new(name, "memory")))
        .wrap_err("add memory adapter")?;
    Ok(())
}

#[given(r#"a failing adapter named "{name}" is added"#)]
fn failing_adapter_added(world: &mut RegistryWorld, name: String) -> Result<(), eyre::Report> {
    run_async(world.registry.add(AdapterConfig::new(name, FAILING_BACKEND)))
        .wrap_err("add failing adapter")?;
    Ok(())
}

#[given(r#""{name}" is the default adapter"#)]
fn default_adapter(world: &mut RegistryWorld, name: String) -> Result<(), eyre::Report> {
    run_async(world.registry.set_default(&name)).wrap_err("set default adapter")?;
    Ok(())
}
