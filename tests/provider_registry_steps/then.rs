//! Then steps for provider registry BDD scenarios.

use super::world::{RegistryWorld, run_async};
use rstest_bdd_macros::then;
use trackbridge::provider::domain::{ErrorKind, HealthStatus};

#[then("the registry lists {count:usize} adapters")]
fn registry_lists(world: &RegistryWorld, count: usize) -> Result<(), eyre::Report> {
    if world.listed.len() != count {
        return Err(eyre::eyre!(
            "expected {count} adapters, found {}",
            world.listed.len()
        ));
    }
    Ok(())
}

#[then(r#"the default adapter is "{name}""#)]
fn default_adapter_is(world: &RegistryWorld, name: String) -> Result<(), eyre::Report> {
    let default = run_async(world.registry.default_name())
        .ok_or_else(|| eyre::eyre!("no default adapter is set"))?;
    if default.as_str() != name {
        return Err(eyre::eyre!("expected default '{name}', found '{default}'"));
    }
    let flagged: Vec<&str> = world
        .listed
        .iter()
        .filter(|info| info.is_default)
        .map(|info| info.name.as_str())
        .collect();
    if flagged != [name.as_str()] {
        return Err(eyre::eyre!("listing flags {flagged:?} as default"));
    }
    Ok(())
}

#[then("the last addition fails with a validation error")]
fn last_addition_fails(world: &RegistryWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_add
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing add result in scenario world"))?;
    match result {
        Err(error) if error.kind() == ErrorKind::Validation => Ok(()),
        other => Err(eyre::eyre!("expected a validation error, got {other:?}")),
    }
}

#[then(r#"looking up "{name}" fails with a configuration error"#)]
fn lookup_fails(world: &RegistryWorld, name: String) -> Result<(), eyre::Report> {
    match run_async(world.registry.get(&name)) {
        Err(error) if error.kind() == ErrorKind::Configuration => Ok(()),
        Err(error) => Err(eyre::eyre!("expected a configuration error, got {error}")),
        Ok(_) => Err(eyre::eyre!("expected '{name}' to be unavailable")),
    }
}

fn reported_status(world: &RegistryWorld, name: &str) -> Result<HealthStatus, eyre::Report> {
    world
        .report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("registry was not initialized"))?
        .status_of(name)
        .ok_or_else(|| eyre::eyre!("no health recorded for '{name}'"))
}

#[then(r#"adapter "{name}" reports healthy"#)]
fn reports_healthy(world: &RegistryWorld, name: String) -> Result<(), eyre::Report> {
    let status = reported_status(world, &name)?;
    if status != HealthStatus::Healthy {
        return Err(eyre::eyre!("expected '{name}' healthy, found {status}"));
    }
    Ok(())
}

#[then(r#"adapter "{name}" reports unhealthy"#)]
fn reports_unhealthy(world: &RegistryWorld, name: String) -> Result<(), eyre::Report> {
    let status = reported_status(world, &name)?;
    if status != HealthStatus::Unhealthy {
        return Err(eyre::eyre!("expected '{name}' unhealthy, found {status}"));
    }
    let failed = world
        .report
        .as_ref()
        .and_then(|report| report.failure_of(&name))
        .is_some();
    if !failed {
        return Err(eyre::eyre!("expected a recorded failure for '{name}'"));
    }
    Ok(())
}

#[then("no default adapter is set")]
fn no_default(world: &RegistryWorld) -> Result<(), eyre::Report> {
    if let Some(name) = run_async(world.registry.default_name()) {
        return Err(eyre::eyre!("expected no default, found '{name}'"));
    }
    Ok(())
}
