//! Registry lifecycle against memory adapters.

use super::helpers::{draft, loaded_registry};
use rstest::rstest;
use std::time::Duration;
use trackbridge::provider::domain::{AdapterConfig, ErrorKind, HealthStatus};
use trackbridge::rest::CallContext;
use trackbridge::task::domain::TaskFilter;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn toml_configuration_registers_both_adapters() {
    let registry = loaded_registry().await;

    let infos = registry.list().await;
    let summary: Vec<(&str, bool, bool)> = infos
        .iter()
        .map(|info| (info.name.as_str(), info.enabled, info.is_default))
        .collect();
    assert_eq!(
        summary,
        [("archive", false, false), ("primary", true, true)]
    );
    assert!(
        infos
            .iter()
            .all(|info| info.health == HealthStatus::Unknown)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn initialization_skips_disabled_adapters() {
    let registry = loaded_registry().await;

    let report = registry.initialize(Duration::from_secs(1)).await;

    assert!(report.all_healthy());
    assert_eq!(report.status_of("primary"), Some(HealthStatus::Healthy));
    assert_eq!(report.status_of("archive"), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn enabling_applies_adapter_settings() {
    let registry = loaded_registry().await;
    let ctx = CallContext::new();

    let disabled = registry.get("archive").await.err().expect("archive is disabled");
    assert_eq!(disabled.kind(), ErrorKind::Configuration);

    registry.enable("archive").await.expect("enable succeeds");
    let archive = registry.get("archive").await.expect("archive is available");
    assert_eq!(archive.info().max_title_length, 12);
    let rejected = archive
        .create_task(&ctx, &draft("far too long for the archive"))
        .await
        .expect_err("title exceeds the limit");
    assert_eq!(rejected.kind(), ErrorKind::Validation);
    assert_eq!(rejected.context_value("max_length"), Some("12"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_the_default_leaves_no_default() {
    let registry = loaded_registry().await;
    let primary = registry.get_default().await.expect("default exists");

    registry.remove("primary").await.expect("remove succeeds");

    assert!(registry.default_name().await.is_none());
    let lookup = registry.get_default().await.err().expect("no default remains");
    assert!(lookup.is_not_found());
    let closed = primary
        .get_task(&CallContext::new(), "OPS-1")
        .await
        .expect_err("removed adapter is closed");
    assert_eq!(closed.kind(), ErrorKind::Internal);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn adding_after_load_extends_the_registry() {
    let registry = loaded_registry().await;

    let info = registry
        .add(AdapterConfig::new("scratch", "memory"))
        .await
        .expect("add succeeds");
    let duplicate = registry
        .add(AdapterConfig::new("scratch", "memory"))
        .await
        .expect_err("name is taken");

    assert_eq!(info.backend, "memory");
    assert!(!info.is_default);
    assert_eq!(duplicate.kind(), ErrorKind::Validation);
    assert_eq!(registry.list().await.len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_closes_every_adapter() {
    let registry = loaded_registry().await;
    let primary = registry.get("primary").await.expect("primary is available");

    registry.shutdown().await.expect("shutdown succeeds");

    assert!(registry.list().await.is_empty());
    let closed = primary
        .list_tasks(&CallContext::new(), &TaskFilter::new())
        .await
        .expect_err("adapter is closed");
    assert_eq!(closed.kind(), ErrorKind::Internal);
}
