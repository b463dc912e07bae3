//! Task operations routed through the registry's default adapter.

use super::helpers::{draft, loaded_registry};
use rstest::rstest;
use trackbridge::provider::domain::ErrorKind;
use trackbridge::rest::CallContext;
use trackbridge::task::domain::{
    ContextDefaults, Priority, StatusCategory, TaskFilter, TaskStatus,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn context_defaults_fill_new_tasks() {
    let registry = loaded_registry().await;
    let provider = registry.get_default().await.expect("default exists");
    let defaults = ContextDefaults {
        project_id: Some("ops".to_owned()),
        assignee_id: Some("dana".to_owned()),
        priority: Some(Priority::High),
        labels: ["oncall".to_owned()].into_iter().collect(),
    };
    let mut blank_project = draft("Rotate certificates");
    blank_project.project_id = String::new();

    let created = provider
        .create_task(&CallContext::new(), &defaults.apply_to(blank_project))
        .await
        .expect("create succeeds");

    assert_eq!(created.key.as_deref(), Some("OPS-1"));
    assert_eq!(created.assignee_id.as_deref(), Some("dana"));
    assert_eq!(created.priority, Priority::High);
    assert!(created.has_label("oncall"));
    assert_eq!(created.provider.as_deref(), Some("primary"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_create_reports_partial_progress() {
    let registry = loaded_registry().await;
    let provider = registry.get("primary").await.expect("primary is available");
    let batch = [draft("First"), draft(" "), draft("Never attempted")];
    let ctx = CallContext::new();

    let failure = provider
        .bulk_create(&ctx, &batch)
        .await
        .expect_err("second draft is invalid");

    assert_eq!(failure.index, 1);
    assert_eq!(failure.completed.len(), 1);
    assert_eq!(failure.error.kind(), ErrorKind::Validation);
    let stored = provider
        .list_tasks(&ctx, &TaskFilter::new())
        .await
        .expect("list succeeds");
    assert_eq!(stored.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_changes_and_comments_are_visible_to_queries() {
    let registry = loaded_registry().await;
    let provider = registry.get_default().await.expect("default exists");
    let ctx = CallContext::new();
    let created = provider
        .create_task(&ctx, &draft("Patch kernel").with_description("CVE backlog"))
        .await
        .expect("create succeeds");
    let key = created.display_id();

    let done = provider
        .update_status(&ctx, &key, &TaskStatus::from_category(StatusCategory::Done))
        .await
        .expect("status update succeeds");
    provider
        .add_comment(&ctx, &key, "Rolled out")
        .await
        .expect("comment succeeds");

    assert!(done.is_completed());
    let finished = provider
        .list_tasks(&ctx, &TaskFilter::new().with_statuses(["done".to_owned()]))
        .await
        .expect("list succeeds");
    assert_eq!(finished.len(), 1);
    let found = provider
        .search_tasks(&ctx, "cve", &TaskFilter::new())
        .await
        .expect("search succeeds");
    let comments: Vec<&str> = found
        .iter()
        .flat_map(|task| task.comments.iter().map(|comment| comment.content.as_str()))
        .collect();
    assert_eq!(comments, ["Rolled out"]);
}
