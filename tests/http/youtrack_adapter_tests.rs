//! YouTrack adapter operations over a mock server.

use super::helpers::{TOKEN, interruption, issue_json, youtrack_config};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use std::time::Duration;
use trackbridge::provider::domain::{AdapterConfig, ErrorKind, HealthStatus, RegistryConfig};
use trackbridge::provider::ports::TaskProvider;
use trackbridge::registry::{ProviderFactories, ProviderRegistry};
use trackbridge::rest::{CallContext, CallInterrupted};
use trackbridge::task::domain::{
    BoardKind, Priority, StatusCategory, Task, TaskFilter, TaskStatus,
};
use trackbridge::youtrack::YouTrackProvider;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> YouTrackProvider {
    YouTrackProvider::from_config(&youtrack_config(server)).expect("adapter builds")
}

fn draft(title: &str) -> Task {
    Task::new(title, "DEMO", &DefaultClock).with_priority(Priority::High)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_posts_issue_and_stamps_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/issues"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .and(body_partial_json(json!({
            "summary": "Crash on save",
            "project": { "shortName": "DEMO" }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(issue_json("2-1", "DEMO-1", "Crash on save")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = provider(&server)
        .create_task(&CallContext::new(), &draft("Crash on save"))
        .await
        .expect("create succeeds");

    assert_eq!(created.key.as_deref(), Some("DEMO-1"));
    assert_eq!(created.external_id.as_deref(), Some("2-1"));
    assert_eq!(created.provider.as_deref(), Some("tracker"));
    assert_eq!(created.status.id, "open");
}

#[rstest]
#[case::too_long("x".repeat(256), "DEMO")]
#[case::blank_title("   ".to_owned(), "DEMO")]
#[case::blank_project("Valid".to_owned(), "")]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_tasks_never_reach_the_network(#[case] title: String, #[case] project: &str) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let task = Task::new(title, project, &DefaultClock);

    let error = provider(&server)
        .create_task(&CallContext::new(), &task)
        .await
        .expect_err("validation fails");

    assert_eq!(error.kind(), ErrorKind::Validation);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_issue_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/issues/DEMO-404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Not Found",
            "error_description": "Entity with id DEMO-404 not found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let error = provider(&server)
        .get_task(&CallContext::new(), "DEMO-404")
        .await
        .expect_err("issue is missing");

    assert!(error.is_not_found());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_ids_are_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = provider(&server)
        .get_task(&CallContext::new(), "../admin")
        .await
        .expect_err("id is rejected");

    assert_eq!(error.kind(), ErrorKind::Validation);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updating_a_task_without_backend_identity_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = provider(&server)
        .update_task(&CallContext::new(), &draft("Never created"))
        .await
        .expect_err("task has no backend id");

    assert!(error.is_not_found());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_translates_filter_and_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/issues"))
        .and(query_param("query", "project: {DEMO} State: {Open}, {In Progress}"))
        .and(query_param("$skip", "20"))
        .and(query_param("$top", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            issue_json("2-21", "DEMO-21", "First"),
            issue_json("2-22", "DEMO-22", "Second")
        ])))
        .expect(1)
        .mount(&server)
        .await;
    let filter = TaskFilter::new()
        .with_projects(["DEMO".to_owned()])
        .with_statuses(["open".to_owned(), "in_progress".to_owned()])
        .with_page(20, 10);

    let tasks = provider(&server)
        .list_tasks(&CallContext::new(), &filter)
        .await
        .expect("list succeeds");

    let keys: Vec<String> = tasks.iter().map(Task::display_id).collect();
    assert_eq!(keys, ["DEMO-21", "DEMO-22"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_appends_raw_query_and_uses_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/issues"))
        .and(query_param("query", "tag: {ui} #Unresolved"))
        .and(query_param("$top", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let filter = TaskFilter::new().with_labels(["ui".to_owned()]);

    let tasks = provider(&server)
        .search_tasks(&CallContext::new(), " #Unresolved ", &filter)
        .await
        .expect("search succeeds");

    assert!(tasks.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_status_sends_backend_state() {
    let server = MockServer::start().await;
    let fixed = json!({
        "id": "2-5",
        "idReadable": "DEMO-5",
        "summary": "Done soon",
        "created": 1_704_067_200_000_i64,
        "updated": 1_704_153_600_000_i64,
        "resolved": 1_704_153_600_000_i64,
        "project": { "id": "0-1", "shortName": "DEMO" },
        "customFields": [
            { "$type": "StateIssueCustomField", "name": "State",
              "value": { "name": "Fixed", "isResolved": true } }
        ]
    });
    Mock::given(method("POST"))
        .and(path("/api/issues/DEMO-5"))
        .and(body_partial_json(json!({
            "customFields": [{ "name": "State", "value": { "name": "Fixed" } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixed))
        .expect(1)
        .mount(&server)
        .await;

    let updated = provider(&server)
        .update_status(
            &CallContext::new(),
            "DEMO-5",
            &TaskStatus::from_category(StatusCategory::Done),
        )
        .await
        .expect("status update succeeds");

    assert_eq!(updated.status.id, "fixed");
    assert!(updated.is_completed());
    assert!(updated.resolved_at.is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_create_stops_at_first_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "summary": "rejected" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "bad_request",
            "error_description": "Summary is reserved"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_json("2-1", "DEMO-1", "ok")))
        .expect(1)
        .mount(&server)
        .await;
    let batch = [draft("ok"), draft("rejected"), draft("never sent")];

    let failure = provider(&server)
        .bulk_create(&CallContext::new(), &batch)
        .await
        .expect_err("second item fails");

    assert_eq!(failure.index, 1);
    assert_eq!(failure.completed.len(), 1);
    assert_eq!(failure.error.kind(), ErrorKind::Internal);
    let flattened = failure.into_provider_error();
    assert_eq!(flattened.context_value("failed_index"), Some("1"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn workflow_statuses_are_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/projects/DEMO/customFields"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "field": { "name": "State" }, "bundle": { "values": [
                { "name": "Open", "isResolved": false, "ordinal": 0 },
                { "name": "Verified", "isResolved": true, "ordinal": 1 }
            ] } }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    let adapter = provider(&server);
    let ctx = CallContext::new();

    let first = adapter.list_statuses(&ctx, "DEMO").await.expect("fetch succeeds");
    let second = adapter.list_statuses(&ctx, "DEMO").await.expect("cache hit");

    assert_eq!(first, second);
    let ids: Vec<&str> = first.iter().map(|status| status.id.as_str()).collect();
    assert_eq!(ids, ["open", "verified"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn boards_come_from_agiles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "120-3",
            "name": "Sprint board",
            "projects": [{ "shortName": "DEMO" }],
            "sprintsSettings": { "disableSprints": false },
            "columnSettings": { "columns": [
                { "id": "c1", "presentation": "Open", "ordinal": 0,
                  "fieldValues": [{ "name": "Open" }] }
            ] }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let boards = provider(&server)
        .list_boards(&CallContext::new())
        .await
        .expect("boards load");

    let board = boards.first().expect("one board");
    assert_eq!(board.kind, BoardKind::Scrum);
    assert_eq!(
        board.column_for_status("open").map(|column| column.name.as_str()),
        Some("Open")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comments_are_posted_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/issues/DEMO-7/comments"))
        .and(body_partial_json(json!({ "text": "Looks good" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "4-9",
            "text": "Looks good",
            "created": 1_704_067_200_000_i64,
            "author": { "login": "alice" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let comment = provider(&server)
        .add_comment(&CallContext::new(), "DEMO-7", "Looks good")
        .await
        .expect("comment is added");

    assert_eq!(comment.id, "4-9");
    assert_eq!(comment.author_id.as_deref(), Some("alice"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_check_probes_once_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let error = provider(&server)
        .health_check(&CallContext::new())
        .await
        .expect_err("backend is down");

    assert_eq!(error.kind(), ErrorKind::Network);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_adapter_rejects_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let adapter = provider(&server);

    adapter.close().await.expect("close succeeds");
    adapter.close().await.expect("close is idempotent");
    let error = adapter
        .get_task(&CallContext::new(), "DEMO-1")
        .await
        .expect_err("adapter is closed");

    assert_eq!(error.kind(), ErrorKind::Internal);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn slow_backend_times_out_during_initialization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "login": "bot" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    let registry = ProviderRegistry::new(ProviderFactories::with_builtin());
    registry
        .add(youtrack_config(&server))
        .await
        .expect("youtrack adapter is added");
    registry
        .add(AdapterConfig::new("scratch", "memory"))
        .await
        .expect("memory adapter is added");

    let report = registry.initialize(Duration::from_millis(200)).await;

    assert_eq!(report.status_of("tracker"), Some(HealthStatus::Unhealthy));
    assert_eq!(report.status_of("scratch"), Some(HealthStatus::Healthy));
    let failure = report.failure_of("tracker").expect("tracker failed");
    assert_eq!(failure.kind(), ErrorKind::Internal);
    assert_eq!(interruption(failure), Some(CallInterrupted::DeadlineExceeded));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registry_loads_youtrack_from_toml() {
    let server = MockServer::start().await;
    let source = format!(
        r#"
default = "tracker"

[[provider]]
name = "tracker"
backend = "youtrack"
timeout_ms = 5000

[provider.connection]
base_url = "{uri}"

[provider.auth]
type = "bearer"
token = "{TOKEN}"

[provider.settings]
page_size = 25
"#,
        uri = server.uri()
    );
    let config = RegistryConfig::from_toml_str(&source).expect("config parses");

    let registry = ProviderRegistry::from_config(ProviderFactories::with_builtin(), &config)
        .await
        .expect("registry loads");

    let default = registry.get_default().await.expect("default is set");
    assert_eq!(default.info().backend, "youtrack");
    assert_eq!(default.info().max_title_length, 255);
}
