//! REST client behaviour against a mock server.

use super::helpers::{TOKEN, fast_retry, interruption};
use rstest::rstest;
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use trackbridge::provider::domain::{AdapterConfig, AuthConfig, ErrorKind, RetryPolicy};
use trackbridge::rest::{CallContext, CallInterrupted, RestClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer, retry: RetryPolicy) -> AdapterConfig {
    AdapterConfig::new("rest", "youtrack")
        .with_base_url(server.uri())
        .with_auth(AuthConfig::Bearer {
            token: TOKEN.to_owned(),
        })
        .with_retry(retry)
}

fn client(server: &MockServer, retry: RetryPolicy) -> RestClient {
    RestClient::new(&config(server, retry)).expect("client builds")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_sends_credentials_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/things"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .and(query_param("fields", "id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "1" }])))
        .expect(1)
        .mount(&server)
        .await;

    let body: Value = client(&server, RetryPolicy::disabled())
        .get_json(&CallContext::new(), "api/things", &[("fields", "id".to_owned())])
        .await
        .expect("request succeeds");

    assert_eq!(body, json!([{ "id": "1" }]));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn api_version_is_a_path_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/api/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;
    let mut versioned = config(&server, RetryPolicy::disabled());
    versioned.connection.api_version = Some("/v2/".to_owned());
    let rest = RestClient::new(&versioned).expect("client builds");

    let body: Value = rest
        .get_json(&CallContext::new(), "/api/ping", &[])
        .await
        .expect("request succeeds");

    assert_eq!(body["ok"], true);
}

#[rstest]
#[case::unauthorized(401, ErrorKind::Unauthorized)]
#[case::forbidden(403, ErrorKind::Forbidden)]
#[case::not_found(404, ErrorKind::NotFound)]
#[case::conflict(409, ErrorKind::Internal)]
#[tokio::test(flavor = "multi_thread")]
async fn non_retryable_statuses_fail_after_one_attempt(
    #[case] status: u16,
    #[case] expected: ErrorKind,
) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "error": "denied",
            "error_description": "No access to this resource"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let error = client(&server, fast_retry(3))
        .get_json::<Value>(&CallContext::new(), "api/things/1", &[])
        .await
        .expect_err("request fails");

    assert_eq!(error.kind(), expected);
    assert_eq!(error.context_value("status"), Some(status.to_string().as_str()));
    assert_eq!(error.context_value("backend_error"), Some("denied"));
    assert!(error.message().contains("No access to this resource"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn server_errors_are_retried_then_surface_as_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(3)
        .mount(&server)
        .await;

    let error = client(&server, fast_retry(2))
        .get_json::<Value>(&CallContext::new(), "api/things", &[])
        .await
        .expect_err("retries are exhausted");

    assert_eq!(error.kind(), ErrorKind::Network);
    assert_eq!(error.context_value("attempts"), Some("3"));
    assert!(error.message().contains("maintenance"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn throttling_is_retried_then_surfaces_as_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .expect(2)
        .mount(&server)
        .await;

    let error = client(&server, fast_retry(1))
        .get_json::<Value>(&CallContext::new(), "api/things", &[])
        .await
        .expect_err("retries are exhausted");

    assert_eq!(error.kind(), ErrorKind::RateLimit);
    assert_eq!(error.context_value("retry_after_secs"), Some("0"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transient_failure_recovers_on_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let body: Value = client(&server, fast_retry(2))
        .get_json(&CallContext::new(), "api/things", &[])
        .await
        .expect("second attempt succeeds");

    assert_eq!(body["ok"], true);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn token_bucket_spaces_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;
    let paced = config(&server, RetryPolicy::disabled()).with_rate_limit(1, 1);
    let rest = RestClient::new(&paced).expect("client builds");
    let ctx = CallContext::new();

    let started = Instant::now();
    rest.get_json::<Value>(&ctx, "api/a", &[])
        .await
        .expect("first request succeeds");
    rest.get_json::<Value>(&ctx, "api/b", &[])
        .await
        .expect("second request succeeds");

    assert!(started.elapsed() >= Duration::from_millis(900));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deadline_interrupts_slow_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    let ctx = CallContext::with_timeout(Duration::from_millis(100));

    let started = Instant::now();
    let error = client(&server, fast_retry(3))
        .get_json::<Value>(&ctx, "api/slow", &[])
        .await
        .expect_err("deadline fires");

    assert_eq!(error.kind(), ErrorKind::Internal);
    assert_eq!(interruption(&error), Some(CallInterrupted::DeadlineExceeded));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_context_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    let token = CancellationToken::new();
    token.cancel();
    let ctx = CallContext::new().with_cancellation(token);

    let error = client(&server, RetryPolicy::disabled())
        .get_json::<Value>(&ctx, "api/things", &[])
        .await
        .expect_err("call is cancelled");

    assert_eq!(interruption(&error), Some(CallInterrupted::Cancelled));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_client_rejects_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    let rest = client(&server, RetryPolicy::disabled());

    rest.close();
    rest.close();
    let error = rest
        .get_json::<Value>(&CallContext::new(), "api/things", &[])
        .await
        .expect_err("client is closed");

    assert!(rest.is_closed());
    assert_eq!(error.kind(), ErrorKind::Internal);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_host_is_a_network_error() {
    let unreachable = AdapterConfig::new("rest", "youtrack")
        .with_base_url("http://127.0.0.1:9")
        .with_retry(RetryPolicy::disabled())
        .with_timeout(Duration::from_secs(2));
    let rest = RestClient::new(&unreachable).expect("client builds");

    let error = rest
        .probe(&CallContext::new(), "api/users/me")
        .await
        .expect_err("nothing listens on the discard port");

    assert_eq!(error.kind(), ErrorKind::Network);
}
