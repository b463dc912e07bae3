//! Shared fixtures for HTTP integration tests.

use serde_json::{Value, json};
use trackbridge::provider::domain::{AdapterConfig, AuthConfig, ProviderError, RetryPolicy};
use trackbridge::rest::CallInterrupted;
use wiremock::MockServer;

/// Bearer token every test server expects.
pub const TOKEN: &str = "perm:integration";

/// Retry policy with millisecond delays so retry tests stay fast.
#[must_use]
pub fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        initial_delay_ms: 5,
        max_delay_ms: 20,
        backoff_multiplier: 2.0,
        jitter: false,
    }
}

/// YouTrack adapter configuration pointing at `server`.
#[must_use]
pub fn youtrack_config(server: &MockServer) -> AdapterConfig {
    AdapterConfig::new("tracker", "youtrack")
        .with_base_url(server.uri())
        .with_auth(AuthConfig::Bearer {
            token: TOKEN.to_owned(),
        })
        .with_retry(fast_retry(2))
}

/// Minimal issue document as YouTrack returns it.
#[must_use]
pub fn issue_json(id: &str, readable: &str, summary: &str) -> Value {
    json!({
        "id": id,
        "idReadable": readable,
        "summary": summary,
        "created": 1_704_067_200_000_i64,
        "updated": 1_704_067_200_000_i64,
        "project": { "id": "0-1", "shortName": "DEMO" },
        "reporter": { "login": "alice" },
        "tags": [],
        "customFields": [
            { "$type": "StateIssueCustomField", "name": "State",
              "value": { "name": "Open", "isResolved": false } },
            { "$type": "SingleEnumIssueCustomField", "name": "Priority",
              "value": { "name": "Normal" } }
        ],
        "links": [],
        "comments": []
    })
}

/// Extracts the interruption reason from an `internal` error.
#[must_use]
pub fn interruption(error: &ProviderError) -> Option<CallInterrupted> {
    error
        .cause()
        .and_then(|cause| cause.downcast_ref::<CallInterrupted>())
        .copied()
}
