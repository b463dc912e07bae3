//! HTTP-level failures and their classification.

use crate::provider::domain::{ErrorKind, ProviderError};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Longest raw body kept on an [`HttpError`], in characters.
const MAX_BODY_CHARS: usize = 512;

/// Structured error body returned by backends, e.g.
/// `{"error": "invalid_grant", "error_description": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BackendErrorBody {
    /// Machine-readable error code.
    pub error: Option<String>,
    /// Human-readable description.
    pub error_description: Option<String>,
    /// Alternative description field used by some endpoints.
    pub message: Option<String>,
}

/// Non-2xx response from a backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("HTTP {status}: {message}")]
pub struct HttpError {
    /// Response status code.
    pub status: u16,
    /// Best available description of the failure.
    pub message: String,
    /// Backend error code, when the body was structured.
    pub code: Option<String>,
    /// Raw response body, truncated.
    pub body: Option<String>,
    /// Seconds the backend asked the client to wait.
    pub retry_after_secs: Option<u64>,
}

impl HttpError {
    /// Builds the error from a status and raw body.
    ///
    /// A structured body supplies the message; otherwise the status reason
    /// and the raw body are used.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<BackendErrorBody>(body).unwrap_or_default();
        let truncated: String = body.trim().chars().take(MAX_BODY_CHARS).collect();
        let reason = status.canonical_reason().unwrap_or("unexpected status");
        let message = parsed
            .error_description
            .clone()
            .or_else(|| parsed.message.clone())
            .or_else(|| parsed.error.clone())
            .unwrap_or_else(|| {
                if truncated.is_empty() {
                    reason.to_owned()
                } else {
                    format!("{reason}: {truncated}")
                }
            });
        Self {
            status: status.as_u16(),
            message,
            code: parsed.error,
            body: (!truncated.is_empty()).then_some(truncated),
            retry_after_secs: None,
        }
    }

    /// Records a `Retry-After` delay.
    #[must_use]
    pub const fn with_retry_after(mut self, seconds: Option<u64>) -> Self {
        self.retry_after_secs = seconds;
        self
    }

    /// Returns the error kind for this status.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        classify_status(self.status)
    }

    /// Converts into a [`ProviderError`] for `operation`, keeping the backend
    /// detail in context.
    #[must_use]
    pub fn into_provider_error(self, operation: &str) -> ProviderError {
        let kind = self.kind();
        let status = self.status;
        let code = self.code.clone();
        let retry_after = self.retry_after_secs;
        let mut error =
            ProviderError::with_cause(kind, format!("{operation} failed: {}", self.message), self)
                .with_context("operation", operation)
                .with_context("status", status);
        if let Some(code) = code {
            error = error.with_context("backend_error", code);
        }
        if let Some(seconds) = retry_after {
            error = error.with_context("retry_after_secs", seconds);
        }
        error
    }
}

/// Maps an HTTP status to an error kind.
///
/// 401 is `unauthorized`, 403 `forbidden`, 404 `not_found`, 429
/// `rate_limit`, any 5xx `network`, and everything else `internal`.
#[must_use]
pub const fn classify_status(status: u16) -> ErrorKind {
    match status {
        401 => ErrorKind::Unauthorized,
        403 => ErrorKind::Forbidden,
        404 => ErrorKind::NotFound,
        429 => ErrorKind::RateLimit,
        500..=599 => ErrorKind::Network,
        _ => ErrorKind::Internal,
    }
}

/// Converts a transport failure; timeouts and connection errors alike are
/// `network`.
pub(crate) fn transport_error(operation: &str, err: reqwest::Error) -> ProviderError {
    let timed_out = err.is_timeout();
    let message = if timed_out {
        format!("{operation} timed out")
    } else {
        format!("{operation} could not reach the backend")
    };
    ProviderError::with_cause(ErrorKind::Network, message, err)
        .with_context("operation", operation)
        .with_context("timeout", timed_out)
}
