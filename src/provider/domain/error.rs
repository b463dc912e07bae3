//! Provider error taxonomy.
//!
//! Every failure crossing the adapter boundary is a [`ProviderError`] with a
//! stable [`ErrorKind`] that callers branch on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Stable classification of provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input rejected before reaching the backend.
    Validation,
    /// The referenced record does not exist.
    NotFound,
    /// Credentials were missing or rejected.
    Unauthorized,
    /// Credentials lack permission for the operation.
    Forbidden,
    /// The backend throttled the request.
    RateLimit,
    /// Transport failure or backend-side outage.
    Network,
    /// Unexpected failure, including cancellation and unsupported operations.
    Internal,
    /// Adapter or registry configuration is invalid.
    Configuration,
}

impl ErrorKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::RateLimit => "rate_limit",
            Self::Network => "network",
            Self::Internal => "internal",
            Self::Configuration => "configuration",
        }
    }

    /// Returns whether a failed call of this kind may succeed when retried.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::RateLimit)
    }

    /// Returns the process exit code a command layer should use.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Internal => 1,
            Self::Validation => 2,
            Self::Configuration => 3,
            Self::NotFound => 4,
            Self::Unauthorized => 5,
            Self::Forbidden => 6,
            Self::RateLimit => 7,
            Self::Network => 8,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a provider adapter, the REST client, or the registry.
///
/// Values are immutable once built; callers add detail by wrapping with
/// [`ProviderError::wrap`].
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct ProviderError {
    kind: ErrorKind,
    message: String,
    context: BTreeMap<String, String>,
    #[source]
    cause: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates an error without an underlying cause.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: BTreeMap::new(),
            cause: None,
        }
    }

    /// Creates an error wrapping an underlying cause.
    #[must_use]
    pub fn with_cause(
        kind: ErrorKind,
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            cause: Some(Arc::new(cause)),
            ..Self::new(kind, message)
        }
    }

    /// Wraps `inner` with an outer message, keeping its kind and context.
    #[must_use]
    pub fn wrap(inner: Self, message: impl Into<String>) -> Self {
        Self {
            kind: inner.kind,
            message: message.into(),
            context: inner.context.clone(),
            cause: Some(Arc::new(inner)),
        }
    }

    /// Adds a context entry.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Creates a `validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Creates a `not_found` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Creates a `configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates an `internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Creates a `network` error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// Creates the `internal` error returned for operations an adapter does
    /// not support.
    #[must_use]
    pub fn unsupported(provider: &str, operation: &str) -> Self {
        Self::internal(format!("{operation} is not supported by provider {provider}"))
            .with_context("operation", operation)
            .with_context("provider", provider)
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns all context entries.
    #[must_use]
    pub const fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }

    /// Returns one context entry.
    #[must_use]
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }

    /// Returns the underlying cause, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Returns whether the error has the given kind.
    #[must_use]
    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Returns whether the error is `not_found`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.is_kind(ErrorKind::NotFound)
    }

    /// Returns whether the error is `unauthorized`.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.is_kind(ErrorKind::Unauthorized)
    }

    /// Returns whether the error is `rate_limit`.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.is_kind(ErrorKind::RateLimit)
    }

    /// Returns whether the call may succeed when retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
