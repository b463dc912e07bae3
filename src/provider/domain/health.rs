//! Provider health domain types.

use super::{ErrorKind, ProviderResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health of a provider as last observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Health has not been checked yet.
    #[default]
    Unknown,
    /// Backend is reachable and accepted the credentials.
    Healthy,
    /// Backend is reachable but throttling requests.
    Degraded,
    /// Backend is unreachable or rejected the check.
    Unhealthy,
}

impl HealthStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Timestamped health observation for a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    status: HealthStatus,
    checked_at: Option<DateTime<Utc>>,
    message: Option<String>,
}

impl HealthSnapshot {
    /// Creates a snapshot taken at `checked_at`.
    #[must_use]
    pub const fn new(status: HealthStatus, checked_at: DateTime<Utc>) -> Self {
        Self {
            status,
            checked_at: Some(checked_at),
            message: None,
        }
    }

    /// Creates the snapshot of a provider that was never checked.
    #[must_use]
    pub const fn unchecked() -> Self {
        Self {
            status: HealthStatus::Unknown,
            checked_at: None,
            message: None,
        }
    }

    /// Creates a `healthy` snapshot.
    #[must_use]
    pub const fn healthy(checked_at: DateTime<Utc>) -> Self {
        Self::new(HealthStatus::Healthy, checked_at)
    }

    /// Creates an `unhealthy` snapshot with details.
    #[must_use]
    pub fn unhealthy(checked_at: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self::new(HealthStatus::Unhealthy, checked_at).with_message(message)
    }

    /// Classifies the outcome of a health check.
    ///
    /// A throttled check is `degraded`; any other failure is `unhealthy`.
    #[must_use]
    pub fn from_check(outcome: &ProviderResult<()>, checked_at: DateTime<Utc>) -> Self {
        match outcome {
            Ok(()) => Self::healthy(checked_at),
            Err(error) if error.is_kind(ErrorKind::RateLimit) => {
                Self::new(HealthStatus::Degraded, checked_at).with_message(error.to_string())
            }
            Err(error) => Self::unhealthy(checked_at, error.to_string()),
        }
    }

    /// Adds an explanatory message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let normalized = message.into().trim().to_owned();
        if !normalized.is_empty() {
            self.message = Some(normalized);
        }
        self
    }

    /// Returns the health status.
    #[must_use]
    pub const fn status(&self) -> HealthStatus {
        self.status
    }

    /// Returns when the check ran, if it ever did.
    #[must_use]
    pub const fn checked_at(&self) -> Option<DateTime<Utc>> {
        self.checked_at
    }

    /// Returns an optional detail message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl Default for HealthSnapshot {
    fn default() -> Self {
        Self::unchecked()
    }
}
