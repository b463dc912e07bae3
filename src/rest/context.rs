//! Per-call deadline and cancellation.

use crate::provider::domain::{ErrorKind, ProviderError, ProviderResult};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Reason a call stopped before completing.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CallInterrupted {
    /// The caller's deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// The caller cancelled the call.
    #[error("cancelled")]
    Cancelled,
}

/// Deadline and cancellation signal carried through every provider call.
///
/// Interruptions surface as `internal` errors whose cause is a
/// [`CallInterrupted`]. Backend mutations already sent are not rolled back.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancellation: CancellationToken,
}

impl CallContext {
    /// Creates a context with no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context expiring `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().with_deadline(Instant::now() + timeout)
    }

    /// Sets an absolute deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Uses an externally owned cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Derives a context bounded by both this deadline and `timeout` from
    /// now, cancelled whenever this context is.
    #[must_use]
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = self
            .deadline
            .map_or(candidate, |current| current.min(candidate));
        Self {
            deadline: Some(deadline),
            cancellation: self.cancellation.child_token(),
        }
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the time left before the deadline.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns the cancellation token.
    #[must_use]
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Cancels this context and every child derived from it.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Fails when the context is already cancelled or past its deadline.
    ///
    /// # Errors
    ///
    /// Returns an `internal` error wrapping [`CallInterrupted`].
    pub fn check(&self, operation: &str) -> ProviderResult<()> {
        if self.cancellation.is_cancelled() {
            return Err(interrupted(operation, CallInterrupted::Cancelled));
        }
        if self.deadline.is_some_and(|deadline| deadline <= Instant::now()) {
            return Err(interrupted(operation, CallInterrupted::DeadlineExceeded));
        }
        Ok(())
    }

    /// Drives `future` until it completes, the deadline passes, or the
    /// context is cancelled.
    ///
    /// # Errors
    ///
    /// Returns the future's own error, or an `internal` error wrapping
    /// [`CallInterrupted`] when interrupted.
    pub async fn run<T, F>(&self, operation: &str, future: F) -> ProviderResult<T>
    where
        F: Future<Output = ProviderResult<T>>,
    {
        self.check(operation)?;
        let expiry = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => {
                Err(interrupted(operation, CallInterrupted::Cancelled))
            }
            () = expiry => Err(interrupted(operation, CallInterrupted::DeadlineExceeded)),
            result = future => result,
        }
    }
}

fn interrupted(operation: &str, reason: CallInterrupted) -> ProviderError {
    ProviderError::with_cause(
        ErrorKind::Internal,
        format!("{operation} interrupted: {reason}"),
        reason,
    )
    .with_context("operation", operation)
}
