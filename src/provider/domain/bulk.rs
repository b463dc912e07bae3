//! Bulk operation failure reporting.

use super::ProviderError;
use crate::task::domain::Task;
use thiserror::Error;

/// First failure of a sequential bulk operation.
///
/// Items before `index` were applied and are returned in `completed`; items
/// after it were not attempted.
#[derive(Debug, Clone, Error)]
#[error("bulk operation failed at item {index}: {error}")]
pub struct BulkFailure {
    /// Zero-based position of the failing item.
    pub index: usize,
    /// Results for the items applied before the failure.
    pub completed: Vec<Task>,
    /// The failure itself.
    #[source]
    pub error: ProviderError,
}

impl BulkFailure {
    /// Creates a failure report.
    #[must_use]
    pub const fn new(index: usize, completed: Vec<Task>, error: ProviderError) -> Self {
        Self {
            index,
            completed,
            error,
        }
    }

    /// Flattens the report into a [`ProviderError`] carrying the failing index
    /// in its context.
    #[must_use]
    pub fn into_provider_error(self) -> ProviderError {
        let index = self.index;
        let completed = self.completed.len();
        ProviderError::wrap(self.error, format!("bulk operation failed at item {index}"))
            .with_context("failed_index", index)
            .with_context("completed", completed)
    }
}
