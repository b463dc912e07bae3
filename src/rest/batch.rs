//! Sequential fan-out of single-item operations.

use crate::provider::domain::{BulkFailure, ProviderError, ProviderResult};
use crate::task::domain::Task;
use std::future::Future;

/// Where a sequential batch stopped.
#[derive(Debug, Clone)]
pub struct BatchAbort<T> {
    /// Zero-based position of the failing item.
    pub index: usize,
    /// Results for the items before it.
    pub completed: Vec<T>,
    /// The failure.
    pub error: ProviderError,
}

impl From<BatchAbort<Task>> for BulkFailure {
    fn from(abort: BatchAbort<Task>) -> Self {
        Self::new(abort.index, abort.completed, abort.error)
    }
}

/// Applies `operation` to each item in order and stops at the first failure.
///
/// Items after the failing one are never attempted.
///
/// # Errors
///
/// Returns a [`BatchAbort`] with the failing index and the results so far.
pub async fn sequential_batch<'a, I, T, F, Fut>(
    items: &'a [I],
    mut operation: F,
) -> Result<Vec<T>, BatchAbort<T>>
where
    F: FnMut(&'a I) -> Fut,
    Fut: Future<Output = ProviderResult<T>>,
{
    let mut completed = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match operation(item).await {
            Ok(result) => completed.push(result),
            Err(error) => {
                return Err(BatchAbort {
                    index,
                    completed,
                    error: error.with_context("failed_index", index),
                });
            }
        }
    }
    Ok(completed)
}
