//! Pre-flight validation shared by every adapter.

use super::{ProviderError, ProviderResult};
use crate::task::domain::Task;

/// Checks the fields every backend requires before a create or update.
///
/// Title length is counted in characters.
///
/// # Errors
///
/// Returns a `validation` [`ProviderError`] when the title is blank, the
/// project is blank, or the title exceeds `max_title_length`.
pub fn validate_task(task: &Task, max_title_length: usize) -> ProviderResult<()> {
    if task.title.trim().is_empty() {
        return Err(ProviderError::validation("task title must not be empty")
            .with_context("field", "title"));
    }
    if task.project_id.trim().is_empty() {
        return Err(ProviderError::validation("task project must not be empty")
            .with_context("field", "project_id"));
    }
    let length = task.title.chars().count();
    if length > max_title_length {
        return Err(ProviderError::validation(format!(
            "task title is {length} characters; the limit is {max_title_length}"
        ))
        .with_context("field", "title")
        .with_context("max_length", max_title_length));
    }
    Ok(())
}
