//! Provider adapter contract.

use crate::provider::domain::{BulkFailure, ProviderDescriptor, ProviderResult};
use crate::rest::CallContext;
use crate::task::domain::{Board, Comment, Task, TaskFilter, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;

/// Shared handle to a live adapter.
pub type SharedProvider = Arc<dyn TaskProvider>;

/// Canonical operations every task-tracker backend supports.
///
/// All calls honour the deadline and cancellation carried by the
/// [`CallContext`]. Identifiers accepted by single-task operations are the
/// backend key or external id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskProvider: Send + Sync {
    /// Describes the adapter: name, backend tag, capabilities, limits.
    fn info(&self) -> ProviderDescriptor;

    /// Creates a task and returns it with backend identity assigned.
    ///
    /// # Errors
    ///
    /// Returns `validation` for a blank title or project, or an over-long
    /// title, without contacting the backend.
    async fn create_task(&self, ctx: &CallContext, task: &Task) -> ProviderResult<Task>;

    /// Fetches one task.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when no task has the identifier.
    async fn get_task(&self, ctx: &CallContext, id: &str) -> ProviderResult<Task>;

    /// Replaces the translatable fields of an existing task.
    ///
    /// # Errors
    ///
    /// Returns `validation` as for create, or `not_found` when the task does
    /// not exist.
    async fn update_task(&self, ctx: &CallContext, task: &Task) -> ProviderResult<Task>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when no task has the identifier.
    async fn delete_task(&self, ctx: &CallContext, id: &str) -> ProviderResult<()>;

    /// Lists tasks matching a canonical filter.
    async fn list_tasks(&self, ctx: &CallContext, filter: &TaskFilter)
    -> ProviderResult<Vec<Task>>;

    /// Searches with a backend query combined with a canonical filter.
    async fn search_tasks(
        &self,
        ctx: &CallContext,
        query: &str,
        filter: &TaskFilter,
    ) -> ProviderResult<Vec<Task>>;

    /// Moves a task to another status.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when the task does not exist.
    async fn update_status(
        &self,
        ctx: &CallContext,
        id: &str,
        status: &TaskStatus,
    ) -> ProviderResult<Task>;

    /// Creates tasks in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns a [`BulkFailure`] naming the failing index and carrying the
    /// tasks created before it.
    async fn bulk_create(&self, ctx: &CallContext, tasks: &[Task])
    -> Result<Vec<Task>, BulkFailure>;

    /// Updates tasks in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns a [`BulkFailure`] naming the failing index and carrying the
    /// tasks updated before it.
    async fn bulk_update(&self, ctx: &CallContext, tasks: &[Task])
    -> Result<Vec<Task>, BulkFailure>;

    /// Lists the workflow statuses available in a project.
    async fn list_statuses(&self, ctx: &CallContext, project_id: &str)
    -> ProviderResult<Vec<TaskStatus>>;

    /// Adds a comment to a task.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when the task does not exist.
    async fn add_comment(&self, ctx: &CallContext, id: &str, text: &str)
    -> ProviderResult<Comment>;

    /// Lists boards.
    ///
    /// # Errors
    ///
    /// Returns an `internal` unsupported error when the adapter does not
    /// declare the boards capability.
    async fn list_boards(&self, ctx: &CallContext) -> ProviderResult<Vec<Board>>;

    /// Performs one lightweight authenticated call without retries.
    async fn health_check(&self, ctx: &CallContext) -> ProviderResult<()>;

    /// Releases pooled connections. Calling it again is a no-op.
    async fn close(&self) -> ProviderResult<()>;
}
