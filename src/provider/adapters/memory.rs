//! In-process task store implementing the full provider contract.
//!
//! Registered under the `memory` backend tag. Keys are `<PROJECT>-<n>` with a
//! counter per project.

use crate::provider::domain::{
    AdapterConfig, BulkFailure, Capability, CapabilitySet, ProviderDescriptor, ProviderError,
    ProviderResult, validate_task,
};
use crate::provider::ports::TaskProvider;
use crate::rest::{CallContext, sequential_batch};
use crate::task::domain::{Board, Comment, Task, TaskFilter, TaskId, TaskStatus};
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Backend tag for this adapter.
pub const MEMORY_BACKEND: &str = "memory";

const fn default_max_title_length() -> usize {
    500
}

/// Typed `settings` for the memory backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemorySettings {
    /// Longest accepted title, in characters.
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            max_title_length: default_max_title_length(),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    tasks: Vec<Task>,
    sequences: HashMap<String, u64>,
    comments: u64,
}

impl MemoryState {
    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.is_identified_by(id))
    }

    fn position_of(&self, task: &Task) -> Option<usize> {
        self.tasks.iter().position(|stored| {
            stored.id == task.id
                || task.key.as_deref().is_some_and(|key| stored.is_identified_by(key))
                || task
                    .external_id
                    .as_deref()
                    .is_some_and(|external| stored.is_identified_by(external))
        })
    }

    fn next_key(&mut self, project_id: &str) -> String {
        let project = project_id.trim().to_uppercase();
        let counter = self.sequences.entry(project.clone()).or_default();
        *counter = counter.saturating_add(1);
        format!("{project}-{counter}")
    }
}

/// Thread-safe in-memory task provider.
pub struct InMemoryTaskProvider {
    name: String,
    settings: MemorySettings,
    state: Arc<RwLock<MemoryState>>,
    clock: Arc<dyn Clock + Send + Sync>,
    health_failure: RwLock<Option<ProviderError>>,
    closed: AtomicBool,
}

impl InMemoryTaskProvider {
    /// Creates an empty provider named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            name: name.into(),
            settings: MemorySettings::default(),
            state: Arc::new(RwLock::new(MemoryState::default())),
            clock,
            health_failure: RwLock::new(None),
            closed: AtomicBool::new(false),
        }
    }

    /// Builds the provider from its adapter configuration.
    ///
    /// # Errors
    ///
    /// Returns a `configuration` error when the configuration or its
    /// settings are invalid.
    pub fn from_config(config: &AdapterConfig) -> ProviderResult<Self> {
        config.validate()?;
        let settings = config.settings_as::<MemorySettings>()?;
        Ok(Self::new(config.name.clone(), Arc::new(DefaultClock)).with_settings(settings))
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: MemorySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Makes later health checks fail with `failure`, or pass again with
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns an `internal` error when the state lock is poisoned.
    pub fn set_unhealthy(&self, failure: Option<ProviderError>) -> ProviderResult<()> {
        let mut slot = self
            .health_failure
            .write()
            .map_err(|err| ProviderError::internal(format!("health lock poisoned: {err}")))?;
        *slot = failure;
        Ok(())
    }

    /// Returns whether [`TaskProvider::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self, ctx: &CallContext, operation: &str) -> ProviderResult<()> {
        if self.is_closed() {
            return Err(ProviderError::internal(format!(
                "provider '{}' is closed",
                self.name
            ))
            .with_context("provider", &self.name));
        }
        ctx.check(operation)
    }

    fn read_state(&self) -> ProviderResult<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|err| ProviderError::internal(format!("task store lock poisoned: {err}")))
    }

    fn write_state(&self) -> ProviderResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|err| ProviderError::internal(format!("task store lock poisoned: {err}")))
    }

    fn missing(&self, id: &str) -> ProviderError {
        ProviderError::not_found(format!("task '{id}' does not exist"))
            .with_context("provider", &self.name)
            .with_context("task", id)
    }

    fn stamp_resolution(&self, task: &mut Task) {
        if task.status.terminal {
            task.resolved_at.get_or_insert_with(|| self.clock.utc());
        } else {
            task.resolved_at = None;
        }
    }
}

#[async_trait]
impl TaskProvider for InMemoryTaskProvider {
    fn info(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            name: self.name.clone(),
            backend: MEMORY_BACKEND.to_owned(),
            capabilities: [
                Capability::Tasks,
                Capability::CustomFields,
                Capability::HierarchicalTasks,
            ]
            .into_iter()
            .collect::<CapabilitySet>(),
            max_title_length: self.settings.max_title_length,
        }
    }

    async fn create_task(&self, ctx: &CallContext, task: &Task) -> ProviderResult<Task> {
        validate_task(task, self.settings.max_title_length)?;
        self.ensure_open(ctx, "create_task")?;
        let now = self.clock.utc();
        let mut state = self.write_state()?;
        let key = state.next_key(&task.project_id);
        let id = TaskId::new();
        let mut created = task.clone();
        created.id = id;
        created.external_id = Some(id.to_string());
        created.key = Some(key);
        created.created_at = now;
        created.updated_at = now;
        created.provider = Some(self.name.clone());
        self.stamp_resolution(&mut created);
        state.tasks.push(created.clone());
        debug!(provider = %self.name, key = %created.display_id(), "created task");
        Ok(created)
    }

    async fn get_task(&self, ctx: &CallContext, id: &str) -> ProviderResult<Task> {
        self.ensure_open(ctx, "get_task")?;
        let state = self.read_state()?;
        state
            .position(id)
            .and_then(|index| state.tasks.get(index))
            .cloned()
            .ok_or_else(|| self.missing(id))
    }

    async fn update_task(&self, ctx: &CallContext, task: &Task) -> ProviderResult<Task> {
        validate_task(task, self.settings.max_title_length)?;
        self.ensure_open(ctx, "update_task")?;
        let now = self.clock.utc();
        let mut state = self.write_state()?;
        let index = state
            .position_of(task)
            .ok_or_else(|| self.missing(&task.display_id()))?;
        let stored = state
            .tasks
            .get_mut(index)
            .ok_or_else(|| self.missing(&task.display_id()))?;
        let mut updated = task.clone();
        updated.id = stored.id;
        updated.external_id.clone_from(&stored.external_id);
        updated.key.clone_from(&stored.key);
        updated.created_at = stored.created_at;
        updated.updated_at = now;
        updated.provider = Some(self.name.clone());
        self.stamp_resolution(&mut updated);
        *stored = updated.clone();
        Ok(updated)
    }

    async fn delete_task(&self, ctx: &CallContext, id: &str) -> ProviderResult<()> {
        self.ensure_open(ctx, "delete_task")?;
        let mut state = self.write_state()?;
        let index = state.position(id).ok_or_else(|| self.missing(id))?;
        state.tasks.remove(index);
        Ok(())
    }

    async fn list_tasks(
        &self,
        ctx: &CallContext,
        filter: &TaskFilter,
    ) -> ProviderResult<Vec<Task>> {
        self.ensure_open(ctx, "list_tasks")?;
        let state = self.read_state()?;
        let matching: Vec<Task> = state
            .tasks
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        Ok(filter.paginate(matching))
    }

    async fn search_tasks(
        &self,
        ctx: &CallContext,
        query: &str,
        filter: &TaskFilter,
    ) -> ProviderResult<Vec<Task>> {
        self.ensure_open(ctx, "search_tasks")?;
        let term = TaskFilter::new().with_text(query);
        let state = self.read_state()?;
        let matching: Vec<Task> = state
            .tasks
            .iter()
            .filter(|task| filter.matches(task) && term.matches(task))
            .cloned()
            .collect();
        Ok(filter.paginate(matching))
    }

    async fn update_status(
        &self,
        ctx: &CallContext,
        id: &str,
        status: &TaskStatus,
    ) -> ProviderResult<Task> {
        self.ensure_open(ctx, "update_status")?;
        let now = self.clock.utc();
        let mut state = self.write_state()?;
        let index = state.position(id).ok_or_else(|| self.missing(id))?;
        let stored = state
            .tasks
            .get_mut(index)
            .ok_or_else(|| self.missing(id))?;
        stored.status = status.clone();
        stored.updated_at = now;
        stored.provider = Some(self.name.clone());
        self.stamp_resolution(stored);
        Ok(stored.clone())
    }

    async fn bulk_create(
        &self,
        ctx: &CallContext,
        tasks: &[Task],
    ) -> Result<Vec<Task>, BulkFailure> {
        sequential_batch(tasks, |task| self.create_task(ctx, task))
            .await
            .map_err(BulkFailure::from)
    }

    async fn bulk_update(
        &self,
        ctx: &CallContext,
        tasks: &[Task],
    ) -> Result<Vec<Task>, BulkFailure> {
        sequential_batch(tasks, |task| self.update_task(ctx, task))
            .await
            .map_err(BulkFailure::from)
    }

    async fn list_statuses(
        &self,
        ctx: &CallContext,
        _project_id: &str,
    ) -> ProviderResult<Vec<TaskStatus>> {
        self.ensure_open(ctx, "list_statuses")?;
        Ok(TaskStatus::default_workflow())
    }

    async fn add_comment(
        &self,
        ctx: &CallContext,
        id: &str,
        text: &str,
    ) -> ProviderResult<Comment> {
        if text.trim().is_empty() {
            return Err(ProviderError::validation("comment text must not be empty")
                .with_context("field", "text"));
        }
        self.ensure_open(ctx, "add_comment")?;
        let now = self.clock.utc();
        let mut state = self.write_state()?;
        let index = state.position(id).ok_or_else(|| self.missing(id))?;
        state.comments = state.comments.saturating_add(1);
        let comment = Comment::new(format!("c-{}", state.comments), text, now);
        let stored = state
            .tasks
            .get_mut(index)
            .ok_or_else(|| self.missing(id))?;
        stored.comments.push(comment.clone());
        stored.updated_at = now;
        Ok(comment)
    }

    async fn list_boards(&self, ctx: &CallContext) -> ProviderResult<Vec<Board>> {
        self.ensure_open(ctx, "list_boards")?;
        self.info()
            .capabilities
            .require(Capability::Boards, &self.name, "list_boards")?;
        Ok(Vec::new())
    }

    async fn health_check(&self, ctx: &CallContext) -> ProviderResult<()> {
        self.ensure_open(ctx, "health_check")?;
        let failure = self
            .health_failure
            .read()
            .map_err(|err| ProviderError::internal(format!("health lock poisoned: {err}")))?;
        failure.clone().map_or(Ok(()), Err)
    }

    async fn close(&self) -> ProviderResult<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(provider = %self.name, "closed in-memory provider");
        }
        Ok(())
    }
}
