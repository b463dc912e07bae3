//! YouTrack implementation of [`TaskProvider`].

use super::models::{
    AGILE_FIELDS, COMMENT_FIELDS, ISSUE_FIELDS, STATE_BUNDLE_FIELDS, YtAgile, YtComment, YtIssue,
    YtProjectCustomField,
};
use super::translator::comment_from_backend;
use super::{YouTrackSettings, YouTrackTranslator, build_query};
use crate::provider::domain::{
    AdapterConfig, AuthConfig, BulkFailure, Capability, CapabilitySet, ProviderDescriptor,
    ProviderError, ProviderResult, validate_task,
};
use crate::provider::ports::TaskProvider;
use crate::rest::{CallContext, RestClient, TtlCache, sequential_batch};
use crate::task::domain::{Board, Comment, Task, TaskFilter, TaskStatus};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

/// Backend tag for this adapter.
pub const YOUTRACK_BACKEND: &str = "youtrack";

/// Longest issue summary YouTrack accepts.
pub const MAX_TITLE_LENGTH: usize = 255;

const HEALTH_PATH: &str = "api/users/me";

/// Task provider backed by a YouTrack instance.
///
/// Requires bearer (permanent token) authentication. Workflow statuses and
/// boards are cached for the TTLs in the adapter's cache policy.
pub struct YouTrackProvider {
    name: String,
    client: RestClient,
    translator: YouTrackTranslator,
    page_size: usize,
    statuses: TtlCache<String, Vec<TaskStatus>>,
    boards: TtlCache<(), Vec<Board>>,
}

impl YouTrackProvider {
    /// Builds the provider from its adapter configuration.
    ///
    /// # Errors
    ///
    /// Returns a `configuration` error when the configuration is invalid,
    /// lacks a base URL, uses anything but bearer authentication, or carries
    /// invalid settings.
    pub fn from_config(config: &AdapterConfig) -> ProviderResult<Self> {
        config.validate()?;
        if !matches!(config.auth, AuthConfig::Bearer { .. }) {
            return Err(ProviderError::configuration(format!(
                "provider '{}' requires bearer authentication, got {}",
                config.name,
                config.auth.kind_name()
            ))
            .with_context("field", "auth.type"));
        }
        let settings = config.settings_as::<YouTrackSettings>()?;
        settings.validate()?;
        let client = RestClient::new(config)?;
        Ok(Self {
            name: config.name.clone(),
            client,
            page_size: settings.page_size,
            translator: YouTrackTranslator::new(settings),
            statuses: TtlCache::new(Duration::from_secs(config.cache.statuses_ttl_secs)),
            boards: TtlCache::new(Duration::from_secs(config.cache.boards_ttl_secs)),
        })
    }

    /// Returns the translator used for this instance.
    #[must_use]
    pub const fn translator(&self) -> &YouTrackTranslator {
        &self.translator
    }

    fn issue_path(&self, id: &str) -> ProviderResult<String> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(format!("api/issues/{id}"))
        } else {
            Err(ProviderError::validation(format!("invalid issue id '{id}'"))
                .with_context("field", "id")
                .with_context("provider", &self.name))
        }
    }

    fn identity_of(&self, task: &Task) -> ProviderResult<String> {
        task.key
            .as_deref()
            .or(task.external_id.as_deref())
            .filter(|id| !id.is_empty())
            .map(ToOwned::to_owned)
            .ok_or_else(|| {
                ProviderError::not_found(format!(
                    "task '{}' has no backend identifier",
                    task.display_id()
                ))
                .with_context("provider", &self.name)
                .with_context("task", task.display_id())
            })
    }

    fn issue_fields() -> [(&'static str, String); 1] {
        [("fields", ISSUE_FIELDS.to_owned())]
    }

    fn to_task(&self, issue: &YtIssue) -> ProviderResult<Task> {
        self.translator.task_from_issue(issue, &self.name)
    }

    async fn query_issues(
        &self,
        ctx: &CallContext,
        query: String,
        filter: &TaskFilter,
    ) -> ProviderResult<Vec<Task>> {
        let mut params = vec![
            ("fields", ISSUE_FIELDS.to_owned()),
            ("$skip", filter.offset.unwrap_or_default().to_string()),
            ("$top", filter.limit.unwrap_or(self.page_size).to_string()),
        ];
        if !query.is_empty() {
            params.push(("query", query));
        }
        let issues: Vec<YtIssue> = self.client.get_json(ctx, "api/issues", &params).await?;
        debug!(provider = %self.name, count = issues.len(), "listed issues");
        issues.iter().map(|issue| self.to_task(issue)).collect()
    }
}

#[async_trait]
impl TaskProvider for YouTrackProvider {
    fn info(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            name: self.name.clone(),
            backend: YOUTRACK_BACKEND.to_owned(),
            capabilities: [
                Capability::Tasks,
                Capability::Boards,
                Capability::CustomFields,
                Capability::Workflows,
                Capability::TimeTracking,
                Capability::HierarchicalTasks,
                Capability::AdvancedSearch,
                Capability::Api,
            ]
            .into_iter()
            .collect::<CapabilitySet>(),
            max_title_length: MAX_TITLE_LENGTH,
        }
    }

    #[instrument(name = "youtrack.create_task", skip_all, fields(provider = %self.name))]
    async fn create_task(&self, ctx: &CallContext, task: &Task) -> ProviderResult<Task> {
        validate_task(task, MAX_TITLE_LENGTH)?;
        let draft = self.translator.draft_from_task(task, false);
        let issue: YtIssue = self
            .client
            .post_json(ctx, "api/issues", &Self::issue_fields(), &draft)
            .await?;
        let created = self.to_task(&issue)?;
        debug!(provider = %self.name, key = %created.display_id(), "created issue");
        Ok(created)
    }

    #[instrument(name = "youtrack.get_task", skip(self, ctx), fields(provider = %self.name))]
    async fn get_task(&self, ctx: &CallContext, id: &str) -> ProviderResult<Task> {
        let path = self.issue_path(id)?;
        let issue: YtIssue = self
            .client
            .get_json(ctx, &path, &Self::issue_fields())
            .await?;
        self.to_task(&issue)
    }

    #[instrument(name = "youtrack.update_task", skip_all, fields(provider = %self.name))]
    async fn update_task(&self, ctx: &CallContext, task: &Task) -> ProviderResult<Task> {
        validate_task(task, MAX_TITLE_LENGTH)?;
        let path = self.issue_path(&self.identity_of(task)?)?;
        let draft = self.translator.draft_from_task(task, true);
        let issue: YtIssue = self
            .client
            .post_json(ctx, &path, &Self::issue_fields(), &draft)
            .await?;
        self.to_task(&issue)
    }

    #[instrument(name = "youtrack.delete_task", skip(self, ctx), fields(provider = %self.name))]
    async fn delete_task(&self, ctx: &CallContext, id: &str) -> ProviderResult<()> {
        let path = self.issue_path(id)?;
        self.client.delete(ctx, &path).await
    }

    #[instrument(name = "youtrack.list_tasks", skip_all, fields(provider = %self.name))]
    async fn list_tasks(
        &self,
        ctx: &CallContext,
        filter: &TaskFilter,
    ) -> ProviderResult<Vec<Task>> {
        self.query_issues(ctx, build_query(&self.translator, filter), filter)
            .await
    }

    #[instrument(name = "youtrack.search_tasks", skip(self, ctx, filter), fields(provider = %self.name))]
    async fn search_tasks(
        &self,
        ctx: &CallContext,
        query: &str,
        filter: &TaskFilter,
    ) -> ProviderResult<Vec<Task>> {
        let combined = [build_query(&self.translator, filter), query.trim().to_owned()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        self.query_issues(ctx, combined, filter).await
    }

    #[instrument(name = "youtrack.update_status", skip(self, ctx, status), fields(provider = %self.name))]
    async fn update_status(
        &self,
        ctx: &CallContext,
        id: &str,
        status: &TaskStatus,
    ) -> ProviderResult<Task> {
        let path = self.issue_path(id)?;
        let draft = self.translator.status_draft(status);
        let issue: YtIssue = self
            .client
            .post_json(ctx, &path, &Self::issue_fields(), &draft)
            .await?;
        self.to_task(&issue)
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

    #[instrument(name = "youtrack.list_statuses", skip(self, ctx), fields(provider = %self.name))]
    async fn list_statuses(
        &self,
        ctx: &CallContext,
        project_id: &str,
    ) -> ProviderResult<Vec<TaskStatus>> {
        let project = project_id.trim();
        if project.is_empty() {
            return Err(ProviderError::validation("project id must not be empty")
                .with_context("field", "project_id"));
        }
        if let Some(cached) = self.statuses.get(&project.to_owned()) {
            return Ok(cached);
        }
        let fields: Vec<YtProjectCustomField> = self
            .client
            .get_json(
                ctx,
                &format!("api/admin/projects/{project}/customFields"),
                &[("fields", STATE_BUNDLE_FIELDS.to_owned())],
            )
            .await?;
        let statuses = self
            .translator
            .statuses_from_project_fields(&fields)
            .unwrap_or_else(TaskStatus::default_workflow);
        self.statuses.insert(project.to_owned(), statuses.clone());
        Ok(statuses)
    }

    #[instrument(name = "youtrack.add_comment", skip(self, ctx, text), fields(provider = %self.name))]
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
        let path = format!("{}/comments", self.issue_path(id)?);
        let comment: YtComment = self
            .client
            .post_json(
                ctx,
                &path,
                &[("fields", COMMENT_FIELDS.to_owned())],
                &json!({ "text": text }),
            )
            .await?;
        comment_from_backend(&comment).ok_or_else(|| {
            ProviderError::internal("YouTrack returned a comment without an id")
                .with_context("provider", &self.name)
        })
    }

    #[instrument(name = "youtrack.list_boards", skip_all, fields(provider = %self.name))]
    async fn list_boards(&self, ctx: &CallContext) -> ProviderResult<Vec<Board>> {
        if let Some(cached) = self.boards.get(&()) {
            return Ok(cached);
        }
        let agiles: Vec<YtAgile> = self
            .client
            .get_json(ctx, "api/agiles", &[("fields", AGILE_FIELDS.to_owned())])
            .await?;
        let boards: Vec<Board> = agiles
            .iter()
            .map(|agile| self.translator.board_from_agile(agile))
            .collect();
        self.boards.insert((), boards.clone());
        Ok(boards)
    }

    async fn health_check(&self, ctx: &CallContext) -> ProviderResult<()> {
        self.client.probe(ctx, HEALTH_PATH).await
    }

    async fn close(&self) -> ProviderResult<()> {
        self.client.close();
        self.statuses.clear();
        self.boards.clear();
        Ok(())
    }
}
