//! Canonical task aggregate.

use super::{Attachment, Comment, Priority, TaskId, TaskKind, TaskStatus, TimeTracking};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Dependency edges to other tasks, by backend identifier.
///
/// Edges never embed the related task, so a task graph with cycles can be
/// represented without recursion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRelations {
    /// Tasks this task blocks.
    #[serde(default)]
    pub blocks: Vec<String>,
    /// Tasks blocking this task.
    #[serde(default)]
    pub blocked_by: Vec<String>,
    /// Loosely related tasks.
    #[serde(default)]
    pub related: Vec<String>,
    /// Tasks this task duplicates.
    #[serde(default)]
    pub duplicate_of: Vec<String>,
}

impl TaskRelations {
    /// Returns whether no edge is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
            && self.blocked_by.is_empty()
            && self.related.is_empty()
            && self.duplicate_of.is_empty()
    }
}

/// Backend-independent task.
///
/// `key` and `external_id` are assigned by the owning backend and do not
/// change once set. [`Task::display_id`] picks the identifier shown to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Internal identifier.
    pub id: TaskId,
    /// Backend identifier.
    pub external_id: Option<String>,
    /// Human-readable backend key such as `PROJ-12`.
    pub key: Option<String>,
    /// Summary line.
    pub title: String,
    /// Long-form description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: Priority,
    /// Task type.
    pub kind: TaskKind,
    /// Owning project identifier.
    pub project_id: String,
    /// Board the task is shown on.
    pub board_id: Option<String>,
    /// Sprint the task is planned in.
    pub sprint_id: Option<String>,
    /// Assigned user identifier.
    pub assignee_id: Option<String>,
    /// Reporting user identifier.
    pub reporter_id: Option<String>,
    /// Creating user identifier.
    pub creator_id: Option<String>,
    /// Parent task identifier.
    pub parent_id: Option<String>,
    /// Child task identifiers.
    #[serde(default)]
    pub child_ids: Vec<String>,
    /// Epic identifier.
    pub epic_id: Option<String>,
    /// Dependency edges.
    #[serde(default)]
    pub relations: TaskRelations,
    /// Label set.
    #[serde(default)]
    pub labels: BTreeSet<String>,
    /// Opaque backend-independent custom fields.
    #[serde(default)]
    pub custom_fields: BTreeMap<String, Value>,
    /// File attachments.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Comments.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Effort tracking.
    #[serde(default)]
    pub time_tracking: TimeTracking,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Due date.
    pub due_at: Option<DateTime<Utc>>,
    /// Planned or actual start.
    pub started_at: Option<DateTime<Utc>>,
    /// Resolution timestamp.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Name of the adapter that last created or updated the task.
    pub provider: Option<String>,
}

impl Task {
    /// Creates a task in the default `todo` status with medium priority.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        project_id: impl Into<String>,
        clock: &(impl Clock + ?Sized),
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            external_id: None,
            key: None,
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: Priority::default(),
            kind: TaskKind::default(),
            project_id: project_id.into(),
            board_id: None,
            sprint_id: None,
            assignee_id: None,
            reporter_id: None,
            creator_id: None,
            parent_id: None,
            child_ids: Vec::new(),
            epic_id: None,
            relations: TaskRelations::default(),
            labels: BTreeSet::new(),
            custom_fields: BTreeMap::new(),
            attachments: Vec::new(),
            comments: Vec::new(),
            time_tracking: TimeTracking::default(),
            created_at: timestamp,
            updated_at: timestamp,
            due_at: None,
            started_at: None,
            resolved_at: None,
            provider: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the task type.
    #[must_use]
    pub const fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee_id: impl Into<String>) -> Self {
        self.assignee_id = Some(assignee_id.into());
        self
    }

    /// Replaces the label set.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = String>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Sets the estimated effort.
    #[must_use]
    pub const fn with_estimate(mut self, estimate: Duration) -> Self {
        self.time_tracking.estimated = Some(estimate);
        self
    }

    /// Assigns backend identity.
    #[must_use]
    pub fn with_external_identity(
        mut self,
        external_id: impl Into<String>,
        key: Option<String>,
    ) -> Self {
        self.external_id = Some(external_id.into());
        self.key = key;
        self
    }

    /// Returns the identifier to show users: key, then external id, then the
    /// internal id.
    #[must_use]
    pub fn display_id(&self) -> String {
        self.key
            .as_deref()
            .filter(|key| !key.is_empty())
            .or_else(|| self.external_id.as_deref().filter(|id| !id.is_empty()))
            .map_or_else(|| self.id.to_string(), ToOwned::to_owned)
    }

    /// Returns whether any of the backend or internal identifiers equals
    /// `candidate`.
    #[must_use]
    pub fn is_identified_by(&self, candidate: &str) -> bool {
        self.key.as_deref() == Some(candidate)
            || self.external_id.as_deref() == Some(candidate)
            || self.id.to_string() == candidate
    }

    /// Returns whether the task is finished: terminal status or `done`
    /// category.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.terminal || self.status.category == super::StatusCategory::Done
    }

    /// Returns whether the task is blocked by status or by dependencies.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.status.category == super::StatusCategory::Blocked
            || !self.relations.blocked_by.is_empty()
    }

    /// Returns whether the due date has passed on an unfinished task.
    #[must_use]
    pub fn is_overdue(&self, clock: &(impl Clock + ?Sized)) -> bool {
        self.due_at
            .is_some_and(|due| due < clock.utc() && !self.is_completed())
    }

    /// Returns the time elapsed since creation.
    #[must_use]
    pub fn age(&self, clock: &(impl Clock + ?Sized)) -> TimeDelta {
        clock.utc() - self.created_at
    }

    /// Returns whether the task carries `label`.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }
}
