//! Canonical task query filter.

use super::{Priority, Task, TaskKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive date interval; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest accepted instant.
    pub from: Option<DateTime<Utc>>,
    /// Latest accepted instant.
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Creates a range with both bounds set.
    #[must_use]
    pub const fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Returns whether `instant` falls within the range.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| instant >= from) && self.to.is_none_or(|to| instant <= to)
    }

    /// Returns whether neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Backend-independent task query.
///
/// Values within one field are alternatives; populated fields must all
/// match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Accepted project identifiers.
    #[serde(default)]
    pub project_ids: Vec<String>,
    /// Accepted status identifiers.
    #[serde(default)]
    pub status_ids: Vec<String>,
    /// Accepted assignee identifiers.
    #[serde(default)]
    pub assignee_ids: Vec<String>,
    /// Accepted task types.
    #[serde(default)]
    pub kinds: Vec<TaskKind>,
    /// Accepted priorities.
    #[serde(default)]
    pub priorities: Vec<Priority>,
    /// Accepted labels.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Creation window.
    pub created: Option<DateRange>,
    /// Last-update window.
    pub updated: Option<DateRange>,
    /// Due-date window.
    pub due: Option<DateRange>,
    /// Free-text search term.
    pub text: Option<String>,
    /// Number of matches to skip.
    pub offset: Option<usize>,
    /// Maximum number of matches to return.
    pub limit: Option<usize>,
}

impl TaskFilter {
    /// Creates an empty filter that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to the given projects.
    #[must_use]
    pub fn with_projects(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.project_ids = ids.into_iter().collect();
        self
    }

    /// Restricts to the given status identifiers.
    #[must_use]
    pub fn with_statuses(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.status_ids = ids.into_iter().collect();
        self
    }

    /// Restricts to the given assignees.
    #[must_use]
    pub fn with_assignees(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.assignee_ids = ids.into_iter().collect();
        self
    }

    /// Restricts to the given task types.
    #[must_use]
    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = TaskKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    /// Restricts to the given priorities.
    #[must_use]
    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = Priority>) -> Self {
        self.priorities = priorities.into_iter().collect();
        self
    }

    /// Restricts to tasks carrying any of the given labels.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = String>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    /// Restricts the creation date.
    #[must_use]
    pub const fn with_created(mut self, range: DateRange) -> Self {
        self.created = Some(range);
        self
    }

    /// Restricts the due date.
    #[must_use]
    pub const fn with_due(mut self, range: DateRange) -> Self {
        self.due = Some(range);
        self
    }

    /// Adds a free-text term.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets paging.
    #[must_use]
    pub const fn with_page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }

    /// Returns whether `task` satisfies every populated field.
    ///
    /// Paging is not considered.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let any_of = |values: &[String], candidate: Option<&str>| {
            values.is_empty() || candidate.is_some_and(|value| values.iter().any(|v| v == value))
        };
        let within = |range: Option<&DateRange>, instant: Option<DateTime<Utc>>| {
            range.is_none_or(|bounds| instant.is_some_and(|value| bounds.contains(value)))
        };

        any_of(&self.project_ids, Some(task.project_id.as_str()))
            && any_of(&self.status_ids, Some(task.status.id.as_str()))
            && any_of(&self.assignee_ids, task.assignee_id.as_deref())
            && (self.kinds.is_empty() || self.kinds.contains(&task.kind))
            && (self.priorities.is_empty() || self.priorities.contains(&task.priority))
            && (self.labels.is_empty() || self.labels.iter().any(|label| task.has_label(label)))
            && within(self.created.as_ref(), Some(task.created_at))
            && within(self.updated.as_ref(), Some(task.updated_at))
            && within(self.due.as_ref(), task.due_at)
            && self.matches_text(task)
    }

    fn matches_text(&self, task: &Task) -> bool {
        let Some(term) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let needle = term.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task
                .description
                .as_deref()
                .is_some_and(|body| body.to_lowercase().contains(&needle))
    }

    /// Applies `offset` and `limit` to an already-filtered sequence.
    #[must_use]
    pub fn paginate<T>(&self, items: Vec<T>) -> Vec<T> {
        let limit = self.limit.unwrap_or(usize::MAX);
        items
            .into_iter()
            .skip(self.offset.unwrap_or_default())
            .take(limit)
            .collect()
    }
}
