//! Working-context defaults applied to tasks before submission.

use super::{Priority, Task};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Defaults from the caller's working context.
///
/// Applying them never talks to a backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDefaults {
    /// Project to use when a task has none.
    pub project_id: Option<String>,
    /// Assignee to use when a task has none.
    pub assignee_id: Option<String>,
    /// Priority to use when a task still has the model default.
    pub priority: Option<Priority>,
    /// Labels added to every task.
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

impl ContextDefaults {
    /// Returns `task` with missing fields filled from these defaults.
    ///
    /// Project and assignee are only set when blank, priority only replaces
    /// [`Priority::default`], and labels are merged.
    #[must_use]
    pub fn apply_to(&self, mut task: Task) -> Task {
        if task.project_id.trim().is_empty()
            && let Some(project_id) = &self.project_id
        {
            task.project_id.clone_from(project_id);
        }
        if task.assignee_id.is_none() {
            task.assignee_id.clone_from(&self.assignee_id);
        }
        if task.priority == Priority::default()
            && let Some(priority) = self.priority
        {
            task.priority = priority;
        }
        task.labels.extend(self.labels.iter().cloned());
        task
    }
}
