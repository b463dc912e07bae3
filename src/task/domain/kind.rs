//! Canonical task type.

use super::ParseVocabularyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of work a task represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Generic unit of work.
    #[default]
    Task,
    /// Defect report.
    Bug,
    /// New capability.
    Feature,
    /// Large body of work grouping other tasks.
    Epic,
    /// User-facing requirement.
    Story,
    /// Part of a larger task.
    Subtask,
    /// Enhancement of existing behaviour.
    Improvement,
    /// Time-boxed investigation.
    Spike,
    /// Open-ended investigation.
    Research,
    /// Maintenance with no user-visible effect.
    Chore,
}

impl TaskKind {
    /// Every task type.
    pub const ALL: [Self; 10] = [
        Self::Task,
        Self::Bug,
        Self::Feature,
        Self::Epic,
        Self::Story,
        Self::Subtask,
        Self::Improvement,
        Self::Spike,
        Self::Research,
        Self::Chore,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Epic => "epic",
            Self::Story => "story",
            Self::Subtask => "subtask",
            Self::Improvement => "improvement",
            Self::Spike => "spike",
            Self::Research => "research",
            Self::Chore => "chore",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskKind {
    type Error = ParseVocabularyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseVocabularyError::new("task type", value))
    }
}
