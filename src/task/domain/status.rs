//! Canonical task status and its workflow category.

use super::ParseVocabularyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend resolution names that mean the work was abandoned rather than
/// finished.
const NEGATIVE_RESOLUTIONS: &[&str] = &[
    "duplicate",
    "won't",
    "wont",
    "obsolete",
    "can't reproduce",
    "cannot reproduce",
    "incomplete",
    "rejected",
    "declined",
    "invalid",
    "cancel",
];

/// Workflow category every backend status collapses into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    /// Not started.
    Todo,
    /// Actively being worked on.
    InProgress,
    /// Awaiting review.
    Review,
    /// Under test or verification.
    Testing,
    /// Cannot progress until something else happens.
    Blocked,
    /// Finished successfully.
    Done,
    /// Closed without being finished.
    Cancelled,
}

impl StatusCategory {
    /// All categories in workflow order.
    pub const ALL: [Self; 7] = [
        Self::Todo,
        Self::InProgress,
        Self::Review,
        Self::Testing,
        Self::Blocked,
        Self::Done,
        Self::Cancelled,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Testing => "testing",
            Self::Blocked => "blocked",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns a human-readable label.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Testing => "Testing",
            Self::Blocked => "Blocked",
            Self::Done => "Done",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Returns whether tasks in this category are closed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }

    /// Infers a category from a backend status name.
    ///
    /// Resolved names become [`Self::Done`] unless they match the negative
    /// resolution vocabulary, in which case they become [`Self::Cancelled`].
    /// Unresolved names are matched on keywords, falling back to
    /// [`Self::Todo`].
    #[must_use]
    pub fn infer(name: &str, resolved: bool) -> Self {
        let lowered = name.trim().to_lowercase();
        if resolved {
            let negative = NEGATIVE_RESOLUTIONS
                .iter()
                .any(|word| lowered.contains(word));
            return if negative { Self::Cancelled } else { Self::Done };
        }
        if lowered.contains("progress") || lowered.contains("dev") {
            Self::InProgress
        } else if lowered.contains("block") {
            Self::Blocked
        } else if lowered.contains("review") || lowered.contains("test") {
            Self::Review
        } else {
            Self::Todo
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for StatusCategory {
    type Error = ParseVocabularyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ParseVocabularyError::new("status category", value))
    }
}

/// Canonical task status.
///
/// `id` is stable across backends for table-mapped values and derived from
/// the backend name for synthesized ones. `terminal` mirrors the backend's
/// own resolved flag and may differ from `category.is_terminal()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Stable identifier, lowercase with underscores.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Workflow category.
    pub category: StatusCategory,
    /// Position in the owning workflow.
    pub ordinal: u32,
    /// Whether the status closes the task.
    pub terminal: bool,
}

impl TaskStatus {
    /// Creates a status whose terminal flag follows its category.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: StatusCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            ordinal: 0,
            terminal: category.is_terminal(),
        }
    }

    /// Creates the generic status representing a whole category.
    #[must_use]
    pub fn from_category(category: StatusCategory) -> Self {
        let ordinal = StatusCategory::ALL
            .iter()
            .position(|candidate| *candidate == category)
            .and_then(|index| u32::try_from(index).ok())
            .unwrap_or_default();
        Self::new(category.as_str(), category.display_name(), category).with_ordinal(ordinal)
    }

    /// Builds a canonical status for a backend value with no table entry.
    ///
    /// The identifier is the lowercased backend name with spaces replaced by
    /// underscores; the category is inferred from the name and the backend's
    /// resolved flag, which also becomes the terminal flag.
    #[must_use]
    pub fn synthesize(backend_name: &str, resolved: bool) -> Self {
        let trimmed = backend_name.trim();
        Self {
            id: Self::normalize_id(trimmed),
            name: trimmed.to_owned(),
            category: StatusCategory::infer(trimmed, resolved),
            ordinal: 0,
            terminal: resolved,
        }
    }

    /// Normalizes a backend status name into a canonical identifier.
    #[must_use]
    pub fn normalize_id(name: &str) -> String {
        name.trim().to_lowercase().replace(' ', "_")
    }

    /// Returns one generic status per category, in workflow order.
    #[must_use]
    pub fn default_workflow() -> Vec<Self> {
        StatusCategory::ALL
            .into_iter()
            .map(Self::from_category)
            .collect()
    }

    /// Sets the workflow position.
    #[must_use]
    pub const fn with_ordinal(mut self, ordinal: u32) -> Self {
        self.ordinal = ordinal;
        self
    }

    /// Overrides the terminal flag.
    #[must_use]
    pub const fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::from_category(StatusCategory::Todo)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
