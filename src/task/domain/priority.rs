//! Canonical task priority.

use super::ParseVocabularyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task priority, ordered from least to most urgent.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can wait indefinitely.
    Lowest,
    /// Below normal urgency.
    Low,
    /// Normal urgency.
    #[default]
    Medium,
    /// Above normal urgency.
    High,
    /// Needs attention soon.
    Highest,
    /// Needs attention now.
    Critical,
}

impl Priority {
    /// All priorities in ascending urgency.
    pub const ALL: [Self; 6] = [
        Self::Lowest,
        Self::Low,
        Self::Medium,
        Self::High,
        Self::Highest,
        Self::Critical,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lowest => "lowest",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Highest => "highest",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParseVocabularyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == normalized)
            .ok_or_else(|| ParseVocabularyError::new("priority", value))
    }
}
