//! Time-tracking values attached to a task.

use super::duration_secs;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Estimated, spent, and remaining effort.
///
/// All three serialize as whole seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeTracking {
    /// Original estimate.
    #[serde(default, with = "duration_secs::option")]
    pub estimated: Option<Duration>,
    /// Time logged so far.
    #[serde(default, with = "duration_secs::option")]
    pub spent: Option<Duration>,
    /// Time left, when the backend reports it.
    #[serde(default, with = "duration_secs::option")]
    pub remaining: Option<Duration>,
}

impl TimeTracking {
    /// Returns the remaining effort, deriving it from the estimate and spent
    /// time when the backend did not report it.
    #[must_use]
    pub fn effective_remaining(&self) -> Option<Duration> {
        self.remaining.or_else(|| {
            self.estimated
                .map(|estimate| estimate.saturating_sub(self.spent.unwrap_or_default()))
        })
    }

    /// Returns whether no value is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.estimated.is_none() && self.spent.is_none() && self.remaining.is_none()
    }
}
