//! Typed `settings` for the YouTrack backend.

use crate::provider::domain::{ProviderError, ProviderResult};
use serde::{Deserialize, Serialize};

/// Backend-specific options, read from an adapter's `settings` table.
///
/// Field names default to the stock YouTrack project template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct YouTrackSettings {
    /// Issues requested per list call when the filter sets no limit.
    pub page_size: usize,
    /// Name of the state custom field.
    pub state_field: String,
    /// Name of the priority custom field.
    pub priority_field: String,
    /// Name of the issue type custom field.
    pub type_field: String,
    /// Name of the assignee custom field.
    pub assignee_field: String,
    /// Name of the estimation period field.
    pub estimation_field: String,
    /// Name of the spent time period field.
    pub spent_time_field: String,
    /// Name of the due date field.
    pub due_date_field: String,
}

impl Default for YouTrackSettings {
    fn default() -> Self {
        Self {
            page_size: 50,
            state_field: "State".to_owned(),
            priority_field: "Priority".to_owned(),
            type_field: "Type".to_owned(),
            assignee_field: "Assignee".to_owned(),
            estimation_field: "Estimation".to_owned(),
            spent_time_field: "Spent time".to_owned(),
            due_date_field: "Due Date".to_owned(),
        }
    }
}

impl YouTrackSettings {
    /// Checks value ranges serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns a `configuration` error for a zero page size or a blank field
    /// name.
    pub fn validate(&self) -> ProviderResult<()> {
        if self.page_size == 0 {
            return Err(ProviderError::configuration("page_size must be positive")
                .with_context("field", "settings.page_size"));
        }
        let fields = [
            ("state_field", &self.state_field),
            ("priority_field", &self.priority_field),
            ("type_field", &self.type_field),
            ("assignee_field", &self.assignee_field),
            ("estimation_field", &self.estimation_field),
            ("spent_time_field", &self.spent_time_field),
            ("due_date_field", &self.due_date_field),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((key, _)) => Err(ProviderError::configuration(format!(
                "{key} must not be blank"
            ))
            .with_context("field", format!("settings.{key}"))),
            None => Ok(()),
        }
    }

    /// Returns whether `name` is one of the fields mapped to a canonical
    /// slot.
    #[must_use]
    pub fn is_mapped_field(&self, name: &str) -> bool {
        [
            &self.state_field,
            &self.priority_field,
            &self.type_field,
            &self.assignee_field,
            &self.estimation_field,
            &self.spent_time_field,
            &self.due_date_field,
        ]
        .iter()
        .any(|field| field.eq_ignore_ascii_case(name))
    }
}
