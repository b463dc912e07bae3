//! Canonical board layout.
//!
//! Boards are returned as pass-through data: columns are bound to canonical
//! status identifiers, but automation rules are carried verbatim and never
//! evaluated.

use super::ParseVocabularyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board layout style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardKind {
    /// Continuous flow board.
    #[default]
    Kanban,
    /// Sprint-based board.
    Scrum,
    /// Flat list.
    List,
    /// Spreadsheet-like table.
    Table,
    /// Backend-specific layout.
    Custom,
}

impl BoardKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kanban => "kanban",
            Self::Scrum => "scrum",
            Self::List => "list",
            Self::Table => "table",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for BoardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BoardKind {
    type Error = ParseVocabularyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "kanban" => Ok(Self::Kanban),
            "scrum" => Ok(Self::Scrum),
            "list" => Ok(Self::List),
            "table" => Ok(Self::Table),
            "custom" => Ok(Self::Custom),
            _ => Err(ParseVocabularyError::new("board type", value)),
        }
    }
}

/// A board column bound to one canonical status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardColumn {
    /// Backend identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Canonical status identifier shown in this column.
    pub status_id: String,
    /// Left-to-right position.
    pub ordinal: u32,
    /// Work-in-progress limit.
    pub wip_limit: Option<u32>,
}

/// A horizontal grouping across columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swimlane {
    /// Backend identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Backend query selecting the lane's tasks.
    pub query: Option<String>,
}

/// Automation rule carried verbatim from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationRule {
    /// Triggering event.
    pub trigger: String,
    /// Conditions, in backend syntax.
    #[serde(default)]
    pub conditions: Vec<String>,
    /// Actions, in backend syntax.
    #[serde(default)]
    pub actions: Vec<String>,
}

/// Backend-independent board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Backend identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Layout style.
    pub kind: BoardKind,
    /// Projects whose tasks appear on the board.
    #[serde(default)]
    pub project_ids: Vec<String>,
    /// Columns, in display order.
    #[serde(default)]
    pub columns: Vec<BoardColumn>,
    /// Optional swimlanes.
    #[serde(default)]
    pub swimlanes: Vec<Swimlane>,
    /// Member identifiers.
    #[serde(default)]
    pub member_ids: Vec<String>,
    /// Administrator identifiers.
    #[serde(default)]
    pub admin_ids: Vec<String>,
    /// Automation rules.
    #[serde(default)]
    pub automation_rules: Vec<AutomationRule>,
}

impl Board {
    /// Creates a board with no columns.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: BoardKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            project_ids: Vec::new(),
            columns: Vec::new(),
            swimlanes: Vec::new(),
            member_ids: Vec::new(),
            admin_ids: Vec::new(),
            automation_rules: Vec::new(),
        }
    }

    /// Replaces the columns, ordering them by ordinal.
    #[must_use]
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = BoardColumn>) -> Self {
        let mut ordered: Vec<BoardColumn> = columns.into_iter().collect();
        ordered.sort_by_key(|column| column.ordinal);
        self.columns = ordered;
        self
    }

    /// Returns the column showing `status_id`.
    #[must_use]
    pub fn column_for_status(&self, status_id: &str) -> Option<&BoardColumn> {
        self.columns
            .iter()
            .find(|column| column.status_id == status_id)
    }
}
