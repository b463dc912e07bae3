//! Comments and attachments carried on a task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment left on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Backend identifier.
    pub id: String,
    /// Author identifier.
    pub author_id: Option<String>,
    /// Comment body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest edit timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Whether the comment was edited after creation.
    pub edited: bool,
}

impl Comment {
    /// Creates an unedited comment.
    #[must_use]
    pub fn new(id: impl Into<String>, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            author_id: None,
            content: content.into(),
            created_at,
            updated_at: None,
            edited: false,
        }
    }

    /// Sets the author identifier.
    #[must_use]
    pub fn with_author(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    /// Records an edit timestamp; a later timestamp marks the comment edited.
    #[must_use]
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.edited = updated_at > self.created_at;
        self.updated_at = Some(updated_at);
        self
    }
}

/// A file attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Backend identifier.
    pub id: String,
    /// File name.
    pub name: String,
    /// Download location.
    pub url: Option<String>,
    /// MIME type, when known.
    pub mime_type: Option<String>,
    /// Size in bytes, when known.
    pub size: Option<u64>,
    /// Uploader identifier.
    pub author_id: Option<String>,
    /// Upload timestamp.
    pub created_at: DateTime<Utc>,
}
