//! YouTrack REST wire models.
//!
//! Only the attributes requested through [`ISSUE_FIELDS`], [`AGILE_FIELDS`]
//! and [`STATE_BUNDLE_FIELDS`] are modelled. Custom field values stay raw
//! JSON because their shape depends on the field type.

use serde::{Deserialize, Serialize};

/// `fields` selector for issue reads.
pub const ISSUE_FIELDS: &str = "id,idReadable,summary,description,created,updated,resolved,\
project(id,shortName,name),reporter(id,login),tags(id,name),\
customFields($type,id,name,value($type,id,name,login,minutes,presentation,isResolved)),\
links(direction,linkType(name),issues(id,idReadable)),\
comments(id,text,created,updated,author(login))";

/// `fields` selector for agile board reads.
pub const AGILE_FIELDS: &str = "id,name,owner(login),projects(id,shortName),\
sprintsSettings(disableSprints),\
columnSettings(columns(id,presentation,ordinal,fieldValues(name),wipLimit(max))),\
swimlaneSettings($type,enabled,field(name))";

/// `fields` selector for project custom-field bundles.
pub const STATE_BUNDLE_FIELDS: &str =
    "field(name),bundle(values(name,isResolved,ordinal))";

/// `fields` selector for comments.
pub const COMMENT_FIELDS: &str = "id,text,created,updated,author(login)";

/// Issue as returned by `/api/issues`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtIssue {
    /// Database id, e.g. `2-17`.
    pub id: Option<String>,
    /// Readable id, e.g. `PROJ-17`.
    pub id_readable: Option<String>,
    /// Summary line.
    pub summary: Option<String>,
    /// Description body.
    pub description: Option<String>,
    /// Creation time, epoch milliseconds.
    pub created: Option<i64>,
    /// Update time, epoch milliseconds.
    pub updated: Option<i64>,
    /// Resolution time, epoch milliseconds.
    pub resolved: Option<i64>,
    /// Owning project.
    pub project: Option<YtProject>,
    /// Reporting user.
    pub reporter: Option<YtUser>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<YtTag>,
    /// Custom fields, including state, priority and type.
    #[serde(default)]
    pub custom_fields: Vec<YtCustomField>,
    /// Issue links.
    #[serde(default)]
    pub links: Vec<YtLink>,
    /// Comments.
    #[serde(default)]
    pub comments: Vec<YtComment>,
}

/// Project reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtProject {
    /// Database id, e.g. `0-1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Short name used in readable ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// User reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtUser {
    /// Database id.
    pub id: Option<String>,
    /// Login name.
    pub login: Option<String>,
}

/// Tag reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtTag {
    /// Database id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Tag name.
    pub name: String,
}

/// Custom field with its raw value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YtCustomField {
    /// YouTrack type discriminator, e.g. `StateIssueCustomField`.
    #[serde(rename = "$type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Field name.
    pub name: String,
    /// Raw value; `null` when unset.
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Issue link group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtLink {
    /// `OUTWARD`, `INWARD` or `BOTH`.
    pub direction: Option<String>,
    /// Link type.
    pub link_type: Option<YtLinkType>,
    /// Linked issues.
    #[serde(default)]
    pub issues: Vec<YtIssueRef>,
}

/// Link type reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtLinkType {
    /// Type name, e.g. `Subtask` or `Depend`.
    pub name: String,
}

/// Minimal issue reference inside a link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtIssueRef {
    /// Database id.
    pub id: Option<String>,
    /// Readable id.
    pub id_readable: Option<String>,
}

/// Issue comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtComment {
    /// Database id.
    pub id: Option<String>,
    /// Markdown body.
    pub text: Option<String>,
    /// Creation time, epoch milliseconds.
    pub created: Option<i64>,
    /// Edit time, epoch milliseconds.
    pub updated: Option<i64>,
    /// Author.
    pub author: Option<YtUser>,
}

/// Body for issue create and update calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YtIssueDraft {
    /// Summary line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Description body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Target project; only sent on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<YtProject>,
    /// Custom field values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<YtCustomField>,
    /// Tags; only sent on update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<YtTag>>,
}

/// Agile board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtAgile {
    /// Database id.
    pub id: String,
    /// Board name.
    pub name: String,
    /// Board owner.
    pub owner: Option<YtUser>,
    /// Projects shown on the board.
    #[serde(default)]
    pub projects: Vec<YtProject>,
    /// Sprint settings.
    pub sprints_settings: Option<YtSprintsSettings>,
    /// Column settings.
    pub column_settings: Option<YtColumnSettings>,
    /// Swimlane settings.
    pub swimlane_settings: Option<YtSwimlaneSettings>,
}

/// Sprint settings of a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtSprintsSettings {
    /// Whether the board runs without sprints.
    pub disable_sprints: Option<bool>,
}

/// Column layout of a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtColumnSettings {
    /// Columns.
    #[serde(default)]
    pub columns: Vec<YtColumn>,
}

/// One board column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtColumn {
    /// Database id.
    pub id: Option<String>,
    /// Column caption.
    pub presentation: Option<String>,
    /// Position.
    pub ordinal: Option<u32>,
    /// State values shown in the column.
    #[serde(default)]
    pub field_values: Vec<YtNamed>,
    /// Work-in-progress limit.
    pub wip_limit: Option<YtWipLimit>,
}

/// Named bundle element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtNamed {
    /// Element name.
    pub name: String,
}

/// Work-in-progress limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtWipLimit {
    /// Maximum issues in the column.
    pub max: Option<u32>,
}

/// Swimlane settings of a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtSwimlaneSettings {
    /// Whether swimlanes are shown.
    pub enabled: Option<bool>,
    /// Field the lanes group by.
    pub field: Option<YtNamed>,
}

/// Project custom field with its value bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtProjectCustomField {
    /// Field prototype.
    pub field: Option<YtNamed>,
    /// Value bundle.
    pub bundle: Option<YtBundle>,
}

/// Value bundle of an enumerated field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtBundle {
    /// Bundle values.
    #[serde(default)]
    pub values: Vec<YtBundleValue>,
}

/// One bundle value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtBundleValue {
    /// Value name.
    pub name: String,
    /// Whether the value resolves issues.
    #[serde(default)]
    pub is_resolved: bool,
    /// Position.
    pub ordinal: Option<u32>,
}
