//! Bidirectional YouTrack ↔ canonical translation.
//!
//! Status, priority and type use static tables seeded with the stock
//! YouTrack vocabulary. Unknown backend values never fail a read: statuses
//! are synthesized, priorities fall back to medium and types to task. Unknown
//! canonical values fall back to `Normal`, `Task`, or the literal status name.

use super::YouTrackSettings;
use super::models::{
    YtAgile, YtComment, YtCustomField, YtIssue, YtIssueDraft, YtLink, YtProject,
    YtProjectCustomField, YtTag,
};
use crate::provider::domain::{ProviderError, ProviderResult};
use crate::task::domain::{
    Board, BoardColumn, BoardKind, Comment, Priority, StatusCategory, Swimlane, Task, TaskId,
    TaskKind, TaskRelations, TaskStatus, TimeTracking,
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

pub(super) struct StatusEntry {
    pub(super) backend: &'static str,
    pub(super) id: &'static str,
    pub(super) category: StatusCategory,
    pub(super) terminal: bool,
}

const fn status_entry(
    backend: &'static str,
    id: &'static str,
    category: StatusCategory,
    terminal: bool,
) -> StatusEntry {
    StatusEntry {
        backend,
        id,
        category,
        terminal,
    }
}

pub(super) const STATUSES: [StatusEntry; 12] = [
    status_entry("Submitted", "submitted", StatusCategory::Todo, false),
    status_entry("Open", "open", StatusCategory::Todo, false),
    status_entry("In Progress", "in_progress", StatusCategory::InProgress, false),
    status_entry("To be discussed", "to_be_discussed", StatusCategory::Review, false),
    status_entry("Reopened", "reopened", StatusCategory::Todo, false),
    status_entry("Can't Reproduce", "cant_reproduce", StatusCategory::Cancelled, true),
    status_entry("Duplicate", "duplicate", StatusCategory::Cancelled, true),
    status_entry("Fixed", "fixed", StatusCategory::Done, true),
    status_entry("Won't fix", "wont_fix", StatusCategory::Cancelled, true),
    status_entry("Incomplete", "incomplete", StatusCategory::Cancelled, true),
    status_entry("Obsolete", "obsolete", StatusCategory::Cancelled, true),
    status_entry("Verified", "verified", StatusCategory::Done, true),
];

pub(super) const PRIORITIES: [(&str, Priority); 5] = [
    ("Minor", Priority::Low),
    ("Normal", Priority::Medium),
    ("Major", Priority::High),
    ("Critical", Priority::Highest),
    ("Show-stopper", Priority::Critical),
];

const DEFAULT_PRIORITY: &str = "Normal";

pub(super) const KINDS: [(&str, TaskKind); 10] = [
    ("Bug", TaskKind::Bug),
    ("Feature", TaskKind::Feature),
    ("Task", TaskKind::Task),
    ("Epic", TaskKind::Epic),
    ("User Story", TaskKind::Story),
    ("Subtask", TaskKind::Subtask),
    ("Improvement", TaskKind::Improvement),
    ("Spike", TaskKind::Spike),
    ("Research", TaskKind::Research),
    ("Chore", TaskKind::Chore),
];

/// Backend types read as a canonical type but never written back.
const KIND_ALIASES: [(&str, TaskKind); 4] = [
    ("Exception", TaskKind::Bug),
    ("Cosmetics", TaskKind::Improvement),
    ("Usability Problem", TaskKind::Improvement),
    ("Performance Problem", TaskKind::Improvement),
];

const DEFAULT_KIND: &str = "Task";

const STATE_FIELD_TYPE: &str = "StateIssueCustomField";
const ENUM_FIELD_TYPE: &str = "SingleEnumIssueCustomField";
const USER_FIELD_TYPE: &str = "SingleUserIssueCustomField";
const PERIOD_FIELD_TYPE: &str = "PeriodIssueCustomField";
const DATE_FIELD_TYPE: &str = "DateIssueCustomField";
const MULTI_ENUM_FIELD_TYPE: &str = "MultiEnumIssueCustomField";
const FALLBACK_FIELD_TYPE: &str = "SimpleIssueCustomField";

/// Converts between YouTrack wire models and canonical values.
#[derive(Debug, Clone, Default)]
pub struct YouTrackTranslator {
    settings: YouTrackSettings,
}

impl YouTrackTranslator {
    /// Creates a translator for the given field names.
    #[must_use]
    pub const fn new(settings: YouTrackSettings) -> Self {
        Self { settings }
    }

    /// Returns the field-name settings.
    #[must_use]
    pub const fn settings(&self) -> &YouTrackSettings {
        &self.settings
    }

    /// Maps a backend state to a canonical status, synthesizing one for
    /// values outside the table.
    #[must_use]
    pub fn status_from_backend(&self, name: &str, resolved: bool) -> TaskStatus {
        let trimmed = name.trim();
        STATUSES
            .iter()
            .find(|entry| entry.backend.eq_ignore_ascii_case(trimmed))
            .map_or_else(
                || TaskStatus::synthesize(trimmed, resolved),
                |entry| {
                    TaskStatus::new(entry.id, entry.backend, entry.category)
                        .with_terminal(entry.terminal)
                },
            )
    }

    /// Maps a canonical status to a backend state name.
    ///
    /// Table ids map exactly; generic category statuses map to the stock
    /// state for that category; anything else is sent by name.
    #[must_use]
    pub fn status_to_backend(&self, status: &TaskStatus) -> String {
        if let Some(entry) = STATUSES.iter().find(|entry| entry.id == status.id) {
            return entry.backend.to_owned();
        }
        if status.id == status.category.as_str() {
            let stock = match status.category {
                StatusCategory::Todo => Some("Open"),
                StatusCategory::InProgress => Some("In Progress"),
                StatusCategory::Review | StatusCategory::Testing => Some("To be discussed"),
                StatusCategory::Done => Some("Fixed"),
                StatusCategory::Cancelled => Some("Won't fix"),
                StatusCategory::Blocked => None,
            };
            if let Some(name) = stock {
                return name.to_owned();
            }
        }
        status.name.clone()
    }

    /// Maps a canonical status identifier to a backend state name, for
    /// queries that only carry identifiers.
    ///
    /// Synthesized identifiers are turned back into names by restoring the
    /// spaces; YouTrack matches state names case-insensitively.
    #[must_use]
    pub fn status_name_for_id(&self, id: &str) -> String {
        StatusCategory::try_from(id).map_or_else(
            |_| {
                STATUSES
                    .iter()
                    .find(|entry| entry.id == id)
                    .map_or_else(|| id.replace('_', " "), |entry| entry.backend.to_owned())
            },
            |category| self.status_to_backend(&TaskStatus::from_category(category)),
        )
    }

    /// Maps a backend priority; unknown values become medium.
    #[must_use]
    pub fn priority_from_backend(&self, name: &str) -> Priority {
        PRIORITIES
            .iter()
            .find(|(backend, _)| backend.eq_ignore_ascii_case(name.trim()))
            .map_or(Priority::Medium, |(_, priority)| *priority)
    }

    /// Maps a canonical priority; unmapped values become `Normal`.
    #[must_use]
    pub fn priority_to_backend(&self, priority: Priority) -> &'static str {
        PRIORITIES
            .iter()
            .find(|(_, candidate)| *candidate == priority)
            .map_or(DEFAULT_PRIORITY, |(backend, _)| *backend)
    }

    /// Maps a backend issue type; unknown values become task.
    #[must_use]
    pub fn kind_from_backend(&self, name: &str) -> TaskKind {
        KINDS
            .iter()
            .chain(KIND_ALIASES.iter())
            .find(|(backend, _)| backend.eq_ignore_ascii_case(name.trim()))
            .map_or(TaskKind::Task, |(_, kind)| *kind)
    }

    /// Maps a canonical task type; unmapped values become `Task`.
    #[must_use]
    pub fn kind_to_backend(&self, kind: TaskKind) -> &'static str {
        KINDS
            .iter()
            .find(|(_, candidate)| *candidate == kind)
            .map_or(DEFAULT_KIND, |(backend, _)| *backend)
    }

    /// Converts an issue to a canonical task owned by `provider`.
    ///
    /// # Errors
    ///
    /// Returns an `internal` error when the issue lacks an id.
    pub fn task_from_issue(&self, issue: &YtIssue, provider: &str) -> ProviderResult<Task> {
        let external_id = issue.id.clone().ok_or_else(|| {
            ProviderError::internal("YouTrack returned an issue without an id")
                .with_context("provider", provider)
        })?;
        let created_at = from_millis(issue.created).unwrap_or_default();
        let updated_at = from_millis(issue.updated).unwrap_or(created_at);
        let resolved_at = from_millis(issue.resolved);

        let mut status = resolved_at.map_or_else(TaskStatus::default, |_| {
            TaskStatus::from_category(StatusCategory::Done)
        });
        let mut priority = Priority::default();
        let mut kind = TaskKind::default();
        let mut assignee_id = None;
        let mut time_tracking = TimeTracking::default();
        let mut due_at = None;
        let mut custom_fields = BTreeMap::new();

        for field in &issue.custom_fields {
            let name = field.name.as_str();
            let settings = &self.settings;
            if name.eq_ignore_ascii_case(&settings.state_field) {
                if let Some(state) = value_name(&field.value) {
                    let resolved = field
                        .value
                        .get("isResolved")
                        .and_then(Value::as_bool)
                        .unwrap_or(resolved_at.is_some());
                    status = self.status_from_backend(state, resolved);
                }
            } else if name.eq_ignore_ascii_case(&settings.priority_field) {
                if let Some(value) = value_name(&field.value) {
                    priority = self.priority_from_backend(value);
                }
            } else if name.eq_ignore_ascii_case(&settings.type_field) {
                if let Some(value) = value_name(&field.value) {
                    kind = self.kind_from_backend(value);
                }
            } else if name.eq_ignore_ascii_case(&settings.assignee_field) {
                assignee_id = field
                    .value
                    .get("login")
                    .and_then(Value::as_str)
                    .map(ToOwned::to_owned);
            } else if name.eq_ignore_ascii_case(&settings.estimation_field) {
                time_tracking.estimated = period(&field.value);
            } else if name.eq_ignore_ascii_case(&settings.spent_time_field) {
                time_tracking.spent = period(&field.value);
            } else if name.eq_ignore_ascii_case(&settings.due_date_field) {
                due_at = from_millis(field.value.as_i64());
            } else if !field.value.is_null() {
                custom_fields.insert(field.name.clone(), field.value.clone());
            }
        }

        let (parent_id, child_ids, relations) = links(&issue.links);
        let reporter = issue
            .reporter
            .as_ref()
            .and_then(|user| user.login.clone().or_else(|| user.id.clone()));

        Ok(Task {
            id: TaskId::new(),
            external_id: Some(external_id),
            key: issue.id_readable.clone(),
            title: issue.summary.clone().unwrap_or_default(),
            description: issue.description.clone().filter(|text| !text.is_empty()),
            status,
            priority,
            kind,
            project_id: issue
                .project
                .as_ref()
                .and_then(|project| project.short_name.clone().or_else(|| project.id.clone()))
                .unwrap_or_default(),
            board_id: None,
            sprint_id: None,
            assignee_id,
            reporter_id: reporter.clone(),
            creator_id: reporter,
            parent_id,
            child_ids,
            epic_id: None,
            relations,
            labels: issue
                .tags
                .iter()
                .map(|tag| tag.name.clone())
                .collect::<BTreeSet<_>>(),
            custom_fields,
            attachments: Vec::new(),
            comments: issue.comments.iter().filter_map(comment_from_backend).collect(),
            time_tracking,
            created_at,
            updated_at,
            due_at,
            started_at: None,
            resolved_at,
            provider: Some(provider.to_owned()),
        })
    }

    /// Builds the request body for a create (`for_update == false`) or an
    /// update.
    ///
    /// The project is only sent on create and tags only on update, because
    /// YouTrack needs existing tag ids to attach tags.
    #[must_use]
    pub fn draft_from_task(&self, task: &Task, for_update: bool) -> YtIssueDraft {
        let settings = &self.settings;
        let mut custom_fields = vec![
            YtCustomField {
                kind: Some(STATE_FIELD_TYPE.to_owned()),
                name: settings.state_field.clone(),
                value: json!({ "name": self.status_to_backend(&task.status) }),
            },
            YtCustomField {
                kind: Some(ENUM_FIELD_TYPE.to_owned()),
                name: settings.priority_field.clone(),
                value: json!({ "name": self.priority_to_backend(task.priority) }),
            },
            YtCustomField {
                kind: Some(ENUM_FIELD_TYPE.to_owned()),
                name: settings.type_field.clone(),
                value: json!({ "name": self.kind_to_backend(task.kind) }),
            },
        ];
        if for_update || task.assignee_id.is_some() {
            custom_fields.push(YtCustomField {
                kind: Some(USER_FIELD_TYPE.to_owned()),
                name: settings.assignee_field.clone(),
                value: task
                    .assignee_id
                    .as_ref()
                    .map_or(Value::Null, |login| json!({ "login": login })),
            });
        }
        if let Some(estimate) = task.time_tracking.estimated {
            custom_fields.push(period_field(&settings.estimation_field, estimate));
        }
        if let Some(spent) = task.time_tracking.spent {
            custom_fields.push(period_field(&settings.spent_time_field, spent));
        }
        if for_update || task.due_at.is_some() {
            custom_fields.push(YtCustomField {
                kind: Some(DATE_FIELD_TYPE.to_owned()),
                name: settings.due_date_field.clone(),
                value: task
                    .due_at
                    .map_or(Value::Null, |due| json!(due.timestamp_millis())),
            });
        }
        custom_fields.extend(
            task.custom_fields
                .iter()
                .filter(|(name, _)| !settings.is_mapped_field(name))
                .map(|(name, value)| bag_entry_to_field(name, value)),
        );

        YtIssueDraft {
            summary: Some(task.title.clone()),
            description: task.description.clone(),
            project: (!for_update).then(|| project_reference(&task.project_id)),
            custom_fields,
            tags: for_update.then(|| {
                task.labels
                    .iter()
                    .map(|label| YtTag {
                        id: None,
                        name: label.clone(),
                    })
                    .collect()
            }),
        }
    }

    /// Builds the body that moves an issue to `status`.
    #[must_use]
    pub fn status_draft(&self, status: &TaskStatus) -> YtIssueDraft {
        YtIssueDraft {
            custom_fields: vec![YtCustomField {
                kind: Some(STATE_FIELD_TYPE.to_owned()),
                name: self.settings.state_field.clone(),
                value: json!({ "name": self.status_to_backend(status) }),
            }],
            ..YtIssueDraft::default()
        }
    }

    /// Extracts the workflow from a project's custom fields.
    ///
    /// Returns `None` when the project has no state field.
    #[must_use]
    pub fn statuses_from_project_fields(
        &self,
        fields: &[YtProjectCustomField],
    ) -> Option<Vec<TaskStatus>> {
        let state = fields.iter().find(|field| {
            field
                .field
                .as_ref()
                .is_some_and(|named| named.name.eq_ignore_ascii_case(&self.settings.state_field))
        })?;
        let mut values = state
            .bundle
            .as_ref()
            .map(|bundle| bundle.values.clone())
            .unwrap_or_default();
        values.sort_by_key(|value| value.ordinal.unwrap_or(u32::MAX));
        Some(
            values
                .iter()
                .zip(0_u32..)
                .map(|(value, ordinal)| {
                    self.status_from_backend(&value.name, value.is_resolved)
                        .with_ordinal(ordinal)
                })
                .collect(),
        )
    }

    /// Converts an agile board.
    #[must_use]
    pub fn board_from_agile(&self, agile: &YtAgile) -> Board {
        let sprints_disabled = agile
            .sprints_settings
            .as_ref()
            .and_then(|settings| settings.disable_sprints)
            .unwrap_or(false);
        let kind = if sprints_disabled {
            BoardKind::Kanban
        } else {
            BoardKind::Scrum
        };
        let columns = agile
            .column_settings
            .as_ref()
            .map(|settings| settings.columns.as_slice())
            .unwrap_or_default()
            .iter()
            .zip(0_u32..)
            .map(|(column, position)| {
                let state = column.field_values.first().map(|value| value.name.as_str());
                BoardColumn {
                    id: column.id.clone().unwrap_or_default(),
                    name: column
                        .presentation
                        .clone()
                        .or_else(|| state.map(ToOwned::to_owned))
                        .unwrap_or_default(),
                    status_id: state
                        .map(|name| self.status_from_backend(name, false).id)
                        .unwrap_or_default(),
                    ordinal: column.ordinal.unwrap_or(position),
                    wip_limit: column.wip_limit.as_ref().and_then(|limit| limit.max),
                }
            });
        let swimlanes = agile
            .swimlane_settings
            .as_ref()
            .filter(|settings| settings.enabled.unwrap_or(false))
            .and_then(|settings| settings.field.as_ref())
            .map(|field| Swimlane {
                id: field.name.clone(),
                name: field.name.clone(),
                query: None,
            })
            .into_iter()
            .collect();
        let owner = agile.owner.as_ref().and_then(|user| user.login.clone());

        let mut board = Board::new(agile.id.clone(), agile.name.clone(), kind).with_columns(columns);
        board.project_ids = agile
            .projects
            .iter()
            .filter_map(|project| project.short_name.clone().or_else(|| project.id.clone()))
            .collect();
        board.swimlanes = swimlanes;
        board.admin_ids = owner.into_iter().collect();
        board
    }
}

/// Converts a comment; comments without an id are skipped.
#[must_use]
pub(crate) fn comment_from_backend(comment: &YtComment) -> Option<Comment> {
    let id = comment.id.clone()?;
    let created_at = from_millis(comment.created).unwrap_or_default();
    let mut converted = Comment::new(id, comment.text.clone().unwrap_or_default(), created_at);
    if let Some(login) = comment.author.as_ref().and_then(|author| author.login.clone()) {
        converted = converted.with_author(login);
    }
    if let Some(updated) = from_millis(comment.updated) {
        converted = converted.with_updated_at(updated);
    }
    Some(converted)
}

fn from_millis(millis: Option<i64>) -> Option<DateTime<Utc>> {
    millis.and_then(DateTime::from_timestamp_millis)
}

fn value_name(value: &Value) -> Option<&str> {
    value.get("name").and_then(Value::as_str)
}

fn period(value: &Value) -> Option<Duration> {
    value
        .get("minutes")
        .and_then(Value::as_u64)
        .map(|minutes| Duration::from_secs(minutes.saturating_mul(60)))
}

fn period_field(name: &str, duration: Duration) -> YtCustomField {
    YtCustomField {
        kind: Some(PERIOD_FIELD_TYPE.to_owned()),
        name: name.to_owned(),
        value: json!({
            "$type": "PeriodValue",
            "minutes": duration.as_secs().div_euclid(60),
        }),
    }
}

fn bag_entry_to_field(name: &str, value: &Value) -> YtCustomField {
    YtCustomField {
        kind: Some(field_type_for(value).to_owned()),
        name: name.to_owned(),
        value: value.clone(),
    }
}

/// Picks the wire type from the value's shape; the value itself is sent
/// untouched.
fn field_type_for(value: &Value) -> &'static str {
    let has = |key: &str| value.get(key).is_some();
    if has("login") {
        USER_FIELD_TYPE
    } else if has("minutes") {
        PERIOD_FIELD_TYPE
    } else if has("name") {
        ENUM_FIELD_TYPE
    } else if value.as_array().is_some_and(|items| {
        !items.is_empty() && items.iter().all(|item| item.get("name").is_some())
    }) {
        MULTI_ENUM_FIELD_TYPE
    } else {
        FALLBACK_FIELD_TYPE
    }
}

/// YouTrack database ids look like `0-1`; anything else is a short name.
fn project_reference(project_id: &str) -> YtProject {
    let is_database_id = project_id
        .split_once('-')
        .is_some_and(|(left, right)| {
            !left.is_empty()
                && !right.is_empty()
                && left.chars().all(|c| c.is_ascii_digit())
                && right.chars().all(|c| c.is_ascii_digit())
        });
    if is_database_id {
        YtProject {
            id: Some(project_id.to_owned()),
            ..YtProject::default()
        }
    } else {
        YtProject {
            short_name: Some(project_id.to_owned()),
            ..YtProject::default()
        }
    }
}

fn link_targets(link: &YtLink) -> impl Iterator<Item = String> + '_ {
    link.issues
        .iter()
        .filter_map(|issue| issue.id_readable.clone().or_else(|| issue.id.clone()))
}

fn links(links: &[YtLink]) -> (Option<String>, Vec<String>, TaskRelations) {
    let mut parent = None;
    let mut children = Vec::new();
    let mut relations = TaskRelations::default();
    for link in links {
        let kind = link
            .link_type
            .as_ref()
            .map(|link_type| link_type.name.to_ascii_lowercase())
            .unwrap_or_default();
        let outward = link
            .direction
            .as_deref()
            .is_some_and(|direction| direction.eq_ignore_ascii_case("outward"));
        let inward = link
            .direction
            .as_deref()
            .is_some_and(|direction| direction.eq_ignore_ascii_case("inward"));
        match kind.as_str() {
            "subtask" if outward => children.extend(link_targets(link)),
            "subtask" if inward => parent = parent.or_else(|| link_targets(link).next()),
            "depend" if outward => relations.blocked_by.extend(link_targets(link)),
            "depend" if inward => relations.blocks.extend(link_targets(link)),
            "duplicate" if outward => relations.duplicate_of.extend(link_targets(link)),
            _ => relations.related.extend(link_targets(link)),
        }
    }
    (parent, children, relations)
}
