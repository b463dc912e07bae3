//! Canonical filter to YouTrack search query.

use super::YouTrackTranslator;
use crate::task::domain::{DateRange, TaskFilter};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Renders `filter` in YouTrack query syntax.
///
/// Clauses are space-separated, so they all apply. Values inside one clause
/// are comma-separated alternatives and always brace-quoted. Free text comes
/// last. Paging is not part of the query.
///
/// ```
/// use trackbridge::task::domain::TaskFilter;
/// use trackbridge::youtrack::{YouTrackTranslator, build_query};
///
/// let filter = TaskFilter::new()
///     .with_projects(["DEMO".to_owned()])
///     .with_statuses(["open".to_owned(), "in_progress".to_owned()]);
/// assert_eq!(
///     build_query(&YouTrackTranslator::default(), &filter),
///     "project: {DEMO} State: {Open}, {In Progress}"
/// );
/// ```
#[must_use]
pub fn build_query(translator: &YouTrackTranslator, filter: &TaskFilter) -> String {
    let settings = translator.settings();
    let mut clauses = Vec::new();

    push_clause(&mut clauses, "project", filter.project_ids.iter().cloned());
    push_clause(
        &mut clauses,
        &settings.state_field,
        filter
            .status_ids
            .iter()
            .map(|id| translator.status_name_for_id(id)),
    );
    push_clause(
        &mut clauses,
        &settings.assignee_field,
        filter.assignee_ids.iter().cloned(),
    );
    push_clause(
        &mut clauses,
        &settings.type_field,
        filter
            .kinds
            .iter()
            .map(|kind| translator.kind_to_backend(*kind).to_owned()),
    );
    push_clause(
        &mut clauses,
        &settings.priority_field,
        filter
            .priorities
            .iter()
            .map(|priority| translator.priority_to_backend(*priority).to_owned()),
    );
    push_clause(&mut clauses, "tag", filter.labels.iter().cloned());
    push_range(&mut clauses, "created", filter.created.as_ref());
    push_range(&mut clauses, "updated", filter.updated.as_ref());
    push_range(&mut clauses, &settings.due_date_field, filter.due.as_ref());

    if let Some(text) = filter
        .text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
    {
        clauses.push(text.to_owned());
    }
    clauses.join(" ")
}

fn push_clause(clauses: &mut Vec<String>, field: &str, values: impl Iterator<Item = String>) {
    let rendered: Vec<String> = values.map(|value| braced(&value)).collect();
    if !rendered.is_empty() {
        clauses.push(format!("{}: {}", braced_field(field), rendered.join(", ")));
    }
}

fn push_range(clauses: &mut Vec<String>, field: &str, window: Option<&DateRange>) {
    let Some(range) = window.filter(|bounds| !bounds.is_unbounded()) else {
        return;
    };
    let bound = |instant: Option<chrono::DateTime<chrono::Utc>>| {
        instant.map_or_else(|| "*".to_owned(), |at| at.format(DATE_FORMAT).to_string())
    };
    clauses.push(format!(
        "{}: {} .. {}",
        braced_field(field),
        bound(range.from),
        bound(range.to)
    ));
}

fn braced(value: &str) -> String {
    format!("{{{}}}", value.replace(['{', '}'], ""))
}

/// Field names with spaces must be braced too, e.g. `{Due Date}`.
fn braced_field(field: &str) -> String {
    if field.contains(' ') {
        braced(field)
    } else {
        field.to_owned()
    }
}
