//! Filters over task collections.
//!
//! Every function here is pure and takes its reference time explicitly.
//! None of them hide soft-deleted tasks: views that should only show live
//! tasks call [`visible`] first.

use chrono::{DateTime, Utc};

use crate::task::{Status, Task};

/// Numbered list views offered by `taskr list --view`
pub const LIST_VIEWS: [(u8, &str, Option<Status>); 4] = [
    (1, "all", None),
    (2, "pending", Some(Status::Pending)),
    (3, "in-progress", Some(Status::InProgress)),
    (4, "completed", Some(Status::Completed)),
];

/// Tasks that have not been soft-deleted.
pub fn visible(tasks: &[Task]) -> Vec<Task> {
    tasks.iter().filter(|task| !task.is_deleted()).cloned().collect()
}

pub fn filter_by_status(tasks: &[Task], status: Status) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.status() == status)
        .cloned()
        .collect()
}

/// Case-insensitive substring match on the title. An empty term matches all.
pub fn filter_by_title_substring(tasks: &[Task], term: &str) -> Vec<Task> {
    let needle = term.to_lowercase();
    tasks
        .iter()
        .filter(|task| task.title().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Active tasks due on or before `reference + window_days`, overdue included.
pub fn filter_priority(tasks: &[Task], reference: DateTime<Utc>, window_days: u32) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.is_priority_within(reference, window_days))
        .cloned()
        .collect()
}

/// Tasks past their due date that are not completed.
///
/// Cancelled tasks are still reported.
pub fn filter_overdue(tasks: &[Task], reference: DateTime<Utc>) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.is_overdue(reference) && task.status() != Status::Completed)
        .cloned()
        .collect()
}

/// Tasks sharing `base`'s category, excluding `base` itself.
pub fn filter_related_by_category(base: &Task, tasks: &[Task]) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.id() != base.id() && task.category() == base.category())
        .cloned()
        .collect()
}

/// Apply one of the numbered [`LIST_VIEWS`]. Unknown codes yield nothing.
pub fn filter_by_menu_option(tasks: &[Task], code: i64) -> Vec<Task> {
    match LIST_VIEWS.iter().find(|(view, _, _)| i64::from(*view) == code) {
        Some((_, _, None)) => tasks.to_vec(),
        Some((_, _, Some(status))) => filter_by_status(tasks, *status),
        None => Vec::new(),
    }
}

/// Alphabetical by title, ignoring case; ties broken by id.
pub fn sort_by_title(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| {
        left.title()
            .to_lowercase()
            .cmp(&right.title().to_lowercase())
            .then_with(|| left.id().cmp(right.id()))
    });
}
