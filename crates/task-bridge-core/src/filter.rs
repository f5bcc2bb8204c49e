//! Client-side filter engine.
//!
//! Stages run in a fixed order and each narrows the previous stage's output.
//! Pagination (`offset`, then `limit`) runs last, so callers page over the
//! filtered result rather than over the raw input.

use crate::model::{Task, TaskFilters};
use crate::text_matcher::TextMatcher;

/// Apply `filters` to `tasks`, preserving input order.
///
/// The input is never mutated; matching tasks are cloned into the result.
#[must_use]
pub fn apply_filters(tasks: &[Task], filters: &TaskFilters) -> Vec<Task> {
    let matcher = filters.search.as_deref().and_then(TextMatcher::new);

    let matching = tasks
        .iter()
        .filter(|task| {
            filters
                .status
                .as_ref()
                .is_none_or(|accepted| accepted.contains(&task.status))
        })
        .filter(|task| {
            filters.priority.as_ref().is_none_or(|accepted| {
                task.priority
                    .is_some_and(|priority| accepted.contains(&priority))
            })
        })
        .filter(|task| {
            filters
                .due_after
                .is_none_or(|after| task.due.is_some_and(|due| due >= after))
        })
        .filter(|task| {
            filters
                .due_before
                .is_none_or(|before| task.due.is_some_and(|due| due <= before))
        })
        .filter(|task| {
            filters.tags.is_empty() || task.tags.iter().any(|tag| filters.tags.contains(tag))
        })
        .filter(|task| matcher.as_ref().is_none_or(|matcher| matcher.matches(task)));

    let paged = matching.skip(filters.offset.unwrap_or(0));
    match filters.effective_limit() {
        Some(limit) => paged.take(limit).cloned().collect(),
        None => paged.cloned().collect(),
    }
}
