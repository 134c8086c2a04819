//! Due-item selection.
//!
//! A snippet is due when it has never been reviewed or its next review is
//! strictly in the past. Never-reviewed snippets sort ahead of everything.

use chrono::{DateTime, Utc};

use crate::types::{MemoryState, ReviewItem};

/// Whether a memory state is due at `now`.
pub fn is_due(state: &MemoryState, now: DateTime<Utc>) -> bool {
    match state.next_review_at {
        None => true,
        Some(next) => next < now,
    }
}

/// Select due items, most overdue first, truncated to `limit`.
///
/// Ordering is ascending by `next_review_at` with never-reviewed items first.
/// Items with equal keys keep their input order.
pub fn select_due_items<I>(items: I, now: DateTime<Utc>, limit: usize) -> Vec<ReviewItem>
where
    I: IntoIterator<Item = ReviewItem>,
{
    let mut due: Vec<ReviewItem> = items.into_iter().filter(|item| is_due(&item.state, now)).collect();

    // `None < Some(_)`, so unseen items lead
    due.sort_by_key(|item| item.state.next_review_at);
    due.truncate(limit);
    due
}

/// Count due items without ordering or truncation.
pub fn count_due_items<'a, I>(items: I, now: DateTime<Utc>) -> usize
where
    I: IntoIterator<Item = &'a ReviewItem>,
{
    items.into_iter().filter(|item| is_due(&item.state, now)).count()
}
