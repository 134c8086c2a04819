//! Integration tests for the review cycle.
//!
//! Runs the review service against an in-memory SQLite store.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use snipdeck_core::types::latest_review_at;
use snipdeck_core::{
    ErrorCode, MemoryState, ReviewService, SnipError, SnipdeckConfig, Snippet, SnippetStore,
    SqliteSnippetStore,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

fn setup() -> (Arc<SqliteSnippetStore>, ReviewService) {
    setup_with(SnipdeckConfig::default())
}

fn setup_with(config: SnipdeckConfig) -> (Arc<SqliteSnippetStore>, ReviewService) {
    let store = Arc::new(SqliteSnippetStore::in_memory().unwrap());
    let service = ReviewService::new(store.clone(), &config);
    (store, service)
}

fn snippet(id: &str, title: &str) -> Snippet {
    Snippet::new("alice", title, "console.log(1)")
        .with_id(id)
        .with_timestamps(t0(), t0())
}

fn scheduled(interval_days: u32, repetitions: u32, easiness_factor: f64, next: Option<DateTime<Utc>>) -> MemoryState {
    MemoryState {
        interval_days,
        repetitions,
        easiness_factor,
        next_review_at: next,
        last_reviewed_at: None,
    }
}

/// Perfect recall followed by a blackout, persisted between steps.
#[tokio::test]
async fn test_grow_then_lapse() {
    let (store, service) = setup();
    store
        .insert(&snippet("s1", "Debounce").with_review(scheduled(6, 2, 2.5, None)))
        .await
        .unwrap();

    let outcome = service.submit_review("alice", "s1", 5, t0()).await.unwrap();
    assert_eq!(outcome.next.interval_days, 15);
    assert_eq!(outcome.next.repetitions, 3);
    assert!((outcome.next.easiness_factor - 2.6).abs() < 1e-9);
    assert_eq!(outcome.next.next_review_at, Some(t0() + Duration::days(15)));
    assert!(!outcome.lapsed());

    let later = t0() + Duration::days(15);
    let outcome = service.submit_review("alice", "s1", 0, later).await.unwrap();
    assert_eq!(outcome.next.interval_days, 1);
    assert_eq!(outcome.next.repetitions, 0);
    // EF drops by 0.8 even though the streak resets
    assert!((outcome.next.easiness_factor - 1.8).abs() < 1e-9);
    assert!(outcome.lapsed());

    let stored = store.get("alice", "s1").await.unwrap().unwrap().review.unwrap();
    assert_eq!(stored, outcome.next);
    assert_eq!(stored.last_reviewed_at, Some(later));
}

#[tokio::test]
async fn test_new_snippet_walks_learning_steps() {
    let (store, service) = setup();
    store.insert(&snippet("s1", "Binary search")).await.unwrap();

    let initial = service.enable_review("alice", "s1").await.unwrap();
    assert!(initial.is_unseen());

    let mut now = t0();
    let mut intervals = Vec::new();
    for _ in 0..3 {
        let outcome = service.submit_review("alice", "s1", 4, now).await.unwrap();
        intervals.push(outcome.next.interval_days);
        now = outcome.next.next_review_at.unwrap();
    }

    // Grade 4 keeps EF at 2.5: 1, 6, round(6 * 2.5)
    assert_eq!(intervals, vec![1, 6, 15]);
}

#[tokio::test]
async fn test_enable_review_is_idempotent() {
    let (store, service) = setup();
    store
        .insert(&snippet("s1", "Regex").with_review(scheduled(6, 2, 2.2, Some(t0()))))
        .await
        .unwrap();

    let state = service.enable_review("alice", "s1").await.unwrap();
    assert_eq!(state.interval_days, 6);
    assert!((state.easiness_factor - 2.2).abs() < 1e-9);
}

#[tokio::test]
async fn test_due_queue_ordering_and_limit() {
    let (store, service) = setup_with(SnipdeckConfig::builder().due_limit(3).build().unwrap());

    let fixtures = [
        ("never", None),
        ("overdue-long", Some(t0() - Duration::days(10))),
        ("overdue-short", Some(t0() - Duration::hours(1))),
        ("exactly-now", Some(t0())),
        ("future", Some(t0() + Duration::days(2))),
        ("overdue-mid", Some(t0() - Duration::days(3))),
    ];
    for (id, next) in fixtures {
        store
            .insert(&snippet(id, id).with_review(scheduled(1, 1, 2.5, next)))
            .await
            .unwrap();
    }
    store.insert(&snippet("not-reviewable", "Plain")).await.unwrap();

    let due = service.due_items("alice", t0()).await.unwrap();
    let ids: Vec<_> = due.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["never", "overdue-long", "overdue-mid"]);

    let all = service.due_items_with_limit("alice", t0(), 100).await.unwrap();
    let ids: Vec<_> = all.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["never", "overdue-long", "overdue-mid", "overdue-short"]);

    assert_eq!(service.due_count("alice", t0()).await.unwrap(), 4);
    assert_eq!(service.due_count("bob", t0()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_reviewed_item_leaves_due_queue() {
    let (store, service) = setup();
    store.insert(&snippet("s1", "Closures")).await.unwrap();
    service.enable_review("alice", "s1").await.unwrap();

    assert_eq!(service.due_count("alice", t0()).await.unwrap(), 1);

    service.submit_review("alice", "s1", 3, t0()).await.unwrap();
    assert_eq!(service.due_count("alice", t0()).await.unwrap(), 0);
    // Due strictly after the scheduled instant
    assert_eq!(service.due_count("alice", t0() + Duration::days(1)).await.unwrap(), 0);
    assert_eq!(
        service
            .due_count("alice", t0() + Duration::days(1) + Duration::seconds(1))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_invalid_grade_rejected_without_state_change() {
    let (store, service) = setup();
    store
        .insert(&snippet("s1", "Traits").with_review(scheduled(6, 2, 2.5, None)))
        .await
        .unwrap();

    for raw in [-1, 6, 42] {
        let err = service.submit_review("alice", "s1", raw, t0()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValInvalidGrade);
    }

    let stored = store.get("alice", "s1").await.unwrap().unwrap().review.unwrap();
    assert_eq!(stored, scheduled(6, 2, 2.5, None));
}

#[tokio::test]
async fn test_missing_and_unreviewable_snippets() {
    let (store, service) = setup();
    store.insert(&snippet("s1", "Lifetimes")).await.unwrap();

    let err = service.submit_review("alice", "nope", 4, t0()).await.unwrap_err();
    assert!(matches!(err, SnipError::NotFound { .. }));

    let err = service.submit_review("alice", "s1", 4, t0()).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValNotReviewable);

    // Another owner cannot see the snippet
    let err = service.enable_review("bob", "s1").await.unwrap_err();
    assert!(matches!(err, SnipError::NotFound { .. }));
}

#[tokio::test]
async fn test_disable_and_delete_drop_state() {
    let (store, service) = setup();
    store.insert(&snippet("s1", "Iterators")).await.unwrap();
    store.insert(&snippet("s2", "Generics")).await.unwrap();
    service.enable_review("alice", "s1").await.unwrap();
    service.enable_review("alice", "s2").await.unwrap();

    assert!(service.disable_review("alice", "s1").await.unwrap());
    assert!(!service.disable_review("alice", "s1").await.unwrap());
    assert!(store.get("alice", "s1").await.unwrap().unwrap().review.is_none());

    assert!(store.delete("alice", "s2").await.unwrap());
    assert_eq!(service.due_count("alice", t0()).await.unwrap(), 0);
    let err = service.submit_review("alice", "s2", 5, t0()).await.unwrap_err();
    assert!(matches!(err, SnipError::NotFound { .. }));
}

/// Endless perfect recall saturates the schedule without breaking the queue.
#[tokio::test]
async fn test_saturated_schedule_keeps_queue_readable() {
    let (store, service) = setup();
    store.insert(&snippet("a", "Pinned")).await.unwrap();
    store.insert(&snippet("b", "Untouched")).await.unwrap();
    service.enable_review("alice", "a").await.unwrap();
    service.enable_review("alice", "b").await.unwrap();

    let mut last = None;
    for _ in 0..30 {
        let outcome = service.submit_review("alice", "a", 5, t0()).await.unwrap();
        last = outcome.next.next_review_at;
    }
    assert_eq!(last, Some(latest_review_at()));

    let stored = store.get("alice", "a").await.unwrap().unwrap().review.unwrap();
    assert_eq!(stored.next_review_at, Some(latest_review_at()));

    let due = service.due_items("alice", t0()).await.unwrap();
    let ids: Vec<_> = due.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["b"]);
    assert_eq!(service.due_count("alice", t0()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_huge_interval_persists_and_reads_back() {
    let (store, service) = setup();
    store
        .insert(&snippet("s1", "Ancient").with_review(scheduled(u32::MAX / 2, 12, 3.0, Some(t0()))))
        .await
        .unwrap();

    let outcome = service.submit_review("alice", "s1", 4, t0()).await.unwrap();
    assert_eq!(outcome.next.interval_days, u32::MAX);
    assert_eq!(outcome.next.next_review_at, Some(latest_review_at()));

    let far_future = latest_review_at() - Duration::days(1);
    assert!(service.due_items("alice", far_future).await.unwrap().is_empty());
    assert_eq!(service.due_count("alice", far_future).await.unwrap(), 0);

    // Reviewing again still round-trips
    let again = service.submit_review("alice", "s1", 5, t0()).await.unwrap();
    assert_eq!(again.previous.next_review_at, Some(latest_review_at()));
}
