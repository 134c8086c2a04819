//! Review service: the read-compute-write cycle around the scheduler.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::config::ReviewConfig;
use super::due::{count_due_items, select_due_items};
use super::scheduler::Sm2Scheduler;
use crate::config::SnipdeckConfig;
use crate::error::{SnipError, SnipResult};
use crate::traits::SnippetStore;
use crate::types::{MemoryState, ReviewGrade, ReviewItem, ReviewOutcome};

/// Applies reviews and serves due queues for one store.
pub struct ReviewService {
    store: Arc<dyn SnippetStore>,
    scheduler: Sm2Scheduler,
    config: ReviewConfig,
}

impl ReviewService {
    /// Create a review service from the application configuration.
    pub fn new(store: Arc<dyn SnippetStore>, config: &SnipdeckConfig) -> Self {
        Self {
            store,
            scheduler: Sm2Scheduler::with_config(config.scheduler.clone()),
            config: config.review.clone(),
        }
    }

    /// Get the scheduler.
    pub fn scheduler(&self) -> &Sm2Scheduler {
        &self.scheduler
    }

    /// Make a snippet reviewable, returning its state.
    ///
    /// Already-reviewable snippets keep their existing state.
    pub async fn enable_review(&self, owner_id: &str, snippet_id: &str) -> SnipResult<MemoryState> {
        let snippet = self
            .store
            .get(owner_id, snippet_id)
            .await?
            .ok_or_else(|| SnipError::not_found(snippet_id))?;

        if let Some(state) = snippet.review {
            return Ok(state);
        }

        let state = self.scheduler.initial_state();
        self.store.enable_review(owner_id, snippet_id, &state).await?;
        info!(snippet_id, "review enabled");
        Ok(state)
    }

    /// Remove a snippet from review. Returns false if it was not reviewable.
    pub async fn disable_review(&self, owner_id: &str, snippet_id: &str) -> SnipResult<bool> {
        self.store.disable_review(owner_id, snippet_id).await
    }

    /// Grade a review and persist the resulting state.
    ///
    /// Grades outside 0-5 are rejected before anything is read.
    pub async fn submit_review(
        &self,
        owner_id: &str,
        snippet_id: &str,
        raw_grade: i64,
        now: DateTime<Utc>,
    ) -> SnipResult<ReviewOutcome> {
        let grade = ReviewGrade::new(raw_grade)?;

        let snippet = self
            .store
            .get(owner_id, snippet_id)
            .await?
            .ok_or_else(|| SnipError::not_found(snippet_id))?;
        let previous = snippet.review.ok_or_else(|| SnipError::not_reviewable(snippet_id))?;

        let next = self.scheduler.submit_review(grade, &previous, now);

        if !self.store.save_review_state(owner_id, snippet_id, &next).await? {
            // Deleted or unenrolled between read and write
            return Err(SnipError::not_found(snippet_id));
        }

        debug!(
            snippet_id,
            grade = grade.value(),
            interval_days = next.interval_days,
            "review recorded"
        );

        Ok(ReviewOutcome {
            snippet_id: snippet_id.to_string(),
            grade,
            previous,
            next,
        })
    }

    /// Due snippets, bounded by the configured `due_limit`.
    pub async fn due_items(&self, owner_id: &str, now: DateTime<Utc>) -> SnipResult<Vec<ReviewItem>> {
        self.due_items_with_limit(owner_id, now, self.config.due_limit).await
    }

    /// Due snippets with an explicit bound.
    pub async fn due_items_with_limit(
        &self,
        owner_id: &str,
        now: DateTime<Utc>,
        limit: usize,
    ) -> SnipResult<Vec<ReviewItem>> {
        let items = self.store.review_items(owner_id).await?;
        Ok(select_due_items(items, now, limit))
    }

    /// Number of due snippets, for badge counts.
    pub async fn due_count(&self, owner_id: &str, now: DateTime<Utc>) -> SnipResult<usize> {
        let items = self.store.review_items(owner_id).await?;
        Ok(count_due_items(&items, now))
    }
}
