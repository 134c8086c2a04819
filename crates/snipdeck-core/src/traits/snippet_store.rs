//! Snippet persistence trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::SnipResult;
use crate::types::{MemoryState, ReviewItem, Snippet, SnippetSummary};

/// A stored snippet paired with its cosine distance to a query vector.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceHit {
    /// Snippet projection.
    pub snippet: SnippetSummary,
    /// Cosine distance in [0, 2].
    pub distance: f64,
}

/// Persistence collaborator for snippets and their review state.
///
/// Every call is scoped by an explicit `owner_id`; rows belonging to other
/// owners are invisible.
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Insert a snippet.
    async fn insert(&self, snippet: &Snippet) -> SnipResult<()>;

    /// Get a snippet by id.
    async fn get(&self, owner_id: &str, id: &str) -> SnipResult<Option<Snippet>>;

    /// Replace title/code/language and bump `updated_at`. Clears the stored
    /// embedding since it no longer describes the content.
    async fn update_content(
        &self,
        owner_id: &str,
        id: &str,
        title: &str,
        code: &str,
        language: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> SnipResult<bool>;

    /// Delete a snippet, along with its review state.
    async fn delete(&self, owner_id: &str, id: &str) -> SnipResult<bool>;

    /// Store an embedding for a snippet.
    async fn set_embedding(&self, owner_id: &str, id: &str, embedding: &[f32]) -> SnipResult<bool>;

    /// Attach a review state to a snippet that has none. Returns false if the
    /// snippet is missing or already reviewable.
    async fn enable_review(&self, owner_id: &str, id: &str, state: &MemoryState) -> SnipResult<bool>;

    /// Drop a snippet's review state.
    async fn disable_review(&self, owner_id: &str, id: &str) -> SnipResult<bool>;

    /// All reviewable snippets of an owner with their memory states.
    async fn review_items(&self, owner_id: &str) -> SnipResult<Vec<ReviewItem>>;

    /// Overwrite one snippet's review state. Last writer wins.
    async fn save_review_state(&self, owner_id: &str, id: &str, state: &MemoryState) -> SnipResult<bool>;

    /// Snippets with stored embeddings, nearest first by cosine distance.
    async fn nearest(&self, owner_id: &str, query_vector: &[f32], limit: usize) -> SnipResult<Vec<DistanceHit>>;

    /// Snippets whose title contains `query` (case-insensitive), most recent first.
    async fn title_matches(&self, owner_id: &str, query: &str, limit: usize) -> SnipResult<Vec<SnippetSummary>>;

    /// Most recently updated snippets.
    async fn recent(&self, owner_id: &str, limit: usize) -> SnipResult<Vec<SnippetSummary>>;
}
