//! Search engine orchestrating embedding, storage lookups, and ranking.
//!
//! Three paths:
//! - Recent: blank query, most recently updated snippets
//! - Hybrid: query embedding + title match, scored by [`HybridScorer`]
//! - KeywordFallback: embedding failed or timed out, title match by recency

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::config::SearchConfig;
use super::scorer::{rank_by_keyword, rank_by_recency, HybridScorer};
use crate::config::SnipdeckConfig;
use crate::error::{SnipError, SnipResult};
use crate::traits::{Embedder, EmbeddingAction, SnippetStore};
use crate::types::{SearchCandidate, SearchPath, SearchResults};

/// Query-time search over one owner's snippets.
pub struct SearchEngine {
    store: Arc<dyn SnippetStore>,
    embedder: Option<Arc<dyn Embedder>>,
    scorer: HybridScorer,
    config: SearchConfig,
}

impl SearchEngine {
    /// Create a search engine without an embedding provider.
    ///
    /// Every non-blank query takes the keyword fallback until an embedder is
    /// attached with [`SearchEngine::with_embedder`].
    pub fn new(store: Arc<dyn SnippetStore>, config: &SnipdeckConfig) -> Self {
        Self {
            store,
            embedder: None,
            scorer: HybridScorer::from_config(&config.search),
            config: config.search.clone(),
        }
    }

    /// Attach an embedding provider.
    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Get the scorer.
    pub fn scorer(&self) -> &HybridScorer {
        &self.scorer
    }

    /// Search an owner's snippets.
    ///
    /// Embedding failures never surface: they switch to the keyword fallback.
    /// Storage failures propagate.
    ///
    /// # Arguments
    /// * `owner_id` - Caller identity scoping every lookup
    /// * `query` - Free-text query
    /// * `limit` - Maximum hits; the configured default when `None`
    pub async fn search(&self, owner_id: &str, query: &str, limit: Option<usize>) -> SnipResult<SearchResults> {
        let limit = limit.unwrap_or(self.config.default_limit);

        if query.trim().is_empty() {
            let candidates = self
                .store
                .recent(owner_id, limit)
                .await?
                .into_iter()
                .map(|summary| SearchCandidate::new(summary, None, query))
                .collect();
            return Ok(SearchResults {
                path: SearchPath::Recent,
                hits: rank_by_recency(candidates, limit),
            });
        }

        match self.embed(query, EmbeddingAction::Query).await {
            Ok(query_vector) => self.search_hybrid(owner_id, query, &query_vector, limit).await,
            Err(e) => {
                warn!(error = %e, "query embedding unavailable, falling back to keyword search");
                self.search_keyword(owner_id, query, limit).await
            }
        }
    }

    /// Compute and store the embedding for one snippet.
    ///
    /// Returns false when the provider fails; the snippet stays searchable by
    /// title only.
    pub async fn index_snippet(&self, owner_id: &str, snippet_id: &str) -> SnipResult<bool> {
        let snippet = self
            .store
            .get(owner_id, snippet_id)
            .await?
            .ok_or_else(|| SnipError::not_found(snippet_id))?;

        match self.embed(&snippet.embedding_text(), EmbeddingAction::Index).await {
            Ok(embedding) => self.store.set_embedding(owner_id, snippet_id, &embedding).await,
            Err(e) => {
                warn!(snippet_id, error = %e, "failed to embed snippet, leaving it unindexed");
                Ok(false)
            }
        }
    }

    async fn search_hybrid(
        &self,
        owner_id: &str,
        query: &str,
        query_vector: &[f32],
        limit: usize,
    ) -> SnipResult<SearchResults> {
        let pool = self.config.candidate_pool.max(limit);
        let nearest = self.store.nearest(owner_id, query_vector, pool).await?;
        let keyword = self.store.title_matches(owner_id, query, pool).await?;

        let mut candidates: HashMap<String, SearchCandidate> = nearest
            .into_iter()
            .map(|hit| {
                let candidate = SearchCandidate::from_distance(hit.snippet, hit.distance, query);
                (candidate.id().to_string(), candidate)
            })
            .collect();

        for summary in keyword {
            candidates
                .entry(summary.id.clone())
                .or_insert_with(|| SearchCandidate::new(summary, None, query));
        }

        debug!(candidates = candidates.len(), "ranking hybrid candidates");

        let hits = self
            .scorer
            .rank_candidates(query, candidates.into_values().collect(), limit);
        Ok(SearchResults {
            path: SearchPath::Hybrid,
            hits,
        })
    }

    async fn search_keyword(&self, owner_id: &str, query: &str, limit: usize) -> SnipResult<SearchResults> {
        let candidates = self
            .store
            .title_matches(owner_id, query, limit)
            .await?
            .into_iter()
            .map(|summary| SearchCandidate::new(summary, None, query))
            .collect();

        Ok(SearchResults {
            path: SearchPath::KeywordFallback,
            hits: rank_by_keyword(candidates, limit),
        })
    }

    /// Embed text under the configured timeout.
    async fn embed(&self, text: &str, action: EmbeddingAction) -> SnipResult<Vec<f32>> {
        let embedder = self
            .embedder
            .as_ref()
            .ok_or_else(|| SnipError::embedding("No embedding provider configured"))?;

        let budget = self.config.embed_timeout_ms;
        let embedding = tokio::time::timeout(Duration::from_millis(budget), embedder.embed(text, Some(action)))
            .await
            .map_err(|_| SnipError::timeout(budget))??;

        if embedding.is_empty() {
            return Err(SnipError::embedding("Provider returned an empty embedding"));
        }
        Ok(embedding)
    }
}
