//! Search candidate and result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::snippet::SnippetSummary;

/// A snippet under consideration for one query. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    /// Snippet projection.
    pub snippet: SnippetSummary,
    /// `1 - cosine distance` to the query embedding, when the snippet has one.
    pub vector_similarity: Option<f64>,
    /// Whether the title contains the query.
    pub title_matches: bool,
}

impl SearchCandidate {
    /// Build a candidate, deriving the keyword match from the title.
    pub fn new(snippet: SnippetSummary, vector_similarity: Option<f64>, query: &str) -> Self {
        let title_matches = title_contains(&snippet.title, query);
        Self {
            snippet,
            vector_similarity,
            title_matches,
        }
    }

    /// Build a candidate from a cosine distance reported by storage.
    pub fn from_distance(snippet: SnippetSummary, distance: f64, query: &str) -> Self {
        Self::new(snippet, Some(1.0 - distance), query)
    }

    /// Snippet id.
    pub fn id(&self) -> &str {
        &self.snippet.id
    }

    /// Last update timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.snippet.updated_at
    }
}

/// Case-insensitive containment of the trimmed query in a title.
///
/// An empty query matches nothing.
pub fn title_contains(title: &str, query: &str) -> bool {
    let needle = query.trim();
    if needle.is_empty() {
        return false;
    }
    title.to_lowercase().contains(&needle.to_lowercase())
}

/// Which ranking path produced a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPath {
    /// Blank query: most recently updated first.
    Recent,
    /// Vector similarity blended with keyword match.
    Hybrid,
    /// Embedding unavailable: keyword filter ordered by recency.
    KeywordFallback,
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSnippet {
    /// Snippet projection.
    pub snippet: SnippetSummary,
    /// Hybrid score. `None` on paths that do not score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Vector similarity used in the score, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_similarity: Option<f64>,
    /// Whether the title matched the query.
    pub title_matches: bool,
}

/// Search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Path that produced the hits.
    pub path: SearchPath,
    /// Ordered hits.
    pub hits: Vec<RankedSnippet>,
}

impl SearchResults {
    /// Ids of the hits, in order.
    pub fn ids(&self) -> Vec<&str> {
        self.hits.iter().map(|h| h.snippet.id.as_str()).collect()
    }
}
