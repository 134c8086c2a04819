//! Snippet types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::review::MemoryState;

/// A code snippet stored for one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    /// Unique identifier.
    pub id: String,
    /// Owning user.
    pub owner_id: String,
    /// Display title; keyword search matches against it.
    pub title: String,
    /// Programming language tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Source code body.
    pub code: String,
    /// Rich-text notes document. Opaque to this crate.
    #[serde(default)]
    pub notes: serde_json::Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp; recency ordering and ranking ties use it.
    pub updated_at: DateTime<Utc>,
    /// Review state, present while the snippet is reviewable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<MemoryState>,
    /// Stored embedding of the snippet text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Snippet {
    /// Create a new snippet with a generated id and the current timestamp.
    pub fn new(owner_id: impl Into<String>, title: impl Into<String>, code: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            title: title.into(),
            language: None,
            code: code.into(),
            notes: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
            review: None,
            embedding: None,
        }
    }

    /// Set the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the notes document.
    pub fn with_notes(mut self, notes: serde_json::Value) -> Self {
        self.notes = notes;
        self
    }

    /// Set both timestamps.
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Set the review state.
    pub fn with_review(mut self, state: MemoryState) -> Self {
        self.review = Some(state);
        self
    }

    /// Set the embedding.
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Text fed to the embedding provider for this snippet.
    pub fn embedding_text(&self) -> String {
        match &self.language {
            Some(language) => format!("{}\n{}\n{}", self.title, language, self.code),
            None => format!("{}\n{}", self.title, self.code),
        }
    }

    /// Lightweight projection used by search.
    pub fn summary(&self) -> SnippetSummary {
        SnippetSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            language: self.language.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Search-facing projection of a snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnippetSummary {
    /// Snippet id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Language tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_builder() {
        let snippet = Snippet::new("user-1", "Debounce hook", "export function useDebounce() {}")
            .with_id("s1")
            .with_language("typescript")
            .with_review(MemoryState::new());

        assert_eq!(snippet.id, "s1");
        assert_eq!(snippet.owner_id, "user-1");
        assert_eq!(snippet.language.as_deref(), Some("typescript"));
        assert!(snippet.review.is_some());
        assert!(snippet.embedding.is_none());
    }

    #[test]
    fn test_embedding_text_includes_language() {
        let snippet = Snippet::new("u", "Title", "code()").with_language("rust");
        assert_eq!(snippet.embedding_text(), "Title\nrust\ncode()");

        let bare = Snippet::new("u", "Title", "code()");
        assert_eq!(bare.embedding_text(), "Title\ncode()");
    }

    #[test]
    fn test_summary_projection() {
        let snippet = Snippet::new("u", "Title", "code()").with_id("s9");
        let summary = snippet.summary();
        assert_eq!(summary.id, "s9");
        assert_eq!(summary.title, "Title");
        assert_eq!(summary.updated_at, snippet.updated_at);
    }
}
