//! Embedder trait and related types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SnipResult;

/// Whether text is embedded for indexing or for querying.
///
/// Some models embed documents and queries differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingAction {
    /// Indexing a stored snippet.
    #[default]
    Index,
    /// Embedding a search query.
    Query,
}

/// Core Embedder trait - all embedding providers implement this.
///
/// Maps text to a fixed-length vector. Callers treat it as a black box that
/// may fail or stall; search degrades around both.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding for a single text.
    async fn embed(&self, text: &str, action: Option<EmbeddingAction>) -> SnipResult<Vec<f32>>;

    /// Get the dimension of the embeddings.
    fn dimension(&self) -> usize;

    /// Get the model name.
    fn model_name(&self) -> &str;
}

/// Embedder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    /// Model name/identifier.
    pub model: String,
    /// Embedding dimensions.
    #[serde(default = "default_embedding_dims")]
    pub embedding_dims: usize,
    /// API key (if not using environment variable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL for API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_embedding_dims() -> usize {
    1536
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            embedding_dims: default_embedding_dims(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Embedder provider type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmbedderProvider {
    #[default]
    OpenAI,
    Ollama,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_provider_parses_case_insensitively() {
        assert_eq!(EmbedderProvider::from_str("OpenAI").unwrap(), EmbedderProvider::OpenAI);
        assert_eq!(EmbedderProvider::from_str("ollama").unwrap(), EmbedderProvider::Ollama);
        assert!(EmbedderProvider::from_str("cohere").is_err());
        assert_eq!(EmbedderProvider::OpenAI.to_string(), "openai");
    }

    #[test]
    fn test_default_config() {
        let config = EmbedderConfig::default();
        assert_eq!(config.model, "text-embedding-3-small");
        assert_eq!(config.embedding_dims, 1536);
    }
}
