//! OpenAI embedding provider.
//!
//! Snippet text is cut to a character budget before indexing so oversized
//! files still get a vector; queries are only trimmed. `text-embedding-3-*`
//! models are asked for the configured dimension, and any vector of another
//! length is rejected so it never reaches the store.

use std::borrow::Cow;

use async_trait::async_trait;

use snipdeck_core::error::{SnipError, SnipResult};
use snipdeck_core::traits::{Embedder, EmbedderConfig, EmbeddingAction};

#[cfg(feature = "openai")]
use async_openai::{
    config::OpenAIConfig,
    types::{CreateEmbeddingRequest, EmbeddingInput},
    Client,
};

/// Characters of snippet text sent for indexing. Roughly the 8k-token model
/// limit for source code.
pub const MAX_INDEX_CHARS: usize = 24_000;

/// OpenAI embedding provider.
pub struct OpenAIEmbedder {
    #[cfg(feature = "openai")]
    client: Client<OpenAIConfig>,
    config: EmbedderConfig,
}

impl OpenAIEmbedder {
    /// Create a new OpenAI embedder.
    ///
    /// The API key comes from the config, falling back to `OPENAI_API_KEY`.
    pub fn new(config: EmbedderConfig) -> SnipResult<Self> {
        let api_key = resolve_api_key(&config)?;

        #[cfg(feature = "openai")]
        let client = {
            let mut client_config = OpenAIConfig::new().with_api_key(api_key);
            if let Some(base_url) = &config.base_url {
                client_config = client_config.with_api_base(base_url);
            }
            Client::with_config(client_config)
        };

        #[cfg(not(feature = "openai"))]
        drop(api_key);

        Ok(Self {
            #[cfg(feature = "openai")]
            client,
            config,
        })
    }

    /// Dimension to request explicitly. Only the v3 models can shorten vectors.
    #[cfg_attr(not(feature = "openai"), allow(dead_code))]
    fn requested_dimensions(&self) -> Option<u32> {
        if self.config.model.starts_with("text-embedding-3") {
            u32::try_from(self.config.embedding_dims).ok()
        } else {
            None
        }
    }

    #[cfg(feature = "openai")]
    async fn request(&self, input: String) -> SnipResult<Vec<f32>> {
        let request = CreateEmbeddingRequest {
            model: self.config.model.clone(),
            input: EmbeddingInput::String(input),
            dimensions: self.requested_dimensions(),
            ..Default::default()
        };

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| SnipError::embedding(format!("OpenAI embedding error: {}", e)))?;

        response
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or_else(|| SnipError::embedding("No embedding returned"))
    }

    #[cfg(not(feature = "openai"))]
    async fn request(&self, _input: String) -> SnipResult<Vec<f32>> {
        Err(SnipError::Configuration(
            "OpenAI feature not enabled. Enable the 'openai' feature.".to_string(),
        ))
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed(&self, text: &str, action: Option<EmbeddingAction>) -> SnipResult<Vec<f32>> {
        let action = action.unwrap_or_default();
        let input = prepare_input(text, action);
        if input.is_empty() {
            return Err(SnipError::validation("Cannot embed empty text"));
        }
        if let Cow::Owned(_) = input {
            tracing::debug!(chars = MAX_INDEX_CHARS, "truncated snippet text for indexing");
        }

        let embedding = self.request(input.into_owned()).await?;
        check_dimension(self.config.embedding_dims, embedding)
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dims
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

fn resolve_api_key(config: &EmbedderConfig) -> SnipResult<String> {
    config
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            SnipError::Configuration(
                "OpenAI API key not found. Set OPENAI_API_KEY environment variable or provide api_key in config."
                    .to_string(),
            )
        })
}

/// Text actually sent to the API for one action.
fn prepare_input(text: &str, action: EmbeddingAction) -> Cow<'_, str> {
    match action {
        EmbeddingAction::Query => Cow::Borrowed(text.trim()),
        EmbeddingAction::Index => match text.char_indices().nth(MAX_INDEX_CHARS) {
            Some((cut, _)) => Cow::Owned(text[..cut].to_string()),
            None => Cow::Borrowed(text),
        },
    }
}

/// Reject vectors whose length differs from the configured dimension.
fn check_dimension(expected: usize, embedding: Vec<f32>) -> SnipResult<Vec<f32>> {
    if embedding.len() != expected {
        tracing::warn!(expected, actual = embedding.len(), "embedding dimension mismatch");
        return Err(SnipError::dimension_mismatch(expected, embedding.len()));
    }
    Ok(embedding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snipdeck_core::error::ErrorCode;

    fn config(model: &str, dims: usize) -> EmbedderConfig {
        EmbedderConfig {
            model: model.to_string(),
            embedding_dims: dims,
            api_key: Some("sk-test".to_string()),
            base_url: Some("http://localhost:9999/v1".to_string()),
        }
    }

    #[test]
    fn test_explicit_api_key() {
        let embedder = OpenAIEmbedder::new(config("text-embedding-3-large", 3072)).unwrap();
        assert_eq!(embedder.model_name(), "text-embedding-3-large");
        assert_eq!(embedder.dimension(), 3072);
    }

    #[test]
    fn test_requested_dimensions_only_for_v3_models() {
        let v3 = OpenAIEmbedder::new(config("text-embedding-3-small", 512)).unwrap();
        assert_eq!(v3.requested_dimensions(), Some(512));

        let ada = OpenAIEmbedder::new(config("text-embedding-ada-002", 1536)).unwrap();
        assert_eq!(ada.requested_dimensions(), None);
    }

    #[test]
    fn test_query_input_is_trimmed() {
        assert_eq!(prepare_input("  react hooks \n", EmbeddingAction::Query), "react hooks");
    }

    #[test]
    fn test_index_input_is_truncated_on_char_boundary() {
        let short = "fn main() {}";
        assert!(matches!(prepare_input(short, EmbeddingAction::Index), Cow::Borrowed(_)));

        // Multi-byte chars so a byte cut would split one
        let long = "é".repeat(MAX_INDEX_CHARS + 10);
        let prepared = prepare_input(&long, EmbeddingAction::Index);
        assert_eq!(prepared.chars().count(), MAX_INDEX_CHARS);
    }

    #[test]
    fn test_dimension_check() {
        assert_eq!(check_dimension(3, vec![0.1, 0.2, 0.3]).unwrap().len(), 3);

        let err = check_dimension(1536, vec![0.0; 768]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmbDimensionMismatch);
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_blank_text_rejected_before_request() {
        let embedder = OpenAIEmbedder::new(config("text-embedding-3-small", 1536)).unwrap();
        let err = embedder.embed("   ", Some(EmbeddingAction::Query)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValInvalidInput);
    }
}
