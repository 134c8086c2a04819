//! Ollama embedding provider implementation.
//!
//! Talks to the `/api/embeddings` endpoint of a local Ollama server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use snipdeck_core::error::{SnipError, SnipResult};
use snipdeck_core::traits::{Embedder, EmbedderConfig, EmbeddingAction};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f64>,
}

/// Ollama embedding provider.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    endpoint: url::Url,
    config: EmbedderConfig,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder.
    pub fn new(config: EmbedderConfig) -> SnipResult<Self> {
        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);

        let endpoint = url::Url::parse(base_url)
            .and_then(|url| url.join("/api/embeddings"))
            .map_err(|e| SnipError::Configuration(format!("Invalid Ollama URL: {}", e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            config,
        })
    }

    /// Endpoint embedding requests are sent to.
    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str, _action: Option<EmbeddingAction>) -> SnipResult<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            prompt: text,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SnipError::embedding(format!("Ollama embedding error: {}", e)))?;

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| SnipError::embedding(format!("Invalid Ollama response: {}", e)))?;

        // Ollama returns f64
        Ok(body.embedding.into_iter().map(|v| v as f32).collect())
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dims
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: Option<&str>) -> EmbedderConfig {
        EmbedderConfig {
            model: "nomic-embed-text".to_string(),
            embedding_dims: 768,
            api_key: None,
            base_url: base_url.map(String::from),
        }
    }

    #[test]
    fn test_default_endpoint() {
        let embedder = OllamaEmbedder::new(config(None)).unwrap();
        assert_eq!(embedder.endpoint().as_str(), "http://localhost:11434/api/embeddings");
        assert_eq!(embedder.dimension(), 768);
    }

    #[test]
    fn test_custom_endpoint() {
        let embedder = OllamaEmbedder::new(config(Some("http://gpu-box:8080"))).unwrap();
        assert_eq!(embedder.endpoint().as_str(), "http://gpu-box:8080/api/embeddings");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = OllamaEmbedder::new(config(Some("not a url")));
        assert!(matches!(result, Err(SnipError::Configuration(_))));
    }

    #[test]
    fn test_unreachable_server_is_embedding_error() {
        // Port 9 (discard) refuses connections on test hosts
        let embedder = OllamaEmbedder::new(config(Some("http://127.0.0.1:9"))).unwrap();
        let err = tokio_test::block_on(embedder.embed("fn main() {}", None)).unwrap_err();
        assert!(err.is_recoverable());
    }
}
