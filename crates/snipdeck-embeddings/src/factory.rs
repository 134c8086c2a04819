//! Factory for creating embedding providers.

use std::sync::Arc;

use snipdeck_core::config::EmbedderProviderConfig;
use snipdeck_core::error::SnipResult;
use snipdeck_core::traits::{Embedder, EmbedderConfig, EmbedderProvider};

use crate::ollama::OllamaEmbedder;
use crate::openai::OpenAIEmbedder;

/// Factory for creating embedding providers.
pub struct EmbedderFactory;

impl EmbedderFactory {
    /// Create an embedder from the given configuration.
    pub fn create(provider: EmbedderProvider, config: EmbedderConfig) -> SnipResult<Arc<dyn Embedder>> {
        tracing::debug!(%provider, model = %config.model, "creating embedder");

        match provider {
            EmbedderProvider::OpenAI => Ok(Arc::new(OpenAIEmbedder::new(config)?)),
            EmbedderProvider::Ollama => Ok(Arc::new(OllamaEmbedder::new(config)?)),
        }
    }

    /// Create the embedder described by the `embedder` config section.
    pub fn from_config(config: &EmbedderProviderConfig) -> SnipResult<Arc<dyn Embedder>> {
        Self::create(config.provider, config.config.clone())
    }

    /// Create an OpenAI embedder with default configuration.
    pub fn openai() -> SnipResult<Arc<dyn Embedder>> {
        Self::create(EmbedderProvider::OpenAI, EmbedderConfig::default())
    }

    /// Create an Ollama embedder with a specific model.
    pub fn ollama_with_model(model: impl Into<String>, dims: usize) -> SnipResult<Arc<dyn Embedder>> {
        let config = EmbedderConfig {
            model: model.into(),
            embedding_dims: dims,
            ..Default::default()
        };
        Self::create(EmbedderProvider::Ollama, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_ollama() {
        let config = EmbedderProviderConfig {
            provider: EmbedderProvider::Ollama,
            config: EmbedderConfig {
                model: "mxbai-embed-large".to_string(),
                embedding_dims: 1024,
                ..Default::default()
            },
        };

        let embedder = EmbedderFactory::from_config(&config).unwrap();
        assert_eq!(embedder.model_name(), "mxbai-embed-large");
        assert_eq!(embedder.dimension(), 1024);
    }

    #[test]
    fn test_ollama_with_model() {
        let embedder = EmbedderFactory::ollama_with_model("nomic-embed-text", 768).unwrap();
        assert_eq!(embedder.model_name(), "nomic-embed-text");
    }

    #[test]
    fn test_openai_with_explicit_key() {
        let config = EmbedderConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let embedder = EmbedderFactory::create(EmbedderProvider::OpenAI, config).unwrap();
        assert_eq!(embedder.model_name(), "text-embedding-3-small");
        assert_eq!(embedder.dimension(), 1536);
    }
}
