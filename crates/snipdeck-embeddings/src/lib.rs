//! snipdeck-embeddings - Embedding provider implementations for snipdeck.
//!
//! # Supported Providers
//!
//! - **OpenAI** (feature: `openai`) - text-embedding-3-small, text-embedding-3-large, etc.
//! - **Ollama** - local embedding models over the Ollama HTTP API
//!
//! # Example
//!
//! ```ignore
//! use snipdeck_core::{SearchEngine, SnipdeckConfig};
//! use snipdeck_embeddings::EmbedderFactory;
//!
//! let config = SnipdeckConfig::from_env();
//! let embedder = EmbedderFactory::from_config(&config.embedder)?;
//! let search = SearchEngine::new(store, &config).with_embedder(embedder);
//! ```

mod factory;
mod ollama;
mod openai;

pub use factory::EmbedderFactory;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAIEmbedder;

// Re-export core types for convenience
pub use snipdeck_core::traits::{Embedder, EmbedderConfig, EmbedderProvider, EmbeddingAction};
