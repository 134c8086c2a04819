//! Configuration system for snipdeck.
//!
//! One immutable [`SnipdeckConfig`] is built at startup and handed by
//! reference to the review and search services.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{SnipError, SnipResult};
use crate::review::{ReviewConfig, SchedulerConfig};
use crate::search::SearchConfig;
use crate::traits::{EmbedderConfig, EmbedderProvider};

/// Embedder provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderProviderConfig {
    /// Provider type.
    pub provider: EmbedderProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: EmbedderConfig,
}

impl Default for EmbedderProviderConfig {
    fn default() -> Self {
        Self {
            provider: EmbedderProvider::OpenAI,
            config: EmbedderConfig::default(),
        }
    }
}

/// Main snipdeck configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnipdeckConfig {
    /// SM-2 scheduler parameters.
    pub scheduler: SchedulerConfig,
    /// Due-queue settings.
    pub review: ReviewConfig,
    /// Hybrid search settings.
    pub search: SearchConfig,
    /// Embedder configuration.
    pub embedder: EmbedderProviderConfig,
    /// Path to the snippet database.
    pub database_path: PathBuf,
}

impl Default for SnipdeckConfig {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .map(|h| h.join(".snipdeck"))
            .unwrap_or_else(|| PathBuf::from(".snipdeck"));

        Self {
            scheduler: SchedulerConfig::default(),
            review: ReviewConfig::default(),
            search: SearchConfig::default(),
            embedder: EmbedderProviderConfig::default(),
            database_path: data_dir.join("snipdeck.db"),
        }
    }
}

impl SnipdeckConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> SnipResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => toml::from_str(&content).map_err(|e| SnipError::Configuration(e.to_string()))?,
            Some("json") => serde_json::from_str(&content).map_err(|e| SnipError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&content).map_err(|e| SnipError::Configuration(e.to_string()))?
            }
            _ => {
                return Err(SnipError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("SNIPDECK_DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(limit) = env_parse("SNIPDECK_DUE_LIMIT") {
            config.review.due_limit = limit;
        }
        if let Some(floor) = env_parse("SNIPDECK_SIMILARITY_FLOOR") {
            config.search.similarity_floor = floor;
        }
        if let Some(limit) = env_parse("SNIPDECK_SEARCH_LIMIT") {
            config.search.default_limit = limit;
        }
        if let Some(timeout) = env_parse("SNIPDECK_EMBED_TIMEOUT_MS") {
            config.search.embed_timeout_ms = timeout;
        }

        // Embedder configuration
        if let Ok(provider) = std::env::var("SNIPDECK_EMBEDDER_PROVIDER") {
            match EmbedderProvider::from_str(&provider) {
                Ok(provider) => config.embedder.provider = provider,
                Err(_) => tracing::warn!(provider = %provider, "unknown embedder provider, keeping default"),
            }
        }
        if let Ok(model) = std::env::var("SNIPDECK_EMBEDDER_MODEL") {
            config.embedder.config.model = model;
        }
        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            config.embedder.config.api_key = Some(api_key);
        }

        config
    }

    /// Check every section for out-of-range values.
    pub fn validate(&self) -> SnipResult<()> {
        self.scheduler
            .validate()
            .and_then(|_| self.review.validate())
            .and_then(|_| self.search.validate())
            .map_err(|e| SnipError::Configuration(e.to_string()))
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> SnipdeckConfigBuilder {
        SnipdeckConfigBuilder::default()
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Builder for SnipdeckConfig.
#[derive(Default)]
pub struct SnipdeckConfigBuilder {
    config: SnipdeckConfig,
}

impl SnipdeckConfigBuilder {
    /// Set scheduler parameters.
    pub fn scheduler(mut self, config: SchedulerConfig) -> Self {
        self.config.scheduler = config;
        self
    }

    /// Set the due-queue limit.
    pub fn due_limit(mut self, limit: usize) -> Self {
        self.config.review.due_limit = limit;
        self
    }

    /// Set search configuration.
    pub fn search(mut self, config: SearchConfig) -> Self {
        self.config.search = config;
        self
    }

    /// Set embedder configuration.
    pub fn embedder(mut self, config: EmbedderProviderConfig) -> Self {
        self.config.embedder = config;
        self
    }

    /// Set database path.
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.database_path = path.into();
        self
    }

    /// Build the configuration, rejecting out-of-range values.
    pub fn build(self) -> SnipResult<SnipdeckConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
