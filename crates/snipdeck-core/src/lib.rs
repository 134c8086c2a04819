//! snipdeck-core - Core library for snipdeck.
//!
//! This crate provides the review scheduler, hybrid search engine, and
//! snippet storage behind the snipdeck code-snippet manager.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use snipdeck_core::{ReviewService, SearchEngine, SnipdeckConfig, SqliteSnippetStore};
//!
//! let config = SnipdeckConfig::from_env();
//! let store = Arc::new(SqliteSnippetStore::open(&config.database_path)?);
//!
//! // Grade a review and reschedule the snippet
//! let reviews = ReviewService::new(store.clone(), &config);
//! let outcome = reviews.submit_review("user1", "snippet-id", 4, chrono::Utc::now()).await?;
//!
//! // Search with an embedder attached
//! let search = SearchEngine::new(store, &config).with_embedder(embedder);
//! let results = search.search("user1", "react hooks", None).await?;
//! ```

pub mod config;
pub mod error;
pub mod review;
pub mod search;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{EmbedderProviderConfig, SnipdeckConfig};
pub use error::{ErrorCode, SnipError, SnipResult};
pub use review::{ReviewConfig, ReviewService, SchedulerConfig, Sm2Scheduler};
pub use search::{HybridScorer, SearchConfig, SearchEngine};
pub use store::SqliteSnippetStore;
pub use traits::{DistanceHit, Embedder, EmbedderConfig, EmbedderProvider, EmbeddingAction, SnippetStore};
pub use types::{
    MemoryState, RankedSnippet, ReviewGrade, ReviewItem, ReviewOutcome, ReviewPhase, SearchPath,
    SearchResults, Snippet, SnippetSummary,
};
