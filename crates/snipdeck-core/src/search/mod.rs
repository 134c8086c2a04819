//! Hybrid snippet search.
//!
//! Vector similarity blended with title keyword match, degrading to
//! keyword-only ranking when no query embedding can be produced.

mod config;
mod engine;
mod scorer;

pub use config::SearchConfig;
pub use engine::SearchEngine;
pub use scorer::{rank_by_keyword, rank_by_recency, HybridScorer};
