//! Core traits for snipdeck collaborators.

mod embedder;
mod snippet_store;

pub use embedder::*;
pub use snippet_store::*;
