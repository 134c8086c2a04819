//! Snippet persistence backends.

mod sqlite;

pub use sqlite::{cosine_distance, SqliteSnippetStore};
