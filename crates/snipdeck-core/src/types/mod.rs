//! Core types for snipdeck.

mod review;
mod search;
mod snippet;

pub use review::*;
pub use search::*;
pub use snippet::*;
