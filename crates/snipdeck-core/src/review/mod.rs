//! Spaced-repetition review.
//!
//! SM-2 scheduling of individual reviews plus the due-queue policy built on
//! top of it.

mod config;
mod due;
mod scheduler;
mod service;

pub use config::{ReviewConfig, SchedulerConfig};
pub use due::{count_due_items, is_due, select_due_items};
pub use scheduler::{grow_interval, Sm2Scheduler};
pub use service::ReviewService;
