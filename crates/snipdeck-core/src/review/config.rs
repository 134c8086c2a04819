//! Configuration for SM-2 scheduling and due-item selection.

use serde::{Deserialize, Serialize};

use crate::types::{DEFAULT_EASINESS, MIN_EASINESS};

/// Parameters of the SM-2 scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Easiness assigned to newly reviewable snippets.
    /// Default: 2.5
    pub initial_easiness: f64,

    /// Floor applied after every easiness update.
    /// Default: 1.3
    pub min_easiness: f64,

    /// Lowest grade that counts as a successful recall.
    /// Default: 3
    pub passing_grade: u8,

    /// Interval after the first success in a streak.
    /// Default: 1 day
    pub first_interval_days: u32,

    /// Interval after the second success in a streak.
    /// Default: 6 days
    pub second_interval_days: u32,

    /// Interval after a failed recall.
    /// Default: 1 day
    pub lapse_interval_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_easiness: DEFAULT_EASINESS,
            min_easiness: MIN_EASINESS,
            passing_grade: 3,
            first_interval_days: 1,
            second_interval_days: 6,
            lapse_interval_days: 1,
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration values are in valid ranges.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.min_easiness.is_nan() || self.min_easiness <= 0.0 {
            return Err("min_easiness must be positive");
        }
        if self.initial_easiness < self.min_easiness {
            return Err("initial_easiness must not be below min_easiness");
        }
        if self.passing_grade > 5 {
            return Err("passing_grade must be between 0 and 5");
        }
        if self.first_interval_days == 0 || self.second_interval_days == 0 || self.lapse_interval_days == 0 {
            return Err("intervals must be at least 1 day");
        }
        Ok(())
    }
}

/// Due-queue settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Maximum number of due snippets returned per request.
    /// Default: 10
    pub due_limit: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self { due_limit: 10 }
    }
}

impl ReviewConfig {
    /// Validate configuration values are in valid ranges.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.due_limit == 0 {
            return Err("due_limit must be at least 1");
        }
        Ok(())
    }
}
