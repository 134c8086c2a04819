//! SM-2 scheduler for snippet reviews.
//!
//! Given a recall grade and a snippet's memory state, computes the next
//! interval, repetition streak, easiness factor, and review timestamps.

use chrono::{DateTime, Days, Utc};

use super::config::SchedulerConfig;
use crate::types::{latest_review_at, MemoryState, ReviewGrade};

/// SM-2 scheduler.
///
/// Stateless apart from its parameters; safe to share across threads and
/// call concurrently for unrelated snippets.
#[derive(Debug, Clone, Default)]
pub struct Sm2Scheduler {
    config: SchedulerConfig,
}

impl Sm2Scheduler {
    /// Create a scheduler with default SM-2 parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler with custom parameters.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Get the scheduler parameters.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// State assigned when a snippet is first made reviewable.
    pub fn initial_state(&self) -> MemoryState {
        MemoryState::with_easiness(self.config.initial_easiness)
    }

    /// Apply one review to a memory state.
    ///
    /// On success the interval steps 1 -> 6 -> round(interval * EF) and the
    /// streak grows; on failure the interval drops to 1 and the streak resets.
    /// The easiness update runs in both branches from the original grade and
    /// easiness:
    ///
    /// EF' = max(EF + 0.1 - (5 - q) * (0.08 + (5 - q) * 0.02), min_easiness)
    ///
    /// The next review lands `interval` calendar days after `now`, capped at
    /// [`latest_review_at`].
    ///
    /// # Arguments
    /// * `grade` - Quality of recall (0-5)
    /// * `state` - Current memory state
    /// * `now` - Review timestamp
    pub fn submit_review(&self, grade: ReviewGrade, state: &MemoryState, now: DateTime<Utc>) -> MemoryState {
        let (interval_days, repetitions) = if grade.is_passing(self.config.passing_grade) {
            let interval = match state.repetitions {
                0 => self.config.first_interval_days,
                1 => self.config.second_interval_days,
                _ => grow_interval(state.interval_days, state.easiness_factor),
            };
            (interval, state.repetitions.saturating_add(1))
        } else {
            (self.config.lapse_interval_days, 0)
        };

        let easiness_factor = self.next_easiness(grade, state.easiness_factor);
        let next_review_at = add_calendar_days(now, interval_days);

        tracing::debug!(
            grade = grade.value(),
            interval_days,
            repetitions,
            easiness_factor,
            "computed next review"
        );

        MemoryState {
            interval_days,
            repetitions,
            easiness_factor,
            next_review_at: Some(next_review_at),
            last_reviewed_at: Some(now),
        }
    }

    /// Easiness after a review with `grade`, floored at `min_easiness`.
    pub fn next_easiness(&self, grade: ReviewGrade, easiness_factor: f64) -> f64 {
        let miss = 5.0 - f64::from(grade.value());
        let updated = easiness_factor + (0.1 - miss * (0.08 + miss * 0.02));
        updated.max(self.config.min_easiness)
    }
}

/// `round(interval * easiness)`, rounding half away from zero.
///
/// Saturates at `u32::MAX` and never returns less than one day.
pub fn grow_interval(interval_days: u32, easiness_factor: f64) -> u32 {
    // f64 -> u32 `as` casts saturate and map NaN to 0
    let grown = (f64::from(interval_days) * easiness_factor).round() as u32;
    grown.max(1)
}

fn add_calendar_days(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    let latest = latest_review_at();
    now.checked_add_days(Days::new(u64::from(days)))
        .map_or(latest, |next| next.min(latest))
}
