//! SM-2 memory state types.
//!
//! A reviewable snippet carries one [`MemoryState`], owned entirely by the
//! snippet and mutated only by the scheduler's review submission.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SnipError, SnipResult};

/// Easiness factor assigned to a snippet when it first becomes reviewable.
pub const DEFAULT_EASINESS: f64 = 2.5;

/// Hard floor for the easiness factor.
pub const MIN_EASINESS: f64 = 1.3;

/// 9999-12-31T23:59:59Z as Unix seconds.
const LATEST_REVIEW_TIMESTAMP: i64 = 253_402_300_799;

/// Latest instant a review can be scheduled for.
///
/// Past year 9999 RFC 3339 has no four-digit year, so schedules and stored
/// timestamps saturate here.
pub fn latest_review_at() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(LATEST_REVIEW_TIMESTAMP)
}

/// SM-2 memory state tracking review dynamics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    /// Days until the next scheduled review.
    pub interval_days: u32,
    /// Consecutive successful recalls since the last lapse.
    pub repetitions: u32,
    /// Per-item difficulty multiplier; higher means easier to remember.
    pub easiness_factor: f64,
    /// Next scheduled review. `None` means never reviewed (immediately due).
    pub next_review_at: Option<DateTime<Utc>>,
    /// Last review timestamp.
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// Create the state of a snippet that has just been made reviewable.
    ///
    /// Interval 0, no repetitions, easiness 2.5 and no timestamps.
    pub fn new() -> Self {
        Self::with_easiness(DEFAULT_EASINESS)
    }

    /// Create a fresh state with a custom starting easiness.
    pub fn with_easiness(easiness_factor: f64) -> Self {
        Self {
            interval_days: 0,
            repetitions: 0,
            easiness_factor,
            next_review_at: None,
            last_reviewed_at: None,
        }
    }

    /// Whether this state has never been through a review.
    pub fn is_unseen(&self) -> bool {
        self.next_review_at.is_none()
    }

    /// Coarse learning phase of this state.
    pub fn phase(&self) -> ReviewPhase {
        match (self.next_review_at, self.repetitions) {
            (None, _) => ReviewPhase::Unseen,
            (Some(_), 0 | 1) => ReviewPhase::Learning,
            (Some(_), _) => ReviewPhase::Review,
        }
    }
}

impl Default for MemoryState {
    fn default() -> Self {
        Self::new()
    }
}

/// Learning phase derived from a [`MemoryState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewPhase {
    /// Never reviewed.
    Unseen,
    /// Reviewed, fewer than two consecutive successes.
    Learning,
    /// Two or more consecutive successes; intervals grow by easiness.
    Review,
}

/// Recall grade supplied by the caller for one review (0-5).
///
/// - 0-2: failed recall, in decreasing severity of the blackout
/// - 3-5: successful recall, from "with serious difficulty" to "perfect"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct ReviewGrade(u8);

impl ReviewGrade {
    /// Lowest grade.
    pub const MIN: ReviewGrade = ReviewGrade(0);
    /// Highest grade.
    pub const MAX: ReviewGrade = ReviewGrade(5);

    /// Create a grade, rejecting values outside 0-5.
    pub fn new(raw: i64) -> SnipResult<Self> {
        if (0..=5).contains(&raw) {
            Ok(Self(raw as u8))
        } else {
            Err(SnipError::invalid_grade(raw))
        }
    }

    /// Create a grade, saturating values outside 0-5.
    pub fn clamped(raw: i64) -> Self {
        Self(raw.clamp(0, 5) as u8)
    }

    /// The grade as an integer.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether this grade counts as a successful recall at the given threshold.
    pub fn is_passing(self, passing_grade: u8) -> bool {
        self.0 >= passing_grade
    }
}

impl From<ReviewGrade> for u8 {
    fn from(grade: ReviewGrade) -> Self {
        grade.0
    }
}

impl TryFrom<i64> for ReviewGrade {
    type Error = SnipError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        ReviewGrade::new(value)
    }
}

/// A reviewable snippet's id together with its memory state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    /// Snippet id.
    pub id: String,
    /// Title, for display in review queues.
    pub title: String,
    /// Current memory state.
    pub state: MemoryState,
}

impl ReviewItem {
    /// Create a review item.
    pub fn new(id: impl Into<String>, title: impl Into<String>, state: MemoryState) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            state,
        }
    }
}

/// Result of a submitted review: the state before and after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    /// Snippet id.
    pub snippet_id: String,
    /// Grade that was applied.
    pub grade: ReviewGrade,
    /// State before the review.
    pub previous: MemoryState,
    /// State after the review, as persisted.
    pub next: MemoryState,
}

impl ReviewOutcome {
    /// Whether the review reset the repetition streak.
    pub fn lapsed(&self) -> bool {
        self.next.repetitions == 0
    }
}
