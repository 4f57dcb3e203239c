//! SM-2 spaced repetition grading policy.
//!
//! Based on SuperMemo 2 with configurable parameters. Grades collapse to
//! the classic 0-5 quality scale (Fail 0, Hard 3, Good 4, Easy 5); a
//! quality below 3 is a lapse.

use chrono::{DateTime, Duration, Utc};

use super::GradingPolicy;
use crate::types::{MemoryState, ReviewGrade, DEFAULT_EASE, MINIMUM_EASE};

/// SM-2 policy with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub first_interval: i64,
    pub second_interval: i64,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: DEFAULT_EASE,
            minimum_ease: MINIMUM_EASE,
            first_interval: 1,
            second_interval: 6,
        }
    }
}

impl GradingPolicy for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_state(&self, now: DateTime<Utc>) -> MemoryState {
        MemoryState {
            ease_factor: self.initial_ease,
            interval_days: 1,
            repetition_number: 0,
            next_repeat: now,
        }
    }

    fn next_state(
        &self,
        current: &MemoryState,
        grade: ReviewGrade,
        now: DateTime<Utc>,
    ) -> MemoryState {
        let quality = grade.to_quality();

        let (repetition, interval, ease) = if quality < 3 {
            // Lapse: restart the short-term schedule. Ease is left alone;
            // the penalty arrives through the delta of later recalls.
            (0, 1, current.ease_factor)
        } else {
            let repetition = current.repetition_number + 1;
            let interval = match repetition {
                1 => self.first_interval,
                2 => self.second_interval,
                // Half-up rounding to whole days.
                _ => (current.interval_days as f64 * current.ease_factor).round() as i64,
            };
            let ease = (current.ease_factor + Self::ease_delta(quality)).max(self.minimum_ease);
            (repetition, interval, ease)
        };

        MemoryState {
            ease_factor: ease,
            interval_days: interval,
            repetition_number: repetition,
            next_repeat: now + Duration::days(interval),
        }
    }
}

impl Sm2 {
    /// Classic SM-2 ease adjustment for quality q in [3, 5]:
    /// 0.1 - (5 - q) * (0.08 + (5 - q) * 0.02).
    /// Easy gains 0.1, Good is exactly neutral, Hard loses 0.14.
    fn ease_delta(quality: u8) -> f64 {
        let miss = (5 - quality.min(5)) as f64;
        0.1 - miss * (0.08 + miss * 0.02)
    }
}
