//! Grading policy implementations.

pub mod sm2;

use chrono::{DateTime, Utc};

use crate::types::{MemoryState, ReviewGrade};

/// Trait for grading policies: pure mappings from a card's current memory
/// state and a recall grade to the next memory state.
pub trait GradingPolicy: Send + Sync {
    /// Policy identifier.
    fn name(&self) -> &'static str;

    /// State for a card that has never been reviewed.
    fn initial_state(&self, now: DateTime<Utc>) -> MemoryState;

    /// Compute the state after one review. Never mutates `current`; the
    /// same inputs always produce an equal output.
    fn next_state(
        &self,
        current: &MemoryState,
        grade: ReviewGrade,
        now: DateTime<Utc>,
    ) -> MemoryState;
}

/// Get a policy by name.
pub fn by_name(name: &str) -> Option<Box<dyn GradingPolicy>> {
    match name {
        "sm2" => Some(Box::new(sm2::Sm2::default())),
        _ => None,
    }
}
