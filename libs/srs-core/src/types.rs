//! Core types for the spaced repetition engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SM-2 ease factor floor. No state below this is ever produced or accepted.
pub const MINIMUM_EASE: f64 = 1.3;

/// Ease factor assigned to a freshly created card.
pub const DEFAULT_EASE: f64 = 2.5;

/// Recall quality reported by the learner for one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewGrade {
    Fail,
    Hard,
    Good,
    Easy,
}

impl ReviewGrade {
    /// Convert to the wire value (0-3).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Fail => 0,
            Self::Hard => 1,
            Self::Good => 2,
            Self::Easy => 3,
        }
    }

    /// Parse from the wire value (0-3).
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Fail),
            1 => Some(Self::Hard),
            2 => Some(Self::Good),
            3 => Some(Self::Easy),
            _ => None,
        }
    }

    /// Map to SM-2 quality on the classic 0-5 scale.
    ///
    /// The four buckets sit at 0, 3, 4, 5: everything at or above 3 counts
    /// as a successful recall, below 3 as a lapse.
    pub fn to_quality(self) -> u8 {
        match self {
            Self::Fail => 0,
            Self::Hard => 3,
            Self::Good => 4,
            Self::Easy => 5,
        }
    }

    /// Whether the grade counts as a successful recall.
    pub fn is_success(self) -> bool {
        self.to_quality() >= 3
    }
}

/// A card's review memory state.
///
/// Immutable per review event: the grading policy always returns a fresh
/// value, it never patches fields in place. `next_repeat` is derived from
/// the review time plus `interval_days`, so the pair stays consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    pub ease_factor: f64,
    pub interval_days: i64,
    pub repetition_number: u32,
    pub next_repeat: DateTime<Utc>,
}

impl MemoryState {
    /// State assigned to a card at creation: due immediately.
    pub fn new_card(now: DateTime<Utc>) -> Self {
        Self {
            ease_factor: DEFAULT_EASE,
            interval_days: 1,
            repetition_number: 0,
            next_repeat: now,
        }
    }

    /// Check the state invariants: ease at or above the floor, interval at
    /// least one day, due timestamp not before the Unix epoch.
    pub fn is_valid(&self) -> bool {
        self.ease_factor >= MINIMUM_EASE
            && self.interval_days >= 1
            && self.next_repeat >= DateTime::<Utc>::UNIX_EPOCH
    }
}

/// Projection of a flashcard as the engine sees it.
///
/// Identifier, owning user-word and current memory state; translation text
/// and example sentences stay behind in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardRef {
    pub id: i64,
    pub user_word_id: i64,
    pub state: MemoryState,
}

/// Ordered set of cards eligible for review.
///
/// A query result, never persisted. Ordering is ascending due time with
/// ties broken by ascending card id, so two selections over the same
/// collection and reference time are identical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DueSet {
    cards: Vec<FlashcardRef>,
}

impl DueSet {
    pub(crate) fn new(cards: Vec<FlashcardRef>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlashcardRef> {
        self.cards.iter()
    }

    pub fn as_slice(&self) -> &[FlashcardRef] {
        &self.cards
    }

    pub fn into_inner(self) -> Vec<FlashcardRef> {
        self.cards
    }
}

impl IntoIterator for DueSet {
    type Item = FlashcardRef;
    type IntoIter = std::vec::IntoIter<FlashcardRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}
