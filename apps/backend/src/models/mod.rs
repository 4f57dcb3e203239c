//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use srs_core::{FlashcardRef, MemoryState, ReviewGrade};

// === Database Entity Types ===

/// Registered user of the platform.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Global word lemma. `pos` distinguishes homonyms.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Word {
    pub id: i64,
    pub word_text: String,
    pub pos: String,
}

/// Uploaded source (book, article).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Source {
    pub id: i64,
    pub title: String,
}

/// Segment of a source text, split for storage and processing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SourcePart {
    pub id: i64,
    pub source_id: i64,
    pub part_order: i32,
    pub source_part_text: String,
}

/// Link between a user and a source.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSource {
    pub id: i64,
    pub user_id: i64,
    pub source_id: i64,
}

/// Learning progress stage of a tracked word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_status_enum", rename_all = "lowercase")]
pub enum UserStatus {
    /// Discovered but not yet in the review cycle.
    New,
    /// Currently studied via flashcards.
    Learning,
    /// Mastered or manually marked as known.
    Learned,
}

/// Word lemma tracked by a user, aggregating statistics across meanings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserWord {
    pub id: i64,
    pub user_id: i64,
    pub word_id: i64,
    pub status: UserStatus,
    pub quantity: i32,
}

/// Parsed sentence from a source part. The generated search vector column
/// stays in Postgres; it is never read by the application.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sentence {
    pub id: i64,
    pub source_part_id: i64,
    pub sentence_text: String,
    pub sentence_start_index: i32,
    pub sentence_end_index: i32,
}

/// Flashcard row: one meaning/translation of a tracked word plus its
/// spaced-repetition state columns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFlashcard {
    pub id: i64,
    pub user_word_id: i64,
    pub translation: String,
    pub quantity: i32,
    pub ease_factor: f64,
    pub interval_days: i64,
    pub repetition_number: i32,
    pub next_repeat: DateTime<Utc>,
}

impl DbFlashcard {
    /// Current memory state of this card.
    pub fn memory_state(&self) -> MemoryState {
        MemoryState {
            ease_factor: self.ease_factor,
            interval_days: self.interval_days,
            repetition_number: self.repetition_number.max(0) as u32,
            next_repeat: self.next_repeat,
        }
    }

    /// Projection handed to the scheduling engine.
    pub fn to_card_ref(&self) -> FlashcardRef {
        FlashcardRef {
            id: self.id,
            user_word_id: self.user_word_id,
            state: self.memory_state(),
        }
    }
}

/// Association of a flashcard with an example sentence.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FlashcardSentence {
    pub id: i64,
    pub flashcard_id: i64,
    pub sentence_id: i64,
}

/// One graded review, recorded for audit. Append-only; never read by the
/// scheduling engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewLogEntry {
    pub id: Uuid,
    pub flashcard_id: i64,
    pub grade: i16,
    pub quality: i16,
    pub interval_before: i64,
    pub interval_after: i64,
    pub ease_before: f64,
    pub ease_after: f64,
    pub reviewed_at: DateTime<Utc>,
}

impl ReviewLogEntry {
    pub fn record(
        flashcard_id: i64,
        grade: ReviewGrade,
        before: &MemoryState,
        after: &MemoryState,
        reviewed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            flashcard_id,
            grade: grade.to_value() as i16,
            quality: grade.to_quality() as i16,
            interval_before: before.interval_days,
            interval_after: after.interval_days,
            ease_before: before.ease_factor,
            ease_after: after.ease_factor,
            reviewed_at,
        }
    }
}

// === API Request/Response Types ===

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct TrackWordRequest {
    pub user_id: i64,
    pub word_text: String,
    pub pos: String,
    pub translation: String,
}

#[derive(Debug, Serialize)]
pub struct TrackWordResponse {
    pub word_id: i64,
    pub user_word_id: i64,
    pub flashcard_id: i64,
    pub status: UserStatus,
    pub quantity: i32,
    pub state: MemoryState,
}

#[derive(Debug, Deserialize)]
pub struct DueQueueQuery {
    pub user_id: i64,
    pub limit: Option<usize>,
}

/// Due card enriched with its translation for display.
#[derive(Debug, Serialize)]
pub struct DueCard {
    pub flashcard_id: i64,
    pub user_word_id: i64,
    pub translation: String,
    pub state: MemoryState,
}

#[derive(Debug, Serialize)]
pub struct DueQueueResponse {
    pub cards: Vec<DueCard>,
    pub total_due: usize,
}

#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub flashcard_id: i64,
    /// Wire grade value: 0 fail, 1 hard, 2 good, 3 easy.
    pub grade: u8,
}

#[derive(Debug, Serialize)]
pub struct SubmitReviewResponse {
    pub flashcard_id: i64,
    pub state: MemoryState,
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub user_id: i64,
    /// Wire grade values applied to the due queue in order.
    pub grades: Vec<u8>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SessionCardResult {
    pub flashcard_id: i64,
    pub state: MemoryState,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub committed: usize,
    pub cards: Vec<SessionCardResult>,
}
