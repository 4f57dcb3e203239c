//! PostgreSQL database operations

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::{ApiError, Result};
use crate::models::*;
use srs_core::{CardRepository, FlashcardRef, MemoryState, RepositoryError};

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Create a new user
    pub async fn create_user(&self, username: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username)
            VALUES ($1)
            RETURNING id, username
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApiError::Conflict(format!("username '{username}' already exists"))
            }
            _ => ApiError::Database(e),
        })?;

        Ok(user)
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Delete a user and everything they own.
    ///
    /// The cascade is explicit and ordered child-first so foreign keys are
    /// never violated: review log and sentence links, then flashcards, then
    /// user-words and user-sources, finally the user row. Shared rows
    /// (words, sources, sentences) survive.
    pub async fn delete_user(&self, user_id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM review_log
            WHERE flashcard_id IN (
                SELECT f.id FROM flashcards f
                JOIN user_words uw ON f.user_word_id = uw.id
                WHERE uw.user_id = $1
            )
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM flashcard_sentences
            WHERE flashcard_id IN (
                SELECT f.id FROM flashcards f
                JOIN user_words uw ON f.user_word_id = uw.id
                WHERE uw.user_id = $1
            )
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM flashcards
            WHERE user_word_id IN (SELECT id FROM user_words WHERE user_id = $1)
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM user_words WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM user_sources WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    // === Word Repository ===

    /// Get or create the global word lemma for (text, part of speech)
    pub async fn get_or_create_word(&self, word_text: &str, pos: &str) -> Result<Word> {
        let word = sqlx::query_as::<_, Word>(
            r#"
            INSERT INTO words (word_text, pos)
            VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT uq_word_text_pos
                DO UPDATE SET word_text = EXCLUDED.word_text
            RETURNING id, word_text, pos
            "#,
        )
        .bind(word_text)
        .bind(pos)
        .fetch_one(&self.pool)
        .await?;

        Ok(word)
    }

    /// Track a word for a user, or bump its occurrence count if already
    /// tracked. A re-encountered word in `new` status moves to `learning`.
    pub async fn track_user_word(&self, user_id: i64, word_id: i64) -> Result<UserWord> {
        let user_word = sqlx::query_as::<_, UserWord>(
            r#"
            INSERT INTO user_words (user_id, word_id, status, quantity)
            VALUES ($1, $2, 'learning', 0)
            ON CONFLICT ON CONSTRAINT uq_user_word DO UPDATE SET
                quantity = user_words.quantity + 1,
                status = CASE
                    WHEN user_words.status = 'new' THEN 'learning'::user_status_enum
                    ELSE user_words.status
                END
            RETURNING id, user_id, word_id, status, quantity
            "#,
        )
        .bind(user_id)
        .bind(word_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_word)
    }

    // === Flashcard Repository ===

    /// Create a flashcard for a user-word, or bump the contextual frequency
    /// counter if this translation already exists
    pub async fn create_flashcard(
        &self,
        user_word_id: i64,
        translation: &str,
        state: &MemoryState,
    ) -> Result<DbFlashcard> {
        let card = sqlx::query_as::<_, DbFlashcard>(
            r#"
            INSERT INTO flashcards (user_word_id, translation, ease_factor,
                                    interval_days, repetition_number, next_repeat)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT ON CONSTRAINT uq_user_translation
                DO UPDATE SET quantity = flashcards.quantity + 1
            RETURNING id, user_word_id, translation, quantity, ease_factor,
                      interval_days, repetition_number, next_repeat
            "#,
        )
        .bind(user_word_id)
        .bind(translation)
        .bind(state.ease_factor)
        .bind(state.interval_days)
        .bind(state.repetition_number as i32)
        .bind(state.next_repeat)
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }

    /// Get flashcard by ID
    pub async fn get_flashcard(&self, flashcard_id: i64) -> Result<Option<DbFlashcard>> {
        let card = sqlx::query_as::<_, DbFlashcard>(
            r#"
            SELECT id, user_word_id, translation, quantity, ease_factor,
                   interval_days, repetition_number, next_repeat
            FROM flashcards
            WHERE id = $1
            "#,
        )
        .bind(flashcard_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// All flashcards owned by a user, transitively through user-words.
    /// Not filtered by due time; due selection belongs to the engine.
    pub async fn get_user_flashcards(&self, user_id: i64) -> Result<Vec<DbFlashcard>> {
        let cards = sqlx::query_as::<_, DbFlashcard>(
            r#"
            SELECT f.id, f.user_word_id, f.translation, f.quantity, f.ease_factor,
                   f.interval_days, f.repetition_number, f.next_repeat
            FROM flashcards f
            JOIN user_words uw ON f.user_word_id = uw.id
            WHERE uw.user_id = $1
            ORDER BY f.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    // === Review Log ===

    /// Append review log entries
    pub async fn insert_review_logs(&self, entries: &[ReviewLogEntry]) -> Result<()> {
        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO review_log (id, flashcard_id, grade, quality,
                                        interval_before, interval_after,
                                        ease_before, ease_after, reviewed_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(entry.id)
            .bind(entry.flashcard_id)
            .bind(entry.grade)
            .bind(entry.quality)
            .bind(entry.interval_before)
            .bind(entry.interval_after)
            .bind(entry.ease_before)
            .bind(entry.ease_after)
            .bind(entry.reviewed_at)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CardRepository for Database {
    async fn fetch_due_candidates(
        &self,
        user_id: i64,
    ) -> std::result::Result<Vec<FlashcardRef>, RepositoryError> {
        let cards = self
            .get_user_flashcards(user_id)
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        Ok(cards.iter().map(DbFlashcard::to_card_ref).collect())
    }

    async fn apply_graded_states(
        &self,
        pairs: &[(i64, MemoryState)],
    ) -> std::result::Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        for (flashcard_id, state) in pairs {
            let result = sqlx::query(
                r#"
                UPDATE flashcards
                SET ease_factor = $2,
                    interval_days = $3,
                    repetition_number = $4,
                    next_repeat = $5
                WHERE id = $1
                "#,
            )
            .bind(flashcard_id)
            .bind(state.ease_factor)
            .bind(state.interval_days)
            .bind(state.repetition_number as i32)
            .bind(state.next_repeat)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;

            // Dropping the transaction rolls back everything written so far.
            if result.rows_affected() != 1 {
                return Err(RepositoryError::Conflict(format!(
                    "flashcard {flashcard_id} no longer exists"
                )));
            }
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        Ok(())
    }
}
