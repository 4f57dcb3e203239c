//! Word tracking endpoints

use axum::{extract::State, Json};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::{TrackWordRequest, TrackWordResponse};
use crate::AppState;
use srs_core::MemoryState;

/// POST /api/words
///
/// Track a word lemma for a user and create the flashcard for the given
/// translation. The new card starts with the default memory state and is
/// due immediately. Re-tracking an existing (word, translation) pair bumps
/// the frequency counters instead of resetting the card's schedule.
pub async fn track(
    State(state): State<AppState>,
    Json(payload): Json<TrackWordRequest>,
) -> Result<Json<TrackWordResponse>> {
    let word_text = payload.word_text.trim();
    let pos = payload.pos.trim();
    let translation = payload.translation.trim();
    if word_text.is_empty() || pos.is_empty() || translation.is_empty() {
        return Err(ApiError::BadRequest(
            "word_text, pos and translation must not be empty".to_string(),
        ));
    }

    state
        .db
        .get_user(payload.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {}", payload.user_id)))?;

    let word = state.db.get_or_create_word(word_text, pos).await?;
    let user_word = state.db.track_user_word(payload.user_id, word.id).await?;

    let card = state
        .db
        .create_flashcard(user_word.id, translation, &MemoryState::new_card(Utc::now()))
        .await?;

    tracing::debug!(
        "Tracked word '{}' ({}) as flashcard {} for user {}",
        word.word_text,
        word.pos,
        card.id,
        payload.user_id
    );

    Ok(Json(TrackWordResponse {
        word_id: word.id,
        user_word_id: user_word.id,
        flashcard_id: card.id,
        status: user_word.status,
        quantity: card.quantity,
        state: card.memory_state(),
    }))
}
