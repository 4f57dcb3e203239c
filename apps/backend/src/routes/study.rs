//! Study endpoints

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;
use srs_core::{
    by_name, select_due, CardRepository, GradingPolicy, ReviewGrade, ReviewSession, SessionError,
};

fn grading_policy() -> Result<Box<dyn GradingPolicy>> {
    by_name("sm2").ok_or_else(|| ApiError::Internal("grading policy not registered".to_string()))
}

/// GET /api/study/due
///
/// The user's due queue: most-overdue first, bounded by `limit`.
pub async fn due(
    State(state): State<AppState>,
    Query(query): Query<DueQueueQuery>,
) -> Result<Json<DueQueueResponse>> {
    state
        .db
        .get_user(query.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {}", query.user_id)))?;

    let cards = state.db.get_user_flashcards(query.user_id).await?;
    let translations: HashMap<i64, String> = cards
        .iter()
        .map(|c| (c.id, c.translation.clone()))
        .collect();

    let refs = cards.iter().map(DbFlashcard::to_card_ref).collect();
    let due_set = select_due(refs, Utc::now(), query.limit);
    let total_due = due_set.len();

    let cards = due_set
        .into_iter()
        .map(|card| DueCard {
            flashcard_id: card.id,
            user_word_id: card.user_word_id,
            translation: translations.get(&card.id).cloned().unwrap_or_default(),
            state: card.state,
        })
        .collect();

    Ok(Json(DueQueueResponse { cards, total_due }))
}

/// POST /api/study/review
///
/// Grade a single card outside a batched session.
pub async fn review(
    State(state): State<AppState>,
    Json(payload): Json<SubmitReviewRequest>,
) -> Result<Json<SubmitReviewResponse>> {
    let card = state
        .db
        .get_flashcard(payload.flashcard_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Flashcard {}", payload.flashcard_id)))?;

    let grade = ReviewGrade::from_value(payload.grade)
        .ok_or(SessionError::InvalidGrade(payload.grade))?;

    let policy = grading_policy()?;
    let now = Utc::now();
    let before = card.memory_state();
    let next = policy.next_state(&before, grade, now);

    state
        .db
        .apply_graded_states(&[(card.id, next.clone())])
        .await?;
    state
        .db
        .insert_review_logs(&[ReviewLogEntry::record(card.id, grade, &before, &next, now)])
        .await?;

    tracing::debug!(
        "Reviewed flashcard {} with grade {:?}: interval {} -> {}",
        card.id,
        grade,
        before.interval_days,
        next.interval_days
    );

    Ok(Json(SubmitReviewResponse {
        flashcard_id: card.id,
        state: next,
    }))
}

/// POST /api/study/session
///
/// Batched review: the submitted grades are applied to the due queue in
/// order and committed as one unit of work. Nothing is persisted when any
/// grade is invalid or the commit conflicts.
pub async fn session(
    State(state): State<AppState>,
    Json(payload): Json<SessionRequest>,
) -> Result<Json<SessionResponse>> {
    state
        .db
        .get_user(payload.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {}", payload.user_id)))?;

    let policy = grading_policy()?;
    let now = Utc::now();
    let repo = state.db.as_ref();

    let mut session =
        ReviewSession::start(repo, policy, payload.user_id, now, payload.limit).await?;

    let mut logs = Vec::with_capacity(payload.grades.len());
    let mut cards = Vec::with_capacity(payload.grades.len());
    for value in &payload.grades {
        let grade =
            ReviewGrade::from_value(*value).ok_or(SessionError::InvalidGrade(*value))?;
        let before = session.peek_next().map(|c| c.state.clone());
        let graded = session.grade_next(grade, now)?;
        if let Some(before) = before {
            logs.push(ReviewLogEntry::record(
                graded.card_id,
                grade,
                &before,
                &graded.state,
                now,
            ));
        }
        cards.push(SessionCardResult {
            flashcard_id: graded.card_id,
            state: graded.state,
        });
    }

    let committed = session.commit(repo).await?;
    state.db.insert_review_logs(&logs).await?;

    tracing::info!(
        "Committed review session of {} cards for user {}",
        committed,
        payload.user_id
    );

    Ok(Json(SessionResponse { committed, cards }))
}
