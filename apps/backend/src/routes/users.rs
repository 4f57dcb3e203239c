//! User endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::{CreateUserRequest, User};
use crate::AppState;

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<User>> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(ApiError::BadRequest("username must not be empty".to_string()));
    }
    if username.len() > 50 {
        return Err(ApiError::BadRequest(
            "username must be at most 50 characters".to_string(),
        ));
    }

    let user = state.db.create_user(username).await?;

    tracing::info!("Created user {} ({})", user.id, user.username);

    Ok(Json(user))
}

/// GET /api/users/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>> {
    let user = state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {user_id}")))?;

    Ok(Json(user))
}

/// DELETE /api/users/:id
/// Removes the user and everything they own, in explicit child-first order.
pub async fn remove(State(state): State<AppState>, Path(user_id): Path<i64>) -> Result<StatusCode> {
    let deleted = state.db.delete_user(user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("User {user_id}")));
    }

    tracing::info!("Deleted user {}", user_id);

    Ok(StatusCode::NO_CONTENT)
}
