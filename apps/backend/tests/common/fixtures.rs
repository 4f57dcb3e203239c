//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use uuid::Uuid;

/// Generate a unique username to avoid collisions between test runs.
pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Create a user creation request body.
pub fn create_user_request(username: &str) -> serde_json::Value {
    json!({ "username": username })
}

/// Create a word tracking request body.
pub fn track_word_request(
    user_id: i64,
    word_text: &str,
    pos: &str,
    translation: &str,
) -> serde_json::Value {
    json!({
        "user_id": user_id,
        "word_text": word_text,
        "pos": pos,
        "translation": translation
    })
}

/// Create a single review submission body.
pub fn submit_review_request(flashcard_id: i64, grade: u8) -> serde_json::Value {
    json!({
        "flashcard_id": flashcard_id,
        "grade": grade
    })
}

/// Create a batched session request body.
pub fn session_request(user_id: i64, grades: &[u8], limit: Option<usize>) -> serde_json::Value {
    json!({
        "user_id": user_id,
        "grades": grades,
        "limit": limit
    })
}
