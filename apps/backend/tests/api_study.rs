//! Study API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;

use common::fixtures;
use common::TestContext;

async fn track_word(
    server: &TestServer,
    user_id: i64,
    word: &str,
    translation: &str,
) -> i64 {
    let response = server
        .post("/api/words")
        .json(&fixtures::track_word_request(user_id, word, "NOUN", translation))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["flashcard_id"].as_i64().unwrap()
}

/// Test due queue is empty for a fresh user.
#[tokio::test]
#[ignore = "requires database"]
async fn test_due_queue_empty() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user().await;

    let response = server
        .get(&format!("/api/study/due?user_id={}", user.id))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["cards"].as_array().unwrap().len(), 0);
    assert_eq!(body["total_due"].as_i64().unwrap(), 0);

    // Cleanup
    ctx.cleanup_user(user.id).await;
}

/// Test a freshly tracked word is due immediately.
#[tokio::test]
#[ignore = "requires database"]
async fn test_new_card_is_due_immediately() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user().await;

    let flashcard_id = track_word(&server, user.id, "apfel", "apple").await;

    let response = server
        .get(&format!("/api/study/due?user_id={}", user.id))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let cards = body["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["flashcard_id"].as_i64().unwrap(), flashcard_id);
    assert_eq!(cards[0]["translation"].as_str().unwrap(), "apple");

    // Cleanup
    ctx.cleanup_user(user.id).await;
}

/// Test due queue respects the limit parameter.
#[tokio::test]
#[ignore = "requires database"]
async fn test_due_queue_respects_limit() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user().await;

    track_word(&server, user.id, "eins", "one").await;
    track_word(&server, user.id, "zwei", "two").await;
    track_word(&server, user.id, "drei", "three").await;

    let response = server
        .get(&format!("/api/study/due?user_id={}&limit=2", user.id))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["cards"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_due"].as_i64().unwrap(), 2);

    // Cleanup
    ctx.cleanup_user(user.id).await;
}

/// Test reviewing an unknown flashcard returns not found.
#[tokio::test]
#[ignore = "requires database"]
async fn test_review_not_found() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/study/review")
        .json(&fixtures::submit_review_request(999999999, 2))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

/// Test an out-of-range grade value is rejected.
#[tokio::test]
#[ignore = "requires database"]
async fn test_review_invalid_grade() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user().await;

    let flashcard_id = track_word(&server, user.id, "katze", "cat").await;

    let response = server
        .post("/api/study/review")
        .json(&fixtures::submit_review_request(flashcard_id, 9))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    // Cleanup
    ctx.cleanup_user(user.id).await;
}

/// Test grading a card good schedules it one day out and removes it from
/// the due queue.
#[tokio::test]
#[ignore = "requires database"]
async fn test_review_good_reschedules_card() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user().await;

    let flashcard_id = track_word(&server, user.id, "hund", "dog").await;

    let response = server
        .post("/api/study/review")
        .json(&fixtures::submit_review_request(flashcard_id, 2))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["state"]["repetition_number"].as_i64().unwrap(), 1);
    assert_eq!(body["state"]["interval_days"].as_i64().unwrap(), 1);

    let due = server
        .get(&format!("/api/study/due?user_id={}", user.id))
        .await;
    let due_body: serde_json::Value = due.json();
    assert_eq!(due_body["total_due"].as_i64().unwrap(), 0);

    // Cleanup
    ctx.cleanup_user(user.id).await;
}

/// Test a batched session commits all grades in due order.
#[tokio::test]
#[ignore = "requires database"]
async fn test_session_commits_batch() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user().await;

    track_word(&server, user.id, "rot", "red").await;
    track_word(&server, user.id, "blau", "blue").await;

    let response = server
        .post("/api/study/session")
        .json(&fixtures::session_request(user.id, &[2, 0], None))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["committed"].as_i64().unwrap(), 2);
    assert_eq!(body["cards"].as_array().unwrap().len(), 2);

    // The good card moved out of the queue; the failed one is due again
    // tomorrow, so nothing is left right now.
    let due = server
        .get(&format!("/api/study/due?user_id={}", user.id))
        .await;
    let due_body: serde_json::Value = due.json();
    assert_eq!(due_body["total_due"].as_i64().unwrap(), 0);

    // Cleanup
    ctx.cleanup_user(user.id).await;
}

/// Test submitting more grades than due cards fails without persisting
/// anything.
#[tokio::test]
#[ignore = "requires database"]
async fn test_session_with_excess_grades_is_atomic() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user().await;

    track_word(&server, user.id, "gruen", "green").await;

    let response = server
        .post("/api/study/session")
        .json(&fixtures::session_request(user.id, &[2, 2], None))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    // Nothing was committed: the card is still due.
    let due = server
        .get(&format!("/api/study/due?user_id={}", user.id))
        .await;
    let due_body: serde_json::Value = due.json();
    assert_eq!(due_body["total_due"].as_i64().unwrap(), 1);

    // Cleanup
    ctx.cleanup_user(user.id).await;
}
