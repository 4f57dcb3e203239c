//! Abstract storage port consumed by the review session coordinator.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{FlashcardRef, MemoryState};

/// Failure vocabulary of the storage port, independent of any backend crate.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A card in the batch no longer exists or was concurrently modified.
    #[error("write conflict: {0}")]
    Conflict(String),

    /// Any other storage-side failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Read/write access to a user's card collection.
///
/// `fetch_due_candidates` must not filter by due time; selection is the
/// engine's job. `apply_graded_states` is a single unit of work: either
/// every pair lands or none do.
#[async_trait]
pub trait CardRepository {
    /// All cards owned (transitively through user-words) by the user,
    /// with current memory state populated.
    async fn fetch_due_candidates(
        &self,
        user_id: i64,
    ) -> std::result::Result<Vec<FlashcardRef>, RepositoryError>;

    /// Atomic multi-row state update for the given (card id, state) pairs.
    async fn apply_graded_states(
        &self,
        pairs: &[(i64, MemoryState)],
    ) -> std::result::Result<(), RepositoryError>;
}
