//! Error types for the spaced repetition engine.

use thiserror::Error;

use crate::repository::RepositoryError;

/// Result type alias using SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur while driving a review session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Wire grade value outside 0-3. Nothing is consumed or mutated.
    #[error("invalid grade value {0}, expected 0-3")]
    InvalidGrade(u8),

    /// Grading was requested but the session's due set is exhausted.
    /// The session stays in progress; already graded cards can still
    /// be committed.
    #[error("no cards remaining in the session")]
    NoCardsRemaining,

    /// The repository rejected the commit. Nothing was persisted; the
    /// caller decides between retrying the whole session and aborting.
    #[error("commit failed: {source}")]
    CommitFailed {
        #[source]
        source: RepositoryError,
    },

    /// A computed memory state failed its own validation before being
    /// handed to the repository. Programming-error signal, not a
    /// recoverable condition.
    #[error("memory state invariant violated: {0}")]
    InvariantViolation(String),

    /// Operation attempted on a session that already committed.
    #[error("session already completed")]
    SessionCompleted,
}
