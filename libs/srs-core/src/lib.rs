//! Spaced repetition engine shared by the GramVoc services.
//!
//! Provides:
//! - Memory-state model for flashcards (SM-2 style state, validation)
//! - Grading policies behind a trait seam (SM-2 shipped)
//! - Due-set selection over a user's card collection
//! - Review session coordination with atomic batch commit
//!
//! The engine never reads the wall clock and performs no I/O of its own;
//! storage is reached only through the [`repository::CardRepository`] port.

pub mod algorithm;
pub mod error;
pub mod queue;
pub mod repository;
pub mod session;
pub mod types;

pub use algorithm::{by_name, GradingPolicy};
pub use error::{Result, SessionError};
pub use queue::select_due;
pub use repository::{CardRepository, RepositoryError};
pub use session::{GradedCard, ReviewSession};
pub use types::{
    DueSet, FlashcardRef, MemoryState, ReviewGrade, DEFAULT_EASE, MINIMUM_EASE,
};
