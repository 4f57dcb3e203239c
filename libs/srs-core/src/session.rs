//! Review session coordination: snapshot, grade, commit.

use chrono::{DateTime, Utc};

use crate::algorithm::GradingPolicy;
use crate::error::{Result, SessionError};
use crate::queue::select_due;
use crate::repository::{CardRepository, RepositoryError};
use crate::types::{FlashcardRef, MemoryState, ReviewGrade};

/// Outcome of grading a single card within a session.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedCard {
    pub card_id: i64,
    pub state: MemoryState,
}

/// Drives one review session for one user.
///
/// The due set is snapshotted at start and not re-validated against
/// concurrent changes until commit; sessions are single-user, short-lived
/// and low-contention, so the optimistic window is acceptable. Grades
/// accumulate in memory and reach storage only through [`commit`], as one
/// atomic batch. [`abort`] discards them without writing.
///
/// [`commit`]: ReviewSession::commit
/// [`abort`]: ReviewSession::abort
pub struct ReviewSession {
    user_id: i64,
    policy: Box<dyn GradingPolicy>,
    snapshot: Vec<FlashcardRef>,
    cursor: usize,
    graded: Vec<(i64, MemoryState)>,
    completed: bool,
}

impl ReviewSession {
    /// Open a session: fetch the user's cards through the repository,
    /// select the due snapshot at `now`, bounded by `limit`.
    pub async fn start<R>(
        repo: &R,
        policy: Box<dyn GradingPolicy>,
        user_id: i64,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> std::result::Result<Self, RepositoryError>
    where
        R: CardRepository + ?Sized,
    {
        let candidates = repo.fetch_due_candidates(user_id).await?;
        let snapshot = select_due(candidates, now, limit).into_inner();

        Ok(Self {
            user_id,
            policy,
            snapshot,
            cursor: 0,
            graded: Vec::new(),
            completed: false,
        })
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Cards in the snapshot not yet graded.
    pub fn remaining(&self) -> usize {
        self.snapshot.len() - self.cursor
    }

    /// Next card to grade, if any.
    pub fn peek_next(&self) -> Option<&FlashcardRef> {
        self.snapshot.get(self.cursor)
    }

    /// Accumulated (card id, next state) pairs, in grading order.
    pub fn graded(&self) -> &[(i64, MemoryState)] {
        &self.graded
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Grade the next ungraded card in due order.
    ///
    /// Exhausting the snapshot is an error, but the session stays open:
    /// what has been graded so far can still be committed.
    pub fn grade_next(&mut self, grade: ReviewGrade, now: DateTime<Utc>) -> Result<GradedCard> {
        if self.completed {
            return Err(SessionError::SessionCompleted);
        }
        let card = self
            .snapshot
            .get(self.cursor)
            .ok_or(SessionError::NoCardsRemaining)?;

        let card_id = card.id;
        let state = self.policy.next_state(&card.state, grade, now);
        self.graded.push((card_id, state.clone()));
        self.cursor += 1;

        Ok(GradedCard { card_id, state })
    }

    /// Grade the next card from a raw wire value. An out-of-range value
    /// consumes nothing.
    pub fn grade_next_value(&mut self, value: u8, now: DateTime<Utc>) -> Result<GradedCard> {
        let grade = ReviewGrade::from_value(value).ok_or(SessionError::InvalidGrade(value))?;
        self.grade_next(grade, now)
    }

    /// Write all accumulated grades through the repository as one unit of
    /// work, then close the session.
    ///
    /// Every state is validated before the repository is touched. On
    /// repository failure nothing is persisted and the session stays open,
    /// so the caller may retry or abort. Returns the number of cards
    /// committed.
    pub async fn commit<R>(&mut self, repo: &R) -> Result<usize>
    where
        R: CardRepository + ?Sized,
    {
        if self.completed {
            return Err(SessionError::SessionCompleted);
        }
        for (card_id, state) in &self.graded {
            if !state.is_valid() {
                return Err(SessionError::InvariantViolation(format!(
                    "card {card_id} produced ease {}, interval {}",
                    state.ease_factor, state.interval_days
                )));
            }
        }

        repo.apply_graded_states(&self.graded)
            .await
            .map_err(|source| SessionError::CommitFailed { source })?;

        self.completed = true;
        Ok(self.graded.len())
    }

    /// Discard the session without writing anything.
    pub fn abort(self) {}
}
