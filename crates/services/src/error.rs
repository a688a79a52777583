//! Shared error types for the services crate.

use thiserror::Error;

use client::StoreError;
use cohort_core::{LearnerError, LearnerId};

/// Errors emitted by `RosterService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RosterError {
    #[error(transparent)]
    Learner(#[from] LearnerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no learner with id {0}")]
    UnknownLearner(LearnerId),

    #[error("week {0} is not part of the program")]
    UnknownWeek(u8),

    #[error("a write for learner {0} is already in flight")]
    WriteInFlight(LearnerId),

    #[error("roster state unavailable: {0}")]
    Unavailable(String),
}
