//! Shared error type for learner store implementations.

use thiserror::Error;

/// Failures surfaced by a [`crate::LearnerStore`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The store could not be reached at all.
    #[error("could not reach the learner store: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("learner store rejected the request ({status}): {detail}")]
    Remote { status: u16, detail: String },

    /// The store answered successfully but the body did not decode.
    #[error("failed to decode learner store response: {0}")]
    Decode(#[source] reqwest::Error),

    /// The store handle itself is unusable (in-memory lock poisoned).
    #[error("learner store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// A remote "not found" failure for the given resource description.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        StoreError::Remote {
            status: 404,
            detail: what.into(),
        }
    }
}
