use async_trait::async_trait;

use cohort_core::{Learner, LearnerId, LearnerPatch, NewLearner, WeekProgress};

use crate::error::StoreError;

/// Remote learner store contract.
///
/// The store owns persistence and the authoritative overall-progress
/// aggregates; every mutating call returns the full record the store
/// settled on, which callers adopt wholesale. Operations carry no built-in
/// retry; retrying is caller policy.
#[async_trait]
pub trait LearnerStore: Send + Sync {
    /// Fetch all learners.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transport` on network failure or
    /// `StoreError::Remote` on a non-success response.
    async fn list_learners(&self) -> Result<Vec<Learner>, StoreError>;

    /// Create a learner from identity fields.
    ///
    /// The store assigns the id and a zeroed progress scaffold.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the create is not acknowledged.
    async fn create_learner(&self, draft: &NewLearner) -> Result<Learner, StoreError>;

    /// Delete a learner and cascade its progress.
    ///
    /// A 204 No Content response is success with no body.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the delete is not acknowledged.
    async fn delete_learner(&self, id: LearnerId) -> Result<(), StoreError>;

    /// Replace a learner's entire progress sequence.
    ///
    /// Returns the updated record including recomputed aggregates.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the replacement is not acknowledged.
    async fn replace_progress(
        &self,
        id: LearnerId,
        progress: &[WeekProgress],
    ) -> Result<Learner, StoreError>;

    /// Patch learner fields (currently the start date).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the patch is not acknowledged.
    async fn patch_learner(
        &self,
        id: LearnerId,
        patch: &LearnerPatch,
    ) -> Result<Learner, StoreError>;
}
