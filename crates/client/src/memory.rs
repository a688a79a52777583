use std::sync::Mutex;

use async_trait::async_trait;

use cohort_core::{Curriculum, Learner, LearnerId, LearnerPatch, NewLearner, WeekProgress};

use crate::error::StoreError;
use crate::store::LearnerStore;

/// In-memory [`LearnerStore`] for testing and prototyping.
///
/// Plays the remote service's role faithfully: assigns sequential positive
/// ids, scaffolds zeroed progress on create, and recomputes the store-owned
/// aggregate fields on every write. A single-shot failure can be injected to
/// exercise rollback paths.
pub struct InMemoryLearnerStore {
    curriculum: Curriculum,
    inner: Mutex<Inner>,
}

struct Inner {
    learners: Vec<Learner>,
    next_id: i64,
    failures_left: u32,
}

impl InMemoryLearnerStore {
    #[must_use]
    pub fn new(curriculum: Curriculum) -> Self {
        Self {
            curriculum,
            inner: Mutex::new(Inner {
                learners: Vec::new(),
                next_id: 1,
                failures_left: 0,
            }),
        }
    }

    /// Make the next store operation fail with a remote 500.
    pub fn fail_next(&self) {
        self.fail_requests(1);
    }

    /// Make the next `count` store operations fail with a remote 500.
    pub fn fail_requests(&self, count: u32) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failures_left = count;
        }
    }

    /// Insert a learner record as-is, as if the store already held it.
    ///
    /// Keeps id assignment ahead of the seeded record. Aggregates are left
    /// untouched, so tests can seed shapes the scaffolding would never
    /// produce (a learner with no progress rows).
    pub fn seed(&self, learner: Learner) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.next_id = inner.next_id.max(learner.id.value() + 1);
            inner.learners.push(learner);
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl Default for InMemoryLearnerStore {
    fn default() -> Self {
        Self::new(Curriculum::default_bootcamp())
    }
}

impl Inner {
    fn take_injected_failure(&mut self) -> Result<(), StoreError> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(StoreError::Remote {
                status: 500,
                detail: "injected failure".into(),
            });
        }
        Ok(())
    }

    fn find_mut(&mut self, id: LearnerId) -> Result<&mut Learner, StoreError> {
        self.learners
            .iter_mut()
            .find(|learner| learner.id == id)
            .ok_or_else(|| StoreError::not_found(format!("learner {id} not found")))
    }
}

fn recompute_aggregates(learner: &mut Learner) {
    let completed: u32 = learner
        .progress
        .iter()
        .map(|week| week.modules_completed)
        .sum();
    let total: u32 = learner.progress.iter().map(|week| week.total_modules).sum();
    learner.overall_modules_completed = completed;
    learner.overall_modules_total = total;
    learner.overall_progress_pct = if total == 0 {
        0.0
    } else {
        f64::from(completed) * 100.0 / f64::from(total)
    };
}

#[async_trait]
impl LearnerStore for InMemoryLearnerStore {
    async fn list_learners(&self) -> Result<Vec<Learner>, StoreError> {
        let mut inner = self.lock()?;
        inner.take_injected_failure()?;
        Ok(inner.learners.clone())
    }

    async fn create_learner(&self, draft: &NewLearner) -> Result<Learner, StoreError> {
        let mut inner = self.lock()?;
        inner.take_injected_failure()?;
        let id = LearnerId::new(inner.next_id);
        inner.next_id += 1;

        let mut learner = Learner {
            id,
            name: draft.name().to_owned(),
            source_role: draft.source_role().to_owned(),
            target_role: draft.target_role().to_owned(),
            start_week: draft.start_week(),
            start_date: draft.start_date(),
            progress: self.curriculum.scaffold(),
            overall_modules_completed: 0,
            overall_modules_total: 0,
            overall_progress_pct: 0.0,
        };
        recompute_aggregates(&mut learner);
        inner.learners.push(learner.clone());
        Ok(learner)
    }

    async fn delete_learner(&self, id: LearnerId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.take_injected_failure()?;
        let position = inner
            .learners
            .iter()
            .position(|learner| learner.id == id)
            .ok_or_else(|| StoreError::not_found(format!("learner {id} not found")))?;
        inner.learners.remove(position);
        Ok(())
    }

    async fn replace_progress(
        &self,
        id: LearnerId,
        progress: &[WeekProgress],
    ) -> Result<Learner, StoreError> {
        let mut inner = self.lock()?;
        inner.take_injected_failure()?;
        let learner = inner.find_mut(id)?;
        learner.progress = progress.to_vec();
        recompute_aggregates(learner);
        Ok(learner.clone())
    }

    async fn patch_learner(
        &self,
        id: LearnerId,
        patch: &LearnerPatch,
    ) -> Result<Learner, StoreError> {
        let mut inner = self.lock()?;
        inner.take_injected_failure()?;
        let learner = inner.find_mut(id)?;
        if let Some(start_date) = patch.start_date() {
            learner.start_date = start_date;
        }
        Ok(learner.clone())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
