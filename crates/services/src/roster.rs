use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use tracing::warn;

use client::LearnerStore;
use cohort_core::{Curriculum, Learner, LearnerId, LearnerPatch, NewLearner, WeekField};

use crate::error::RosterError;

//
// ─── SYNC STATE ────────────────────────────────────────────────────────────────
//

/// Synchronization state of one roster record against the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Matches the last state the store acknowledged.
    Synced,
    /// A local optimistic mutation is applied and its persist is in flight.
    PendingWrite,
    /// A persist failed; the record is being restored from store truth.
    RollingBack,
}

struct RosterEntry {
    learner: Learner,
    state: SyncState,
}

impl RosterEntry {
    fn synced(learner: Learner) -> Self {
        Self {
            learner,
            state: SyncState::Synced,
        }
    }
}

struct RosterInner {
    entries: Vec<RosterEntry>,
    next_placeholder: i64,
}

impl RosterInner {
    fn position(&self, id: LearnerId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.learner.id == id)
    }

    fn entry_mut(&mut self, id: LearnerId) -> Result<&mut RosterEntry, RosterError> {
        self.entries
            .iter_mut()
            .find(|entry| entry.learner.id == id)
            .ok_or(RosterError::UnknownLearner(id))
    }

    fn replace_all(&mut self, learners: Vec<Learner>) {
        self.entries = learners.into_iter().map(RosterEntry::synced).collect();
    }

    /// Overwrite the record with store truth, or append it if a concurrent
    /// reload dropped it. Latest response wins.
    fn adopt(&mut self, learner: Learner) {
        match self.position(learner.id) {
            Some(index) => self.entries[index] = RosterEntry::synced(learner),
            None => self.entries.push(RosterEntry::synced(learner)),
        }
    }
}

//
// ─── ROSTER SERVICE ────────────────────────────────────────────────────────────
//

/// Client-side working copy of the cohort.
///
/// Applies edits optimistically for responsiveness, persists them through
/// the store, and reconciles each record against the store's authoritative
/// response — rolling back whatever the store never acknowledged. The record
/// lock is held only for synchronous state changes, never across an await,
/// so edits to other learners proceed while one write is in flight.
#[derive(Clone)]
pub struct RosterService {
    store: Arc<dyn LearnerStore>,
    curriculum: Curriculum,
    inner: Arc<Mutex<RosterInner>>,
}

impl RosterService {
    #[must_use]
    pub fn new(store: Arc<dyn LearnerStore>, curriculum: Curriculum) -> Self {
        Self {
            store,
            curriculum,
            inner: Arc::new(Mutex::new(RosterInner {
                entries: Vec::new(),
                next_placeholder: -1,
            })),
        }
    }

    #[must_use]
    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    fn lock(&self) -> Result<MutexGuard<'_, RosterInner>, RosterError> {
        self.inner
            .lock()
            .map_err(|e| RosterError::Unavailable(e.to_string()))
    }

    /// Snapshot of all learner records in roster order.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::Unavailable` if the roster lock is poisoned.
    pub fn learners(&self) -> Result<Vec<Learner>, RosterError> {
        let inner = self.lock()?;
        Ok(inner.entries.iter().map(|e| e.learner.clone()).collect())
    }

    /// Snapshot of one learner record.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::Unavailable` if the roster lock is poisoned.
    pub fn learner(&self, id: LearnerId) -> Result<Option<Learner>, RosterError> {
        let inner = self.lock()?;
        Ok(inner
            .entries
            .iter()
            .find(|e| e.learner.id == id)
            .map(|e| e.learner.clone()))
    }

    /// Current sync state of one learner record.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::Unavailable` if the roster lock is poisoned.
    pub fn sync_state(&self, id: LearnerId) -> Result<Option<SyncState>, RosterError> {
        let inner = self.lock()?;
        Ok(inner
            .entries
            .iter()
            .find(|e| e.learner.id == id)
            .map(|e| e.state))
    }

    /// Fetch the full learner list and replace local state wholesale.
    ///
    /// Concurrent loads are not coalesced; the last response wins.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::Store` if the list request fails; local state
    /// is left as it was.
    pub async fn load(&self) -> Result<usize, RosterError> {
        let learners = self.store.list_learners().await?;
        let mut inner = self.lock()?;
        inner.replace_all(learners);
        Ok(inner.entries.len())
    }

    /// Create a learner from identity fields.
    ///
    /// The record appears immediately under a placeholder id and is
    /// replaced in place by the store's record once acknowledged. On
    /// failure the provisional record is removed again.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::Learner` if the identity fields do not
    /// validate (nothing is inserted and no request is made), or
    /// `RosterError::Store` if the store rejects the create.
    pub async fn create(
        &self,
        name: impl Into<String>,
        source_role: impl Into<String>,
        target_role: impl Into<String>,
        start_week: Option<u8>,
        start_date: Option<NaiveDate>,
    ) -> Result<Learner, RosterError> {
        let draft = NewLearner::new(name, source_role, target_role, start_week, start_date)?;

        let placeholder_id = {
            let mut inner = self.lock()?;
            let id = LearnerId::new(inner.next_placeholder);
            inner.next_placeholder -= 1;
            inner.entries.push(RosterEntry {
                learner: provisional_learner(id, &draft, &self.curriculum),
                state: SyncState::PendingWrite,
            });
            id
        };

        match self.store.create_learner(&draft).await {
            Ok(created) => {
                let mut inner = self.lock()?;
                match inner.position(placeholder_id) {
                    Some(index) => inner.entries[index] = RosterEntry::synced(created.clone()),
                    None => inner.adopt(created.clone()),
                }
                Ok(created)
            }
            Err(err) => {
                warn!(%placeholder_id, error = %err, "create not acknowledged; removing provisional learner");
                let mut inner = self.lock()?;
                if let Some(index) = inner.position(placeholder_id) {
                    inner.entries.remove(index);
                }
                Err(err.into())
            }
        }
    }

    /// Delete a learner.
    ///
    /// Callers are expected to have confirmed the deletion with the user.
    /// The local record is removed only after the store acknowledges — a
    /// failed delete must not silently drop data from view.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::UnknownLearner` if the id is not in the
    /// roster, `RosterError::WriteInFlight` if another write for this
    /// learner is pending, or `RosterError::Store` if the delete is not
    /// acknowledged (the record stays visible).
    pub async fn remove(&self, id: LearnerId) -> Result<(), RosterError> {
        {
            let mut inner = self.lock()?;
            let entry = inner.entry_mut(id)?;
            if entry.state != SyncState::Synced {
                return Err(RosterError::WriteInFlight(id));
            }
            entry.state = SyncState::PendingWrite;
        }

        match self.store.delete_learner(id).await {
            Ok(()) => {
                let mut inner = self.lock()?;
                if let Some(index) = inner.position(id) {
                    inner.entries.remove(index);
                }
                Ok(())
            }
            Err(err) => {
                warn!(%id, error = %err, "delete not acknowledged; keeping learner visible");
                let mut inner = self.lock()?;
                if let Ok(entry) = inner.entry_mut(id) {
                    entry.state = SyncState::Synced;
                }
                Err(err.into())
            }
        }
    }

    /// Overwrite one counter of one week and persist the whole sequence.
    ///
    /// The raw value is clamped, never rejected. If the learner has no
    /// progress rows yet, the curriculum's zeroed scaffold is synthesized
    /// first. The edit is applied locally right away; on acknowledgment the
    /// record is overwritten with the store's response (the only path that
    /// refreshes the aggregate mirror), and on failure the roster reloads
    /// so it never displays a value the store never agreed to.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::UnknownLearner` / `RosterError::UnknownWeek`
    /// for a bad target (no mutation, no request),
    /// `RosterError::WriteInFlight` if another write for this learner is
    /// pending, or `RosterError::Store` if the persist fails.
    pub async fn update_week(
        &self,
        id: LearnerId,
        week: u8,
        field: WeekField,
        raw_value: i64,
    ) -> Result<Learner, RosterError> {
        let (snapshot, new_progress) = {
            let mut inner = self.lock()?;
            let curriculum = &self.curriculum;
            let entry = inner.entry_mut(id)?;
            if entry.state != SyncState::Synced {
                return Err(RosterError::WriteInFlight(id));
            }

            let mut progress = if entry.learner.progress.is_empty() {
                curriculum.scaffold()
            } else {
                entry.learner.progress.clone()
            };
            let Some(target) = progress.iter_mut().find(|p| p.week == week) else {
                return Err(RosterError::UnknownWeek(week));
            };
            target.set_field(field, raw_value);

            let snapshot = entry.learner.clone();
            entry.learner.progress = progress.clone();
            entry.state = SyncState::PendingWrite;
            (snapshot, progress)
        };

        match self.store.replace_progress(id, &new_progress).await {
            Ok(updated) => {
                let mut inner = self.lock()?;
                inner.adopt(updated.clone());
                Ok(updated)
            }
            Err(err) => {
                warn!(%id, week, %field, error = %err, "progress write not acknowledged; rolling back");
                self.rollback_with_reload(id, snapshot).await?;
                Err(err.into())
            }
        }
    }

    /// Set or clear a learner's start date via the store's patch endpoint.
    ///
    /// Follows the same optimistic discipline as [`Self::update_week`].
    ///
    /// # Errors
    ///
    /// Returns `RosterError::UnknownLearner`, `RosterError::WriteInFlight`,
    /// or `RosterError::Store` as for week updates.
    pub async fn set_start_date(
        &self,
        id: LearnerId,
        start_date: Option<NaiveDate>,
    ) -> Result<Learner, RosterError> {
        let patch = match start_date {
            Some(date) => LearnerPatch::set_start_date(date),
            None => LearnerPatch::clear_start_date(),
        };

        let snapshot = {
            let mut inner = self.lock()?;
            let entry = inner.entry_mut(id)?;
            if entry.state != SyncState::Synced {
                return Err(RosterError::WriteInFlight(id));
            }
            let snapshot = entry.learner.clone();
            entry.learner.start_date = start_date;
            entry.state = SyncState::PendingWrite;
            snapshot
        };

        match self.store.patch_learner(id, &patch).await {
            Ok(updated) => {
                let mut inner = self.lock()?;
                inner.adopt(updated.clone());
                Ok(updated)
            }
            Err(err) => {
                warn!(%id, error = %err, "field patch not acknowledged; rolling back");
                self.rollback_with_reload(id, snapshot).await?;
                Err(err.into())
            }
        }
    }

    /// Restore the failed record from its pre-edit snapshot, then reload
    /// everything from the store. The snapshot restore comes first so that
    /// even a failed reload leaves nothing unacknowledged on display.
    async fn rollback_with_reload(
        &self,
        id: LearnerId,
        snapshot: Learner,
    ) -> Result<(), RosterError> {
        {
            let mut inner = self.lock()?;
            if let Ok(entry) = inner.entry_mut(id) {
                entry.learner = snapshot;
                entry.state = SyncState::RollingBack;
            }
        }

        match self.store.list_learners().await {
            Ok(learners) => {
                let mut inner = self.lock()?;
                inner.replace_all(learners);
            }
            Err(reload_err) => {
                warn!(%id, error = %reload_err, "reload after failed write also failed; keeping last synced snapshot");
                let mut inner = self.lock()?;
                if let Ok(entry) = inner.entry_mut(id) {
                    entry.state = SyncState::Synced;
                }
            }
        }
        Ok(())
    }
}

fn provisional_learner(id: LearnerId, draft: &NewLearner, curriculum: &Curriculum) -> Learner {
    Learner {
        id,
        name: draft.name().to_owned(),
        source_role: draft.source_role().to_owned(),
        target_role: draft.target_role().to_owned(),
        start_week: draft.start_week(),
        start_date: draft.start_date(),
        progress: curriculum.scaffold(),
        overall_modules_completed: 0,
        // mirror the denominator the store will compute for a fresh learner
        overall_modules_total: curriculum.total_modules(),
        overall_progress_pct: 0.0,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
