use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use client::{InMemoryLearnerStore, LearnerStore, StoreError};
use cohort_core::{
    Curriculum, Learner, LearnerId, LearnerPatch, NewLearner, WeekField, WeekProgress,
};
use services::{RosterError, RosterService, SyncState};

fn draft(name: &str) -> NewLearner {
    NewLearner::new(name, "Software Engineer", "Agentic AI Engineer", Some(1), None).unwrap()
}

fn roster_with_store() -> (RosterService, Arc<InMemoryLearnerStore>) {
    let store = Arc::new(InMemoryLearnerStore::default());
    let roster = RosterService::new(store.clone(), Curriculum::default_bootcamp());
    (roster, store)
}

#[tokio::test]
async fn failed_create_removes_the_provisional_record() {
    let (roster, store) = roster_with_store();

    store.fail_next();
    let err = roster
        .create("Avery", "Software Engineer", "Agentic AI Engineer", Some(1), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RosterError::Store(StoreError::Remote { status: 500, .. })));

    // no record with a placeholder id remains, and nothing reached the store
    assert!(roster.learners().unwrap().is_empty());
    assert!(store.list_learners().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_update_reloads_the_last_confirmed_state() {
    let (roster, store) = roster_with_store();
    let learner = roster
        .create("Avery", "SE", "AI Engineer", Some(1), None)
        .await
        .unwrap();

    // confirmed value: 3 modules in week 1
    roster
        .update_week(learner.id, 1, WeekField::ModulesCompleted, 3)
        .await
        .unwrap();

    store.fail_next();
    let err = roster
        .update_week(learner.id, 1, WeekField::ModulesCompleted, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, RosterError::Store(_)));

    // the unconfirmed 5 is gone; the roster shows the store's last word
    let local = roster.learner(learner.id).unwrap().unwrap();
    assert_eq!(local.progress[0].modules_completed, 3);
    assert_eq!(roster.sync_state(learner.id).unwrap(), Some(SyncState::Synced));
}

#[tokio::test]
async fn rollback_survives_a_failing_reload() {
    let (roster, store) = roster_with_store();
    let learner = roster
        .create("Avery", "SE", "AI Engineer", Some(1), None)
        .await
        .unwrap();
    roster
        .update_week(learner.id, 2, WeekField::AssessmentPct, 40)
        .await
        .unwrap();

    // the persist fails, and so does the reload after it
    store.fail_requests(2);
    let err = roster
        .update_week(learner.id, 2, WeekField::AssessmentPct, 90)
        .await
        .unwrap_err();
    assert!(matches!(err, RosterError::Store(_)));

    let local = roster.learner(learner.id).unwrap().unwrap();
    assert_eq!(local.progress[1].assessment_pct, 40);
    assert_eq!(roster.sync_state(learner.id).unwrap(), Some(SyncState::Synced));
}

#[tokio::test]
async fn repeating_an_update_is_idempotent() {
    let (roster, store) = roster_with_store();
    let learner = roster
        .create("Avery", "SE", "AI Engineer", Some(1), None)
        .await
        .unwrap();

    let first = roster
        .update_week(learner.id, 4, WeekField::ModulesCompleted, 2)
        .await
        .unwrap();
    let second = roster
        .update_week(learner.id, 4, WeekField::ModulesCompleted, 2)
        .await
        .unwrap();

    assert_eq!(first, second);
    let stored = store.list_learners().await.unwrap();
    assert_eq!(stored[0], second);
}

#[tokio::test]
async fn service_clamps_raw_values_at_both_bounds() {
    let (roster, _store) = roster_with_store();
    let learner = roster
        .create("Avery", "SE", "AI Engineer", Some(1), None)
        .await
        .unwrap();

    let updated = roster
        .update_week(learner.id, 1, WeekField::ModulesCompleted, 99)
        .await
        .unwrap();
    assert_eq!(updated.progress[0].modules_completed, 5);

    let updated = roster
        .update_week(learner.id, 1, WeekField::ModulesCompleted, -7)
        .await
        .unwrap();
    assert_eq!(updated.progress[0].modules_completed, 0);

    let updated = roster
        .update_week(learner.id, 7, WeekField::ModulesCompleted, 99)
        .await
        .unwrap();
    assert_eq!(updated.progress[6].modules_completed, 4);

    let updated = roster
        .update_week(learner.id, 3, WeekField::AssessmentPct, 250)
        .await
        .unwrap();
    assert_eq!(updated.progress[2].assessment_pct, 100);

    let updated = roster
        .update_week(learner.id, 3, WeekField::AssessmentPct, -1)
        .await
        .unwrap();
    assert_eq!(updated.progress[2].assessment_pct, 0);
}

#[tokio::test]
async fn editing_a_learner_without_progress_scaffolds_the_default_weeks() {
    let (roster, store) = roster_with_store();
    // the store holds a learner that predates progress tracking
    store.seed(Learner {
        id: LearnerId::new(10),
        name: "Sasha".into(),
        source_role: "Solution Architect".into(),
        target_role: "AI Agentic Solution Architect".into(),
        start_week: 2,
        start_date: None,
        progress: Vec::new(),
        overall_modules_completed: 0,
        overall_modules_total: 0,
        overall_progress_pct: 0.0,
    });
    roster.load().await.unwrap();

    let updated = roster
        .update_week(LearnerId::new(10), 3, WeekField::ModulesCompleted, 2)
        .await
        .unwrap();

    assert_eq!(updated.progress.len(), 7);
    let totals: Vec<u32> = updated.progress.iter().map(|w| w.total_modules).collect();
    assert_eq!(totals, vec![5, 5, 5, 5, 5, 5, 4]);
    assert_eq!(updated.progress[2].modules_completed, 2);
    // untouched weeks stay zeroed
    assert_eq!(updated.progress[0].modules_completed, 0);
    assert_eq!(updated.progress[6].assessment_pct, 0);
}

#[tokio::test]
async fn round_trip_preserves_everything_but_the_aggregates() {
    let (roster, _store) = roster_with_store();
    let learner = roster
        .create("Avery", "SE", "AI Engineer", Some(1), None)
        .await
        .unwrap();

    roster
        .update_week(learner.id, 1, WeekField::ModulesCompleted, 5)
        .await
        .unwrap();
    roster
        .update_week(learner.id, 1, WeekField::AssessmentPct, 80)
        .await
        .unwrap();
    let sent = roster.learner(learner.id).unwrap().unwrap();

    roster.load().await.unwrap();
    let listed = roster.learner(learner.id).unwrap().unwrap();

    assert_eq!(listed.progress, sent.progress);
    // the aggregates came back recomputed by the store, not echoed
    assert_eq!(listed.overall_modules_completed, 5);
    assert_eq!(listed.overall_modules_total, 34);
    assert!((listed.overall_progress_pct - 5.0 * 100.0 / 34.0).abs() < 1e-9);
}

#[tokio::test]
async fn delete_keeps_the_record_until_the_store_acknowledges() {
    let (roster, store) = roster_with_store();
    let learner = roster
        .create("Avery", "SE", "AI Engineer", Some(1), None)
        .await
        .unwrap();

    store.fail_next();
    let err = roster.remove(learner.id).await.unwrap_err();
    assert!(matches!(err, RosterError::Store(_)));
    assert_eq!(roster.learners().unwrap().len(), 1);
    assert_eq!(roster.sync_state(learner.id).unwrap(), Some(SyncState::Synced));

    roster.remove(learner.id).await.unwrap();
    assert!(roster.learners().unwrap().is_empty());
    assert!(store.list_learners().await.unwrap().is_empty());
}

//
// ─── IN-FLIGHT GUARD ───────────────────────────────────────────────────────────
//

/// Store that parks progress writes for one learner until released, so
/// tests can observe the roster mid-write.
struct GatedStore {
    inner: Arc<InMemoryLearnerStore>,
    gate: Notify,
    gated: LearnerId,
}

#[async_trait]
impl LearnerStore for GatedStore {
    async fn list_learners(&self) -> Result<Vec<Learner>, StoreError> {
        self.inner.list_learners().await
    }

    async fn create_learner(&self, new: &NewLearner) -> Result<Learner, StoreError> {
        self.inner.create_learner(new).await
    }

    async fn delete_learner(&self, id: LearnerId) -> Result<(), StoreError> {
        self.inner.delete_learner(id).await
    }

    async fn replace_progress(
        &self,
        id: LearnerId,
        progress: &[WeekProgress],
    ) -> Result<Learner, StoreError> {
        if id == self.gated {
            self.gate.notified().await;
        }
        self.inner.replace_progress(id, progress).await
    }

    async fn patch_learner(
        &self,
        id: LearnerId,
        patch: &LearnerPatch,
    ) -> Result<Learner, StoreError> {
        self.inner.patch_learner(id, patch).await
    }
}

#[tokio::test]
async fn overlapping_writes_to_one_learner_fail_fast_without_blocking_others() {
    let backing = Arc::new(InMemoryLearnerStore::default());
    let avery = backing.create_learner(&draft("Avery")).await.unwrap();
    let blake = backing.create_learner(&draft("Blake")).await.unwrap();

    let store = Arc::new(GatedStore {
        inner: backing,
        gate: Notify::new(),
        gated: avery.id,
    });
    let roster = RosterService::new(store.clone(), Curriculum::default_bootcamp());
    roster.load().await.unwrap();

    let parked = tokio::spawn({
        let roster = roster.clone();
        async move {
            roster
                .update_week(avery.id, 1, WeekField::ModulesCompleted, 2)
                .await
        }
    });

    // let the spawned write reach the gate
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(
        roster.sync_state(avery.id).unwrap(),
        Some(SyncState::PendingWrite)
    );

    // a second write to the same learner fails fast
    let err = roster
        .update_week(avery.id, 2, WeekField::ModulesCompleted, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, RosterError::WriteInFlight(id) if id == avery.id));

    // a write to a different learner proceeds while the first is in flight
    let updated = roster
        .update_week(blake.id, 1, WeekField::ModulesCompleted, 3)
        .await
        .unwrap();
    assert_eq!(updated.progress[0].modules_completed, 3);

    store.gate.notify_one();
    let settled = parked.await.unwrap().unwrap();
    assert_eq!(settled.progress[0].modules_completed, 2);
    assert_eq!(roster.sync_state(avery.id).unwrap(), Some(SyncState::Synced));
}
