use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::curriculum::PROGRAM_WEEKS;
use crate::model::ids::LearnerId;
use crate::model::progress::WeekProgress;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LearnerError {
    #[error("learner name cannot be empty")]
    EmptyName,

    #[error("source role cannot be empty")]
    EmptySourceRole,

    #[error("target role cannot be empty")]
    EmptyTargetRole,

    #[error("start week must be between 1 and {PROGRAM_WEEKS}")]
    InvalidStartWeek,
}

//
// ─── LEARNER ───────────────────────────────────────────────────────────────────
//

/// A tracked participant, mirroring the store's wire shape.
///
/// The `overall_*` aggregates are computed and owned by the remote store;
/// local copies are a mirror that may be stale between an optimistic edit
/// and the store's acknowledgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Learner {
    pub id: LearnerId,
    pub name: String,
    pub source_role: String,
    pub target_role: String,
    pub start_week: u8,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub progress: Vec<WeekProgress>,
    #[serde(default)]
    pub overall_modules_completed: u32,
    #[serde(default)]
    pub overall_modules_total: u32,
    #[serde(default)]
    pub overall_progress_pct: f64,
}

//
// ─── CREATE DRAFT ──────────────────────────────────────────────────────────────
//

/// Identity fields for a learner that does not exist in the store yet.
///
/// Serializes as the create-request body; the store assigns the id and the
/// zeroed progress scaffold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLearner {
    name: String,
    source_role: String,
    target_role: String,
    start_week: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<NaiveDate>,
}

impl NewLearner {
    /// Validates the identity fields for a create request.
    ///
    /// A missing `start_week` defaults to 1.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError` if any identity field is empty or
    /// whitespace-only, or the start week falls outside the program.
    pub fn new(
        name: impl Into<String>,
        source_role: impl Into<String>,
        target_role: impl Into<String>,
        start_week: Option<u8>,
        start_date: Option<NaiveDate>,
    ) -> Result<Self, LearnerError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(LearnerError::EmptyName);
        }
        let source_role = source_role.into().trim().to_owned();
        if source_role.is_empty() {
            return Err(LearnerError::EmptySourceRole);
        }
        let target_role = target_role.into().trim().to_owned();
        if target_role.is_empty() {
            return Err(LearnerError::EmptyTargetRole);
        }

        let start_week = start_week.unwrap_or(1);
        if !(1..=PROGRAM_WEEKS).contains(&start_week) {
            return Err(LearnerError::InvalidStartWeek);
        }

        Ok(Self {
            name,
            source_role,
            target_role,
            start_week,
            start_date,
        })
    }

    // Accessors
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn source_role(&self) -> &str {
        &self.source_role
    }

    #[must_use]
    pub fn target_role(&self) -> &str {
        &self.target_role
    }

    #[must_use]
    pub fn start_week(&self) -> u8 {
        self.start_week
    }

    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }
}

//
// ─── FIELD PATCH ───────────────────────────────────────────────────────────────
//

/// Partial update for learner fields sent to the store's PATCH endpoint.
///
/// Distinguishes "leave the field alone" (omitted from the body) from
/// "set to null" (explicit null), hence the nested `Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LearnerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<Option<NaiveDate>>,
}

impl LearnerPatch {
    /// A patch setting the start date to the given day.
    #[must_use]
    pub fn set_start_date(date: NaiveDate) -> Self {
        Self {
            start_date: Some(Some(date)),
        }
    }

    /// A patch clearing the start date.
    #[must_use]
    pub fn clear_start_date() -> Self {
        Self {
            start_date: Some(None),
        }
    }

    #[must_use]
    pub fn start_date(&self) -> Option<Option<NaiveDate>> {
        self.start_date
    }

    /// True when the patch would not change anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
