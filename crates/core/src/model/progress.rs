use serde::{Deserialize, Serialize};
use std::fmt;

/// Uniform assessment bar a week must clear to count as completed.
///
/// Independent of the per-week passing scores shown in the schedule copy;
/// the aggregator applies one bar across all weeks.
pub const ASSESSMENT_COMPLETION_BAR: u32 = 70;

/// One week's completion counters for a learner.
///
/// Mirrors the store's wire shape; counters are kept in range by clamping
/// on edit, never by rejecting input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekProgress {
    pub week: u8,
    pub modules_completed: u32,
    pub total_modules: u32,
    pub assessment_pct: u32,
}

impl WeekProgress {
    /// A zeroed week with the given module capacity.
    #[must_use]
    pub fn zeroed(week: u8, total_modules: u32) -> Self {
        Self {
            week,
            modules_completed: 0,
            total_modules,
            assessment_pct: 0,
        }
    }

    /// Overwrite one counter, clamping the raw value to its legal range:
    /// `modules_completed` to `[0, total_modules]`, `assessment_pct` to `[0, 100]`.
    pub fn set_field(&mut self, field: WeekField, raw: i64) {
        match field {
            WeekField::ModulesCompleted => {
                self.modules_completed = clamp_counter(raw, self.total_modules);
            }
            WeekField::AssessmentPct => {
                self.assessment_pct = clamp_counter(raw, 100);
            }
        }
    }
}

fn clamp_counter(raw: i64, max: u32) -> u32 {
    let clamped = raw.clamp(0, i64::from(max));
    u32::try_from(clamped).unwrap_or(max)
}

/// The two editable counters of a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekField {
    ModulesCompleted,
    AssessmentPct,
}

impl fmt::Display for WeekField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekField::ModulesCompleted => write!(f, "modules_completed"),
            WeekField::AssessmentPct => write!(f, "assessment_pct"),
        }
    }
}

/// Display status of one week of one learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekStatus {
    Skipped,
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for WeekStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStatus::Skipped => write!(f, "Skipped"),
            WeekStatus::NotStarted => write!(f, "Not started"),
            WeekStatus::InProgress => write!(f, "In progress"),
            WeekStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Derive the display status for one week, first match wins:
///
/// 1. `Skipped` for weeks before the learner's start week;
/// 2. `NotStarted` while both counters are zero;
/// 3. `Completed` once all modules are done and the assessment clears
///    [`ASSESSMENT_COMPLETION_BAR`];
/// 4. `InProgress` otherwise.
///
/// Total over well-formed input; the store is trusted to supply sane
/// `total_modules`.
#[must_use]
pub fn week_status(start_week: u8, week: &WeekProgress) -> WeekStatus {
    if week.week < start_week {
        return WeekStatus::Skipped;
    }
    if week.modules_completed == 0 && week.assessment_pct == 0 {
        return WeekStatus::NotStarted;
    }
    if week.modules_completed >= week.total_modules
        && week.assessment_pct >= ASSESSMENT_COMPLETION_BAR
    {
        return WeekStatus::Completed;
    }
    WeekStatus::InProgress
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
