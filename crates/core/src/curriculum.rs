use thiserror::Error;

use crate::model::WeekProgress;

/// Number of weeks in the intensive program.
pub const PROGRAM_WEEKS: u8 = 7;

/// Module capacity per week in the production curriculum; week 7 is the
/// shorter capstone week.
pub const DEFAULT_WEEK_MODULE_TOTALS: [u32; PROGRAM_WEEKS as usize] = [5, 5, 5, 5, 5, 5, 4];

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurriculumError {
    #[error("curriculum must have at least one week")]
    EmptyWeeks,

    #[error("curriculum cannot have more than {} weeks", u8::MAX)]
    TooManyWeeks,
}

//
// ─── CURRICULUM ────────────────────────────────────────────────────────────────
//

/// Per-week module capacities for a cohort.
///
/// Used to synthesize the default zeroed progress scaffold for learners the
/// store has no progress rows for yet. A configuration value, so tests can
/// vary the week count and capacities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curriculum {
    week_module_totals: Vec<u32>,
}

impl Curriculum {
    /// Creates a curriculum from per-week module capacities.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` if the capacity list is empty or longer
    /// than a week number can address.
    pub fn new(week_module_totals: Vec<u32>) -> Result<Self, CurriculumError> {
        if week_module_totals.is_empty() {
            return Err(CurriculumError::EmptyWeeks);
        }
        if week_module_totals.len() > usize::from(u8::MAX) {
            return Err(CurriculumError::TooManyWeeks);
        }
        Ok(Self { week_module_totals })
    }

    /// The production 7-week bootcamp curriculum.
    #[must_use]
    pub fn default_bootcamp() -> Self {
        Self {
            week_module_totals: DEFAULT_WEEK_MODULE_TOTALS.to_vec(),
        }
    }

    /// Number of weeks covered.
    #[must_use]
    pub fn weeks(&self) -> u8 {
        u8::try_from(self.week_module_totals.len()).unwrap_or(u8::MAX)
    }

    /// Module capacity for a week (1-based), if the week exists.
    #[must_use]
    pub fn week_total(&self, week: u8) -> Option<u32> {
        if week == 0 {
            return None;
        }
        self.week_module_totals.get(usize::from(week) - 1).copied()
    }

    /// Total module count across all weeks.
    #[must_use]
    pub fn total_modules(&self) -> u32 {
        self.week_module_totals.iter().sum()
    }

    /// The default zeroed progress sequence, one entry per week.
    ///
    /// Clients synthesize this before editing a learner the store returned
    /// no progress rows for.
    #[must_use]
    pub fn scaffold(&self) -> Vec<WeekProgress> {
        self.week_module_totals
            .iter()
            .enumerate()
            .map(|(index, total)| {
                let week = u8::try_from(index + 1).unwrap_or(u8::MAX);
                WeekProgress::zeroed(week, *total)
            })
            .collect()
    }
}

//
// ─── TRACKS ────────────────────────────────────────────────────────────────────
//

/// One week of a career track's schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackWeek {
    pub week: u8,
    pub title: &'static str,
    pub meta: &'static str,
}

/// The two career tracks of the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Engineer,
    Architect,
}

impl Track {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Track::Engineer => "Agentic AI Engineer Track",
            Track::Architect => "AI Agentic Solution Architect Track",
        }
    }

    /// Week-by-week schedule for this track.
    #[must_use]
    pub fn weeks(&self) -> &'static [TrackWeek] {
        match self {
            Track::Engineer => &ENGINEER_TRACK,
            Track::Architect => &ARCHITECT_TRACK,
        }
    }
}

static ENGINEER_TRACK: [TrackWeek; PROGRAM_WEEKS as usize] = [
    TrackWeek {
        week: 1,
        title: "Foundations: Python & LLM Basics",
        meta: "6 hrs/day · Fundamentals, tooling, mental models",
    },
    TrackWeek {
        week: 2,
        title: "LLM APIs & Advanced Prompting",
        meta: "7 hrs/day · API usage, patterns, prompt libraries",
    },
    TrackWeek {
        week: 3,
        title: "AI Frameworks: LangChain & LlamaIndex",
        meta: "7 hrs/day · Chains, graphs, tools, context integration",
    },
    TrackWeek {
        week: 4,
        title: "RAG & Context Engineering",
        meta: "7 hrs/day · Retrieval quality, evals, hybrid search",
    },
    TrackWeek {
        week: 5,
        title: "Agent Orchestration & Advanced Patterns",
        meta: "7 hrs/day · Multi-agent systems, workflows, tools",
    },
    TrackWeek {
        week: 6,
        title: "Quality, Safety & Production Deployment",
        meta: "7 hrs/day · Guardrails, monitoring, rollout",
    },
    TrackWeek {
        week: 7,
        title: "Capstone Project & Certification",
        meta: "8 hrs/day · Final build & exam",
    },
];

static ARCHITECT_TRACK: [TrackWeek; PROGRAM_WEEKS as usize] = [
    TrackWeek {
        week: 1,
        title: "AI Architecture Foundations",
        meta: "6 hrs/day · Architecture fundamentals & agentic patterns",
    },
    TrackWeek {
        week: 2,
        title: "Vector Databases & Data Architecture",
        meta: "7 hrs/day · Embeddings, indexes, data pipelines",
    },
    TrackWeek {
        week: 3,
        title: "Cloud Infrastructure & IaC",
        meta: "7 hrs/day · Cloud design, IaC, scalability",
    },
    TrackWeek {
        week: 4,
        title: "Integration Patterns & APIs",
        meta: "7 hrs/day · APIs, integration, security",
    },
    TrackWeek {
        week: 5,
        title: "Cost Optimization & Risk Management",
        meta: "7 hrs/day · Cost modeling, caching, risk",
    },
    TrackWeek {
        week: 6,
        title: "Stakeholder Management & Documentation",
        meta: "7 hrs/day · Docs, diagrams, communication",
    },
    TrackWeek {
        week: 7,
        title: "Capstone Architecture Project",
        meta: "8 hrs/day · End-to-end architecture & presentation",
    },
];

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
