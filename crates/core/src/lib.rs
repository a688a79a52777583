#![forbid(unsafe_code)]

pub mod curriculum;
pub mod model;

pub use curriculum::{Curriculum, CurriculumError, Track, TrackWeek, PROGRAM_WEEKS};
pub use model::{
    week_status, Learner, LearnerError, LearnerId, LearnerPatch, NewLearner, WeekField,
    WeekProgress, WeekStatus, ASSESSMENT_COMPLETION_BAR,
};
