mod ids;
mod learner;
mod progress;

pub use ids::LearnerId;
pub use learner::{Learner, LearnerError, LearnerPatch, NewLearner};
pub use progress::{
    week_status, WeekField, WeekProgress, WeekStatus, ASSESSMENT_COMPLETION_BAR,
};
