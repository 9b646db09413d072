pub mod assessment;
pub mod cohort;
pub mod student;

pub use assessment::Assessment;
pub use cohort::{Cohort, Ranked, RankingPolicy};
pub use student::Student;

use std::fmt;
use uuid::Uuid;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 20.0;

pub fn is_valid_score(score: f64) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&score)
}

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Uuid);

        impl $name {
            pub(crate) fn generate() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(CohortId);
entity_id!(StudentId);
entity_id!(AssessmentId);
