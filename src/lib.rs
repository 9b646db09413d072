//! In-memory grade book for class cohorts.
//!
//! A [`Cohort`] owns its [`Student`]s and [`Assessment`]s. Scores live on the
//! student, keyed by assessment id, and every average is computed on demand.

pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod roster;
pub mod types;

pub use error::{GradebookError, Result};
pub use model::{
    Assessment, AssessmentId, Cohort, CohortId, Ranked, RankingPolicy, Student, StudentId,
};
