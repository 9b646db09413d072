use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradebookError {
    #[error("assessment not registered in cohort: {0}")]
    AssessmentNotInCohort(String),

    #[error("assessment already scored: {0}")]
    AssessmentAlreadyScored(String),

    #[error("assessment not yet scored: {0}")]
    AssessmentNotYetScored(String),

    #[error("score out of range [0, 20]: {0}")]
    ScoreOutOfRange(f64),

    #[error("student already in cohort: {0}")]
    StudentAlreadyInCohort(String),

    #[error("student belongs to another cohort: {0}")]
    StudentInAnotherCohort(String),

    #[error("student not registered in cohort: {0}")]
    StudentNotInCohort(String),

    #[error("assessment already in cohort: {0}")]
    AssessmentAlreadyInCohort(String),

    #[error("assessment belongs to another cohort: {0}")]
    AssessmentInAnotherCohort(String),

    #[error("no scores available: {0}")]
    NoScoresAvailable(String),

    #[error("not registered in any cohort: {0}")]
    MissingCohort(String),

    #[error("roster file not found: {0}")]
    RosterNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GradebookError>;
