use super::{AssessmentId, Cohort, CohortId, StudentId};
use crate::error::{GradebookError, Result};
use chrono::NaiveDate;
use std::fmt;

/// A graded event (test, exam, project) with a subject and a weight.
#[derive(Debug, Clone)]
pub struct Assessment {
    id: AssessmentId,
    pub name: String,
    pub date: NaiveDate,
    pub subject: String,
    pub weight: u32,
    cohort: Option<CohortId>,
}

impl Assessment {
    pub fn new(name: impl Into<String>, date: NaiveDate, subject: impl Into<String>) -> Self {
        Self::with_weight(name, date, subject, 1)
    }

    pub fn with_weight(
        name: impl Into<String>,
        date: NaiveDate,
        subject: impl Into<String>,
        weight: u32,
    ) -> Self {
        Self {
            id: AssessmentId::generate(),
            name: name.into(),
            date,
            subject: subject.into(),
            weight,
            cohort: None,
        }
    }

    pub fn id(&self) -> AssessmentId {
        self.id
    }

    pub fn cohort(&self) -> Option<CohortId> {
        self.cohort
    }

    pub(crate) fn attach(&mut self, cohort: CohortId) {
        debug_assert!(self.cohort.is_none(), "assessment attached twice");
        self.cohort = Some(cohort);
    }

    /// Scores recorded for this assessment, in student registration order.
    pub fn scores(&self, cohort: &Cohort) -> Result<Vec<(StudentId, f64)>> {
        if self.cohort != Some(cohort.id()) {
            return Err(GradebookError::MissingCohort(format!(
                "assessment {self} is not registered in {cohort}"
            )));
        }

        Ok(cohort
            .students()
            .iter()
            .filter_map(|student| student.score(self.id).map(|score| (student.id(), score)))
            .collect())
    }

    /// Plain arithmetic mean of every score recorded for this assessment.
    pub fn average_for_all_students(&self, cohort: &Cohort) -> Result<f64> {
        let scores = self.scores(cohort)?;
        if scores.is_empty() {
            return Err(GradebookError::NoScoresAvailable(format!(
                "no student has been scored on {self}"
            )));
        }

        let total: f64 = scores.iter().map(|(_, score)| score).sum();
        Ok(total / scores.len() as f64)
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (subject: {})", self.name, self.subject)
    }
}
