use super::{is_valid_score, Assessment, AssessmentId, CohortId, StudentId};
use crate::error::{GradebookError, Result};
use chrono::NaiveDate;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Student {
    id: StudentId,
    pub last_name: String,
    pub first_name: String,
    pub birth_date: NaiveDate,
    pub gender: String,
    cohort: Option<CohortId>,
    scores: Vec<(AssessmentId, f64)>,
}

impl Student {
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        birth_date: NaiveDate,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            id: StudentId::generate(),
            last_name: last_name.into(),
            first_name: first_name.into(),
            birth_date,
            gender: gender.into(),
            cohort: None,
            scores: Vec::new(),
        }
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn cohort(&self) -> Option<CohortId> {
        self.cohort
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }

    pub(crate) fn attach(&mut self, cohort: CohortId) {
        debug_assert!(self.cohort.is_none(), "student attached twice");
        self.cohort = Some(cohort);
    }

    /// Scores in the order they were recorded.
    pub fn scores(&self) -> &[(AssessmentId, f64)] {
        &self.scores
    }

    pub fn score(&self, assessment: AssessmentId) -> Option<f64> {
        self.slot(assessment).map(|index| self.scores[index].1)
    }

    fn slot(&self, assessment: AssessmentId) -> Option<usize> {
        self.scores.iter().position(|(id, _)| *id == assessment)
    }

    /// Callers run `require_cohort` first, so `self.cohort` is set here.
    fn find<'a>(&self, registered: &'a [Assessment], id: AssessmentId) -> Result<&'a Assessment> {
        match registered.iter().find(|assessment| assessment.id() == id) {
            Some(assessment) if assessment.cohort() == self.cohort => Ok(assessment),
            Some(assessment) => Err(GradebookError::AssessmentNotInCohort(format!(
                "{assessment} for student {self}"
            ))),
            None => Err(GradebookError::AssessmentNotInCohort(id.to_string())),
        }
    }

    fn require_cohort(&self) -> Result<()> {
        match self.cohort {
            Some(_) => Ok(()),
            None => Err(GradebookError::MissingCohort(format!("student {self}"))),
        }
    }

    /// `registered` is the owning cohort's assessment list.
    pub fn add_score(
        &mut self,
        registered: &[Assessment],
        assessment: AssessmentId,
        score: f64,
    ) -> Result<()> {
        self.require_cohort()?;
        let target = self.find(registered, assessment)?;
        if self.slot(assessment).is_some() {
            return Err(GradebookError::AssessmentAlreadyScored(format!(
                "{target} for student {self}"
            )));
        }
        if !is_valid_score(score) {
            return Err(GradebookError::ScoreOutOfRange(score));
        }

        debug!(student = %self, assessment = %target, score, "score recorded");
        self.scores.push((assessment, score));
        Ok(())
    }

    /// The range check only applies once the assessment is known to be scored,
    /// so an unscored assessment reports `AssessmentNotYetScored` whatever the value.
    pub fn modify_score(
        &mut self,
        registered: &[Assessment],
        assessment: AssessmentId,
        score: f64,
    ) -> Result<()> {
        self.require_cohort()?;
        let slot = self.slot(assessment);
        if slot.is_some() && !is_valid_score(score) {
            return Err(GradebookError::ScoreOutOfRange(score));
        }
        let target = self.find(registered, assessment)?;
        let Some(index) = slot else {
            return Err(GradebookError::AssessmentNotYetScored(format!(
                "{target} for student {self}"
            )));
        };

        debug!(
            student = %self,
            assessment = %target,
            previous = self.scores[index].1,
            score,
            "score modified"
        );
        self.scores[index].1 = score;
        Ok(())
    }

    /// Weighted mean `Σ(score × weight) / Σ(weight)`, restricted to `subject` when given.
    pub fn average(&self, registered: &[Assessment], subject: Option<&str>) -> Result<f64> {
        self.require_cohort()?;

        let mut total_points = 0.0;
        let mut total_weight: u64 = 0;
        let mut counted = 0usize;
        for (id, score) in &self.scores {
            let assessment = self.find(registered, *id)?;
            if subject.is_some_and(|subject| assessment.subject != subject) {
                continue;
            }
            counted += 1;
            total_points += score * f64::from(assessment.weight);
            total_weight += u64::from(assessment.weight);
        }

        if counted == 0 {
            return Err(match subject {
                Some(subject) => GradebookError::NoScoresAvailable(format!(
                    "student {self} has no score in subject {subject}"
                )),
                None => GradebookError::NoScoresAvailable(format!("student {self} has no score")),
            });
        }
        if total_weight == 0 {
            return Err(GradebookError::NoScoresAvailable(format!(
                "student {self} only has zero-weight scores"
            )));
        }

        Ok(total_points / total_weight as f64)
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.last_name, self.first_name)
    }
}
