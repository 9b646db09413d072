use crate::error::{GradebookError, Result};
use crate::model::{Cohort, RankingPolicy};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CohortReport {
    pub cohort: String,
    pub year: i32,
    pub teacher: String,
    pub overall_average: Option<f64>,
    pub subjects: Vec<SubjectSummary>,
    pub assessments: Vec<AssessmentSummary>,
    pub ranking: Vec<RankingRow>,
    pub unscored: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectSummary {
    pub subject: String,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentSummary {
    pub name: String,
    pub subject: String,
    pub date: String,
    pub weight: u32,
    pub scored: usize,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingRow {
    pub rank: usize,
    pub student: String,
    pub average: f64,
}

/// `NoScoresAvailable` becomes `None`; any other error is returned.
fn optional(result: Result<f64>) -> Result<Option<f64>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(GradebookError::NoScoresAvailable(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

impl CohortReport {
    pub fn build(cohort: &Cohort, policy: RankingPolicy) -> Result<Self> {
        let overall_average = optional(cohort.average(None))?;

        let mut subjects = Vec::new();
        for subject in cohort.subjects() {
            let average = optional(cohort.average(Some(subject.as_str())))?;
            subjects.push(SubjectSummary { subject, average });
        }

        let mut assessments = Vec::new();
        for assessment in cohort.assessments() {
            assessments.push(AssessmentSummary {
                name: assessment.name.clone(),
                subject: assessment.subject.clone(),
                date: assessment.date.format("%Y-%m-%d").to_string(),
                weight: assessment.weight,
                scored: assessment.scores(cohort)?.len(),
                average: optional(assessment.average_for_all_students(cohort))?,
            });
        }

        let ranking = cohort
            .ranking_with(policy)?
            .into_iter()
            .map(|entry| RankingRow {
                rank: entry.rank,
                student: entry.student.to_string(),
                average: entry.average,
            })
            .collect();

        let unscored = cohort
            .students()
            .iter()
            .filter(|student| student.scores().is_empty())
            .map(ToString::to_string)
            .collect();

        Ok(Self {
            cohort: cohort.name.clone(),
            year: cohort.year,
            teacher: cohort.teacher.clone(),
            overall_average,
            subjects,
            assessments,
            ranking,
            unscored,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.unscored.is_empty()
    }
}
