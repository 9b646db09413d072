use crate::error::GradebookError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use toml::{Table, Value};

/// On-disk description of one cohort.
#[derive(Debug, Clone, Deserialize)]
pub struct Roster {
    pub cohort: CohortEntry,
    #[serde(default)]
    pub assessments: Vec<AssessmentEntry>,
    #[serde(default)]
    pub students: Vec<StudentEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CohortEntry {
    pub name: String,
    pub year: i32,
    pub teacher: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentEntry {
    pub key: String,
    pub name: String,
    pub date: NaiveDate,
    pub subject: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudentEntry {
    pub last_name: String,
    pub first_name: String,
    pub birth_date: NaiveDate,
    pub gender: String,
    /// Assessment key to score, kept in file order.
    #[serde(default)]
    pub scores: Table,
    /// Overrides applied after `scores`, e.g. after a re-marking.
    #[serde(default)]
    pub corrections: Table,
}

impl StudentEntry {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }

    pub fn recorded_scores(&self) -> Result<Vec<(&str, f64)>, GradebookError> {
        self.numeric("scores", &self.scores)
    }

    pub fn recorded_corrections(&self) -> Result<Vec<(&str, f64)>, GradebookError> {
        self.numeric("corrections", &self.corrections)
    }

    /// Integer scores such as `maths-1 = 18` are accepted as floats.
    fn numeric<'a>(
        &self,
        field: &str,
        table: &'a Table,
    ) -> Result<Vec<(&'a str, f64)>, GradebookError> {
        table
            .iter()
            .map(|(key, value)| match value {
                Value::Float(score) => Ok((key.as_str(), *score)),
                Value::Integer(score) => Ok((key.as_str(), *score as f64)),
                other => Err(GradebookError::ConfigParse(format!(
                    "{field}.{key} of student {} must be a number (found {})",
                    self.full_name(),
                    other.type_str()
                ))),
            })
            .collect()
    }
}

impl Roster {
    pub fn validate(&self) -> Result<(), GradebookError> {
        if self.cohort.name.trim().is_empty() {
            return Err(GradebookError::ConfigParse(
                "cohort.name must not be empty".to_string(),
            ));
        }

        let mut keys = HashSet::new();
        for assessment in &self.assessments {
            let key = assessment.key.trim();
            if key.is_empty() {
                return Err(GradebookError::ConfigParse(
                    "assessments.key entries must be non-empty".to_string(),
                ));
            }
            if !keys.insert(key) {
                return Err(GradebookError::ConfigParse(format!(
                    "assessments contains duplicate key: {key}"
                )));
            }
            if assessment.weight == 0 {
                return Err(GradebookError::ConfigParse(format!(
                    "assessment '{key}' must have a weight greater than 0"
                )));
            }
        }

        let mut names = HashSet::new();
        for student in &self.students {
            if student.last_name.trim().is_empty() || student.first_name.trim().is_empty() {
                return Err(GradebookError::ConfigParse(
                    "students entries need both last_name and first_name".to_string(),
                ));
            }
            let full_name = student.full_name();
            if !names.insert(full_name.clone()) {
                return Err(GradebookError::ConfigParse(format!(
                    "students contains duplicate entry: {full_name}"
                )));
            }
            student.recorded_scores()?;
            student.recorded_corrections()?;
        }

        Ok(())
    }
}
