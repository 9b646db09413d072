use crate::error::{GradebookError, Result};
use crate::model::{Assessment, AssessmentId, Cohort, Student};
use crate::types::roster::Roster;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

pub fn load_roster(path: &Path) -> Result<Roster> {
    if !path.exists() {
        return Err(GradebookError::RosterNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let roster: Roster = toml::from_str(&content)
        .map_err(|e| GradebookError::ConfigParse(format!("{}: {}", path.display(), e)))?;
    roster.validate()?;
    Ok(roster)
}

/// Registers every assessment and student, then records scores and corrections.
pub fn build_cohort(roster: &Roster) -> Result<Cohort> {
    let mut cohort = Cohort::new(
        roster.cohort.name.clone(),
        roster.cohort.year,
        roster.cohort.teacher.clone(),
    );

    let mut keys: HashMap<&str, AssessmentId> = HashMap::new();
    for entry in &roster.assessments {
        let id = cohort.register_assessment(Assessment::with_weight(
            entry.name.clone(),
            entry.date,
            entry.subject.clone(),
            entry.weight,
        ))?;
        keys.insert(entry.key.trim(), id);
    }

    let lookup = |key: &str| {
        keys.get(key.trim())
            .copied()
            .ok_or_else(|| GradebookError::AssessmentNotInCohort(format!("unknown key '{key}'")))
    };

    for entry in &roster.students {
        let student = cohort.register_student(Student::new(
            entry.last_name.clone(),
            entry.first_name.clone(),
            entry.birth_date,
            entry.gender.clone(),
        ))?;
        for (key, score) in entry.recorded_scores()? {
            cohort.add_score(student, lookup(key)?, score)?;
        }
        for (key, score) in entry.recorded_corrections()? {
            cohort.modify_score(student, lookup(key)?, score)?;
        }
    }

    info!(
        cohort = %cohort,
        students = cohort.students().len(),
        assessments = cohort.assessments().len(),
        "roster loaded"
    );
    Ok(cohort)
}
