use super::{Assessment, AssessmentId, CohortId, Student, StudentId};
use crate::error::{GradebookError, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

/// What `Cohort::ranking_with` does with a student who has no score yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingPolicy {
    /// Abort the whole ranking with `NoScoresAvailable`.
    #[default]
    Propagate,
    /// Leave the student out of the ranking.
    Skip,
}

#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a> {
    pub rank: usize,
    pub average: f64,
    pub student: &'a Student,
}

/// A class cohort. Owns its students and assessments.
#[derive(Debug, Clone)]
pub struct Cohort {
    id: CohortId,
    pub name: String,
    pub year: i32,
    pub teacher: String,
    assessments: Vec<Assessment>,
    students: Vec<Student>,
}

impl Cohort {
    pub fn new(name: impl Into<String>, year: i32, teacher: impl Into<String>) -> Self {
        Self {
            id: CohortId::generate(),
            name: name.into(),
            year,
            teacher: teacher.into(),
            assessments: Vec::new(),
            students: Vec::new(),
        }
    }

    pub fn id(&self) -> CohortId {
        self.id
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn assessments(&self) -> &[Assessment] {
        &self.assessments
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|student| student.id() == id)
    }

    pub fn student_by_name(&self, full_name: &str) -> Option<&Student> {
        self.students
            .iter()
            .find(|student| student.full_name() == full_name)
    }

    pub fn assessment(&self, id: AssessmentId) -> Option<&Assessment> {
        self.assessments
            .iter()
            .find(|assessment| assessment.id() == id)
    }

    pub fn register_student(&mut self, mut student: Student) -> Result<StudentId> {
        if self.student(student.id()).is_some() {
            return Err(GradebookError::StudentAlreadyInCohort(format!(
                "{student} in {self}"
            )));
        }
        if student.cohort().is_some() {
            return Err(GradebookError::StudentInAnotherCohort(student.to_string()));
        }

        let id = student.id();
        student.attach(self.id);
        debug!(cohort = %self, student = %student, "student registered");
        self.students.push(student);
        Ok(id)
    }

    pub fn register_assessment(&mut self, mut assessment: Assessment) -> Result<AssessmentId> {
        if self.assessment(assessment.id()).is_some() {
            return Err(GradebookError::AssessmentAlreadyInCohort(format!(
                "{assessment} in {self}"
            )));
        }
        if assessment.cohort().is_some() {
            return Err(GradebookError::AssessmentInAnotherCohort(
                assessment.to_string(),
            ));
        }

        let id = assessment.id();
        assessment.attach(self.id);
        debug!(cohort = %self, assessment = %assessment, "assessment registered");
        self.assessments.push(assessment);
        Ok(id)
    }

    pub fn add_score(
        &mut self,
        student: StudentId,
        assessment: AssessmentId,
        score: f64,
    ) -> Result<()> {
        let Self {
            students,
            assessments,
            name,
            ..
        } = self;
        find_student_mut(students, name, student)?.add_score(assessments, assessment, score)
    }

    pub fn modify_score(
        &mut self,
        student: StudentId,
        assessment: AssessmentId,
        score: f64,
    ) -> Result<()> {
        let Self {
            students,
            assessments,
            name,
            ..
        } = self;
        find_student_mut(students, name, student)?.modify_score(assessments, assessment, score)
    }

    pub fn student_average(&self, student: StudentId, subject: Option<&str>) -> Result<f64> {
        self.require_student(student)?
            .average(&self.assessments, subject)
    }

    pub fn assessment_average(&self, assessment: AssessmentId) -> Result<f64> {
        self.assessment(assessment)
            .ok_or_else(|| {
                GradebookError::AssessmentNotInCohort(format!("{assessment} in {self}"))
            })?
            .average_for_all_students(self)
    }

    /// Mean of the per-student averages. Students without a matching score are left out.
    pub fn average(&self, subject: Option<&str>) -> Result<f64> {
        let mut averages = Vec::with_capacity(self.students.len());
        for student in &self.students {
            match student.average(&self.assessments, subject) {
                Ok(average) => averages.push(average),
                Err(GradebookError::NoScoresAvailable(reason)) => {
                    debug!(student = %student, %reason, "student left out of cohort average");
                }
                Err(err) => return Err(err),
            }
        }

        if averages.is_empty() {
            return Err(match subject {
                Some(subject) => GradebookError::NoScoresAvailable(format!(
                    "no score in subject {subject} for cohort {self}"
                )),
                None => GradebookError::NoScoresAvailable(format!("no score for cohort {self}")),
            });
        }

        Ok(averages.iter().sum::<f64>() / averages.len() as f64)
    }

    /// Students by descending overall average with competition ranks (1, 2, 2, 4).
    /// Fails as soon as one student has no score.
    pub fn ranking(&self) -> Result<Vec<Ranked<'_>>> {
        self.ranking_with(RankingPolicy::Propagate)
    }

    pub fn ranking_with(&self, policy: RankingPolicy) -> Result<Vec<Ranked<'_>>> {
        let mut averaged = Vec::with_capacity(self.students.len());
        for student in &self.students {
            match student.average(&self.assessments, None) {
                Ok(average) => averaged.push((average, student)),
                Err(GradebookError::NoScoresAvailable(reason)) if policy == RankingPolicy::Skip => {
                    warn!(student = %student, %reason, "student left out of ranking");
                }
                Err(err) => return Err(err),
            }
        }

        averaged.sort_by(|left, right| right.0.total_cmp(&left.0));

        let mut ranking = Vec::with_capacity(averaged.len());
        let mut rank = 1;
        for (index, &(average, student)) in averaged.iter().enumerate() {
            if index > 0 && average < averaged[index - 1].0 {
                rank = index + 1;
            }
            ranking.push(Ranked {
                rank,
                average,
                student,
            });
        }
        Ok(ranking)
    }

    pub fn subjects(&self) -> BTreeSet<String> {
        self.assessments
            .iter()
            .map(|assessment| assessment.subject.clone())
            .collect()
    }

    fn require_student(&self, id: StudentId) -> Result<&Student> {
        self.student(id)
            .ok_or_else(|| GradebookError::StudentNotInCohort(format!("{id} in {self}")))
    }
}

fn find_student_mut<'a>(
    students: &'a mut [Student],
    cohort_name: &str,
    id: StudentId,
) -> Result<&'a mut Student> {
    students
        .iter_mut()
        .find(|student| student.id() == id)
        .ok_or_else(|| GradebookError::StudentNotInCohort(format!("{id} in {cohort_name}")))
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn promo() -> Cohort {
        Cohort::new("Promo 2023", 2023, "Professeur Principal")
    }

    fn student(last: &str, first: &str) -> Student {
        Student::new(last, first, date(2002, 3, 15), "F")
    }

    fn with_scores(scores: &[f64]) -> (Cohort, Vec<StudentId>) {
        let mut cohort = promo();
        let quiz = cohort
            .register_assessment(Assessment::new("Quiz", date(2023, 9, 30), "Math"))
            .expect("register");
        let mut ids = Vec::new();
        for (index, score) in scores.iter().enumerate() {
            let id = cohort
                .register_student(student("Student", &format!("N{index}")))
                .expect("register");
            cohort.add_score(id, quiz, *score).expect("score");
            ids.push(id);
        }
        (cohort, ids)
    }

    #[test]
    fn display_shows_name_and_year() {
        assert_eq!(promo().to_string(), "Promo 2023 (2023)");
    }

    #[test]
    fn register_student_sets_back_reference() {
        let mut cohort = promo();
        let id = cohort
            .register_student(student("Smith", "Alice"))
            .expect("register");
        assert_eq!(
            cohort.student(id).and_then(Student::cohort),
            Some(cohort.id())
        );
    }

    #[test]
    fn registering_same_student_twice_fails_and_keeps_roster() {
        let mut cohort = promo();
        let alice = student("Smith", "Alice");
        let copy = alice.clone();
        cohort.register_student(alice).expect("register");

        let result = cohort.register_student(copy);
        assert!(matches!(
            result,
            Err(GradebookError::StudentAlreadyInCohort(_))
        ));
        assert_eq!(cohort.students().len(), 1);
    }

    #[test]
    fn student_from_another_cohort_is_rejected() {
        let mut first = promo();
        let mut second = Cohort::new("Promo 2024", 2024, "Mme Martin");
        let id = first
            .register_student(student("Smith", "Alice"))
            .expect("register");
        let moved = first.student(id).expect("registered").clone();

        let result = second.register_student(moved);
        assert!(matches!(
            result,
            Err(GradebookError::StudentInAnotherCohort(_))
        ));
        assert!(second.students().is_empty());
    }

    #[test]
    fn registering_same_assessment_twice_fails() {
        let mut cohort = promo();
        let quiz = Assessment::new("Quiz", date(2023, 9, 30), "Math");
        let copy = quiz.clone();
        let id = cohort.register_assessment(quiz).expect("register");
        assert_eq!(
            cohort.assessment(id).and_then(Assessment::cohort),
            Some(cohort.id())
        );

        let result = cohort.register_assessment(copy);
        assert!(matches!(
            result,
            Err(GradebookError::AssessmentAlreadyInCohort(_))
        ));
        assert_eq!(cohort.assessments().len(), 1);
    }

    #[test]
    fn assessment_from_another_cohort_is_rejected() {
        let mut first = promo();
        let mut second = Cohort::new("Promo 2024", 2024, "Mme Martin");
        let id = first
            .register_assessment(Assessment::new("Quiz", date(2023, 9, 30), "Math"))
            .expect("register");
        let moved = first.assessment(id).expect("registered").clone();
        assert!(matches!(
            second.register_assessment(moved),
            Err(GradebookError::AssessmentInAnotherCohort(_))
        ));
    }

    #[test]
    fn scoring_an_unknown_student_fails() {
        let mut cohort = promo();
        let quiz = cohort
            .register_assessment(Assessment::new("Quiz", date(2023, 9, 30), "Math"))
            .expect("register");
        let stranger = student("Nobody", "Here");
        let result = cohort.add_score(stranger.id(), quiz, 10.0);
        assert!(matches!(result, Err(GradebookError::StudentNotInCohort(_))));
    }

    #[test]
    fn end_to_end_single_weighted_assessment() {
        let mut cohort = promo();
        let math = cohort
            .register_assessment(Assessment::with_weight(
                "Mathématiques",
                date(2023, 9, 30),
                "Mathématiques",
                2,
            ))
            .expect("register");
        let alice = cohort
            .register_student(student("Smith", "Alice"))
            .expect("register");
        let bob = cohort
            .register_student(Student::new("Johnson", "Bob", date(2001, 5, 7), "M"))
            .expect("register");
        cohort.add_score(alice, math, 18.0).expect("score");
        cohort.add_score(bob, math, 16.5).expect("score");

        assert_eq!(cohort.student_average(alice, None).expect("alice"), 18.0);
        assert_eq!(cohort.student_average(bob, None).expect("bob"), 16.5);
        assert!((cohort.average(None).expect("cohort") - 17.25).abs() < 1e-9);
        assert!((cohort.assessment_average(math).expect("assessment") - 17.25).abs() < 1e-9);
    }

    #[test]
    fn cohort_average_skips_students_without_scores() {
        let (mut cohort, _) = with_scores(&[12.0, 14.0]);
        cohort
            .register_student(student("Late", "Comer"))
            .expect("register");
        assert!((cohort.average(None).expect("average") - 13.0).abs() < 1e-9);
    }

    #[test]
    fn cohort_average_by_subject() {
        let mut cohort = promo();
        let algebra = Assessment::with_weight("Algebra", date(2023, 9, 30), "Math", 2);
        let math = cohort.register_assessment(algebra).expect("register");
        let history = cohort
            .register_assessment(Assessment::new("Revolution", date(2023, 10, 5), "History"))
            .expect("register");
        let alice = cohort
            .register_student(student("Smith", "Alice"))
            .expect("register");
        let bob = cohort
            .register_student(student("Johnson", "Bob"))
            .expect("register");
        cohort.add_score(alice, math, 18.0).expect("score");
        cohort.add_score(bob, math, 16.5).expect("score");
        cohort.add_score(alice, history, 10.0).expect("score");

        assert!((cohort.average(Some("Math")).expect("math") - 17.25).abs() < 1e-9);
        assert_eq!(cohort.average(Some("History")).expect("history"), 10.0);
        assert!(matches!(
            cohort.average(Some("Physics")),
            Err(GradebookError::NoScoresAvailable(_))
        ));
    }

    #[test]
    fn cohort_average_fails_when_nobody_is_scored() {
        let mut cohort = promo();
        cohort
            .register_student(student("Smith", "Alice"))
            .expect("register");
        let err = cohort.average(None).expect_err("no scores");
        assert!(matches!(err, GradebookError::NoScoresAvailable(_)));
    }

    #[test]
    fn ranking_shares_rank_on_ties_and_skips_next() {
        let (cohort, ids) = with_scores(&[15.0, 18.0, 18.0]);
        let ranking = cohort.ranking().expect("ranking");
        let ranks: Vec<usize> = ranking.iter().map(|entry| entry.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3]);
        assert_eq!(ranking[0].student.id(), ids[1]);
        assert_eq!(ranking[1].student.id(), ids[2]);
        assert_eq!(ranking[2].student.id(), ids[0]);
    }

    #[test]
    fn ranking_ranks_are_non_decreasing() {
        let (cohort, _) = with_scores(&[9.0, 14.0, 14.0, 14.0, 20.0, 3.5, 9.0]);
        let ranking = cohort.ranking().expect("ranking");
        let ranks: Vec<usize> = ranking.iter().map(|entry| entry.rank).collect();
        assert_eq!(ranks, vec![1, 2, 2, 2, 5, 5, 7]);
        assert!(ranking
            .windows(2)
            .all(|pair| pair[0].average >= pair[1].average));
    }

    #[test]
    fn ranking_propagates_missing_scores() {
        let (mut cohort, _) = with_scores(&[12.0, 14.0]);
        cohort
            .register_student(student("Late", "Comer"))
            .expect("register");
        assert!(matches!(
            cohort.ranking(),
            Err(GradebookError::NoScoresAvailable(_))
        ));
    }

    #[test]
    fn ranking_skip_policy_leaves_out_unscored_students() {
        let (mut cohort, _) = with_scores(&[12.0, 14.0]);
        cohort
            .register_student(student("Late", "Comer"))
            .expect("register");
        let ranking = cohort.ranking_with(RankingPolicy::Skip).expect("ranking");
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].average, 14.0);
        assert_eq!(ranking[1].rank, 2);
    }

    #[test]
    fn ranking_of_empty_cohort_is_empty() {
        assert!(promo().ranking().expect("ranking").is_empty());
    }

    #[test]
    fn subjects_are_deduplicated() {
        let mut cohort = promo();
        for (name, subject) in [("A", "Math"), ("B", "History"), ("C", "Math")] {
            cohort
                .register_assessment(Assessment::new(name, date(2023, 9, 30), subject))
                .expect("register");
        }
        let subjects = cohort.subjects();
        assert_eq!(subjects.len(), 2);
        assert!(subjects.contains("Math"));
        assert!(subjects.contains("History"));
    }

    #[test]
    fn student_lookup_by_name() {
        let mut cohort = promo();
        let id = cohort
            .register_student(student("Smith", "Alice"))
            .expect("register");
        assert_eq!(
            cohort.student_by_name("Smith Alice").map(Student::id),
            Some(id)
        );
        assert!(cohort.student_by_name("Alice Smith").is_none());
    }
}
