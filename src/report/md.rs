use crate::types::report::CohortReport;

fn value(average: Option<f64>, precision: usize) -> String {
    match average {
        Some(average) => format!("{average:.precision$}"),
        None => "n/a".to_string(),
    }
}

pub fn to_markdown(report: &CohortReport, precision: usize) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {} ({})\n\n", report.cohort, report.year));
    output.push_str(&format!("Teacher: {}\n\n", report.teacher));
    output.push_str(&format!(
        "Cohort average: {}\n\n",
        value(report.overall_average, precision)
    ));

    output.push_str("## Subjects\n\n");
    if report.subjects.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for subject in &report.subjects {
            output.push_str(&format!(
                "- {}: {}\n",
                subject.subject,
                value(subject.average, precision)
            ));
        }
        output.push('\n');
    }

    output.push_str("## Assessments\n\n");
    if report.assessments.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for assessment in &report.assessments {
            output.push_str(&format!(
                "- {} (subject: {}, {}, weight {}): {} over {} score(s)\n",
                assessment.name,
                assessment.subject,
                assessment.date,
                assessment.weight,
                value(assessment.average, precision),
                assessment.scored
            ));
        }
        output.push('\n');
    }

    output.push_str("## Ranking\n\n");
    if report.ranking.is_empty() {
        output.push_str("- none\n");
    } else {
        for row in &report.ranking {
            output.push_str(&format!(
                "{}. {} ({:.precision$})\n",
                row.rank, row.student, row.average
            ));
        }
    }

    if !report.unscored.is_empty() {
        output.push_str("\n## Not yet scored\n\n");
        for student in &report.unscored {
            output.push_str(&format!("- {student}\n"));
        }
    }

    output
}
