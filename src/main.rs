mod cli;

use clap::Parser;
use gradebook::error::GradebookError;
use gradebook::types::config::{GradebookConfig, ReportStyle};
use gradebook::types::report::CohortReport;
use gradebook::{config, report, roster, Cohort, RankingPolicy};
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const INCOMPLETE: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn load(path: &Path) -> Result<(Cohort, GradebookConfig), GradebookError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let cfg = config::load_config(dir)?;
    let cohort = roster::build_cohort(&roster::load_roster(path)?)?;
    Ok((cohort, cfg))
}

fn run() -> Result<i32, GradebookError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        cli::Commands::Report(cmd) => {
            let (cohort, cfg) = load(&cmd.roster)?;
            let cohort_report = CohortReport::build(&cohort, cfg.ranking_policy())?;

            let output_format = match (cmd.format, cfg.report_style()) {
                (Some(cli::ReportFormat::Json), _) | (None, ReportStyle::Json) => {
                    report::OutputFormat::Json
                }
                (Some(cli::ReportFormat::Md), _) | (None, ReportStyle::Md) => {
                    report::OutputFormat::Md
                }
            };
            let rendered = report::render(&cohort_report, output_format, cfg.precision())?;
            println!("{rendered}");

            if cohort_report.is_complete() {
                Ok(exit_code::SUCCESS)
            } else {
                eprintln!(
                    "warning: {} student(s) without any score",
                    cohort_report.unscored.len()
                );
                Ok(exit_code::INCOMPLETE)
            }
        }
        cli::Commands::Rank(cmd) => {
            let (cohort, cfg) = load(&cmd.roster)?;
            let policy = if cmd.skip_unscored {
                RankingPolicy::Skip
            } else {
                cfg.ranking_policy()
            };
            let precision = cfg.precision();

            let ranking = cohort.ranking_with(policy)?;
            if ranking.is_empty() {
                println!("rank: no students");
                return Ok(exit_code::SUCCESS);
            }
            for entry in &ranking {
                println!(
                    "{}. {} ({:.precision$})",
                    entry.rank, entry.student, entry.average
                );
            }

            if ranking.len() < cohort.students().len() {
                Ok(exit_code::INCOMPLETE)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Average(cmd) => {
            let (cohort, cfg) = load(&cmd.roster)?;
            let precision = cfg.precision();
            let subject = cmd.subject.as_deref();

            let (label, average) = if let Some(name) = &cmd.student {
                let student = cohort
                    .student_by_name(name)
                    .ok_or_else(|| GradebookError::StudentNotInCohort(name.clone()))?;
                (
                    student.to_string(),
                    cohort.student_average(student.id(), subject)?,
                )
            } else if let Some(name) = &cmd.assessment {
                let assessment = cohort
                    .assessments()
                    .iter()
                    .find(|assessment| &assessment.name == name)
                    .ok_or_else(|| GradebookError::AssessmentNotInCohort(name.clone()))?;
                (
                    assessment.to_string(),
                    cohort.assessment_average(assessment.id())?,
                )
            } else {
                (cohort.to_string(), cohort.average(subject)?)
            };

            match subject {
                Some(subject) => println!("{label} [{subject}]: {average:.precision$}"),
                None => println!("{label}: {average:.precision$}"),
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Subjects(cmd) => {
            let (cohort, _) = load(&cmd.roster)?;
            let subjects = cohort.subjects();
            if subjects.is_empty() {
                println!("subjects: none");
            }
            for subject in subjects {
                println!("{subject}");
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Check(cmd) => {
            let (cohort, _) = load(&cmd.roster)?;
            let unscored = cohort
                .students()
                .iter()
                .filter(|student| student.scores().is_empty())
                .count();
            println!(
                "roster ok: {} with {} student(s) and {} assessment(s)",
                cohort,
                cohort.students().len(),
                cohort.assessments().len()
            );
            if unscored > 0 {
                eprintln!("warning: {unscored} student(s) without any score");
                Ok(exit_code::INCOMPLETE)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
