use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gradebook",
    version,
    about = "Cohort grade book: weighted averages, subject averages and rankings"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full cohort report: averages per subject and assessment, ranking
    Report(ReportCommand),
    /// Students ordered by overall average
    Rank(RankCommand),
    /// Average of the cohort, of one student or of one assessment
    Average(AverageCommand),
    /// Distinct subjects of the cohort's assessments
    Subjects(RosterArg),
    /// Load the roster and report any inconsistency
    Check(RosterArg),
}

#[derive(Args)]
pub struct RosterArg {
    pub roster: PathBuf,
}

#[derive(Args)]
pub struct ReportCommand {
    pub roster: PathBuf,
    /// Defaults to `report.format` from gradebook.toml, then md
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
}

#[derive(Args)]
pub struct RankCommand {
    pub roster: PathBuf,
    /// Leave students without any score out instead of failing
    #[arg(long)]
    pub skip_unscored: bool,
}

#[derive(Args)]
pub struct AverageCommand {
    pub roster: PathBuf,
    #[arg(long)]
    pub subject: Option<String>,
    /// "LastName FirstName"
    #[arg(long, conflicts_with = "assessment")]
    pub student: Option<String>,
    #[arg(long, conflicts_with = "subject")]
    pub assessment: Option<String>,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
