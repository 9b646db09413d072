pub mod json;
pub mod md;

use crate::error::GradebookError;
use crate::types::report::CohortReport;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

/// `precision` only affects markdown; JSON keeps full values.
pub fn render(
    report: &CohortReport,
    format: OutputFormat,
    precision: usize,
) -> Result<String, GradebookError> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(GradebookError::Json),
        OutputFormat::Md => Ok(md::to_markdown(report, precision)),
    }
}
