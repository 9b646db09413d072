use crate::types::report::CohortReport;

pub fn to_json(report: &CohortReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
