use crate::error::GradebookError;
use crate::model::RankingPolicy;
use serde::Deserialize;

pub const MAX_PRECISION: usize = 6;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradebookConfig {
    pub ranking: Option<RankingConfig>,
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub unscored: RankingPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStyle {
    Md,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    pub precision: Option<usize>,
    pub format: Option<ReportStyle>,
}

impl GradebookConfig {
    pub fn ranking_policy(&self) -> RankingPolicy {
        self.ranking
            .as_ref()
            .map(|ranking| ranking.unscored)
            .unwrap_or_default()
    }

    pub fn precision(&self) -> usize {
        self.report
            .as_ref()
            .and_then(|report| report.precision)
            .unwrap_or(2)
    }

    pub fn report_style(&self) -> ReportStyle {
        self.report
            .as_ref()
            .and_then(|report| report.format)
            .unwrap_or(ReportStyle::Md)
    }

    pub fn validate(&self) -> Result<(), GradebookError> {
        if let Some(precision) = self.report.as_ref().and_then(|report| report.precision) {
            if precision > MAX_PRECISION {
                return Err(GradebookError::ConfigParse(format!(
                    "report.precision must be at most {MAX_PRECISION} (found {precision})"
                )));
            }
        }
        Ok(())
    }
}
