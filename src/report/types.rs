use crate::runner::state::{CaseReport, SuiteState, SuiteSummary};
use serde::{Deserialize, Serialize};

/// Suite results for report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResults {
    pub session_id: String,
    pub environment: String,
    pub mode: String,
    pub cases: Vec<CaseReport>,
    pub summary: SuiteSummary,
    pub generated_at: String,
}

impl TestResults {
    pub fn from_suite(suite: &SuiteState, mode: &str) -> Self {
        Self {
            session_id: suite.session_id.clone(),
            environment: suite.environment.clone(),
            mode: mode.to_string(),
            cases: suite.to_reports(),
            summary: suite.summary(),
            generated_at: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}
