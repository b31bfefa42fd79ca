use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Smoke case execution status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CaseStatus {
    Pending,
    Running,
    Passed,
    Failed { error: String },
    Skipped { reason: String },
}

impl CaseStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CaseStatus::Passed | CaseStatus::Failed { .. } | CaseStatus::Skipped { .. }
        )
    }
}

/// State for a single smoke case
#[derive(Debug, Clone)]
pub struct CaseState {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub status: CaseStatus,
    pub started_at: Option<Instant>,
    pub duration_ms: Option<u64>,
}

impl CaseState {
    pub fn new(index: usize, name: &str, description: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            description: description.to_string(),
            status: CaseStatus::Pending,
            started_at: None,
            duration_ms: None,
        }
    }

    pub fn start(&mut self) {
        self.status = CaseStatus::Running;
        self.started_at = Some(Instant::now());
    }

    pub fn pass(&mut self) {
        self.finish(CaseStatus::Passed);
    }

    pub fn fail(&mut self, error: String) {
        self.finish(CaseStatus::Failed { error });
    }

    /// Skipped cases never ran, so they carry no duration
    pub fn skip(&mut self, reason: String) {
        self.status = CaseStatus::Skipped { reason };
    }

    fn finish(&mut self, status: CaseStatus) {
        self.status = status;
        if let Some(start) = self.started_at {
            self.duration_ms = Some(start.elapsed().as_millis() as u64);
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            CaseStatus::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn to_report(&self) -> CaseReport {
        CaseReport {
            index: self.index,
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status.clone(),
            duration_ms: self.duration_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseReport {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub status: CaseStatus,
    pub duration_ms: Option<u64>,
}

/// State for one suite run against one environment
#[derive(Debug, Clone)]
pub struct SuiteState {
    pub session_id: String,
    pub environment: String,
    pub cases: Vec<CaseState>,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
}

impl SuiteState {
    pub fn new(session_id: &str, environment: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            environment: environment.to_string(),
            cases: Vec::new(),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    pub fn add_case(&mut self, name: &str, description: &str) -> usize {
        let index = self.cases.len();
        self.cases.push(CaseState::new(index, name, description));
        index
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Instant::now());
    }

    pub fn has_failures(&self) -> bool {
        self.cases
            .iter()
            .any(|c| matches!(c.status, CaseStatus::Failed { .. }))
    }

    pub fn summary(&self) -> SuiteSummary {
        let mut passed = 0;
        let mut failed = 0;
        let mut skipped = 0;

        for case in &self.cases {
            match case.status {
                CaseStatus::Passed => passed += 1,
                CaseStatus::Failed { .. } => failed += 1,
                CaseStatus::Skipped { .. } => skipped += 1,
                _ => {}
            }
        }

        let total_duration_ms = self.started_at.map(|start| {
            self.finished_at
                .unwrap_or_else(Instant::now)
                .duration_since(start)
                .as_millis() as u64
        });

        SuiteSummary {
            session_id: self.session_id.clone(),
            environment: self.environment.clone(),
            total_cases: self.cases.len() as u32,
            passed,
            failed,
            skipped,
            total_duration_ms,
        }
    }

    pub fn to_reports(&self) -> Vec<CaseReport> {
        self.cases.iter().map(|c| c.to_report()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuiteSummary {
    pub session_id: String,
    pub environment: String,
    pub total_cases: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total_duration_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_lifecycle() {
        let mut case = CaseState::new(0, "login-page", "Login page renders");
        assert_eq!(case.status, CaseStatus::Pending);
        assert!(!case.status.is_terminal());

        case.start();
        assert_eq!(case.status, CaseStatus::Running);
        case.fail("boom".to_string());
        assert!(case.status.is_terminal());
        assert_eq!(case.error(), Some("boom"));
        assert!(case.duration_ms.is_some());
    }

    #[test]
    fn test_skipped_case_has_no_duration() {
        let mut case = CaseState::new(3, "sso-login-page", "SSO");
        case.skip("not an SSO run".to_string());
        assert!(case.status.is_terminal());
        assert!(case.duration_ms.is_none());
        assert!(case.error().is_none());
    }

    #[test]
    fn test_summary_counts() {
        let mut suite = SuiteState::new("s-1", "local");
        suite.start();
        let a = suite.add_case("a", "");
        let b = suite.add_case("b", "");
        let c = suite.add_case("c", "");
        suite.cases[a].start();
        suite.cases[a].pass();
        suite.cases[b].start();
        suite.cases[b].fail("nope".to_string());
        suite.cases[c].skip("later".to_string());
        suite.finish();

        let summary = suite.summary();
        assert_eq!(summary.total_cases, 3);
        assert_eq!((summary.passed, summary.failed, summary.skipped), (1, 1, 1));
        assert!(summary.total_duration_ms.is_some());
        assert!(suite.has_failures());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&CaseStatus::Failed {
            error: "x".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"failed","error":"x"}"#);

        let back: CaseStatus = serde_json::from_str(r#"{"type":"passed"}"#).unwrap();
        assert_eq!(back, CaseStatus::Passed);
    }
}
