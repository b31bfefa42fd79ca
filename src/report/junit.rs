use super::types::TestResults;
use crate::runner::state::{CaseReport, CaseStatus};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

pub const JUNIT_FILE: &str = "junit.xml";

fn seconds(ms: Option<u64>) -> String {
    (ms.unwrap_or(0) as f64 / 1000.0).to_string()
}

/// Generate JUnit XML report string from TestResults
pub fn generate_junit_xml(results: &TestResults) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total = results.cases.len().to_string();
    let failures = results.summary.failed.to_string();
    let skipped = results.summary.skipped.to_string();
    let time = seconds(results.summary.total_duration_ms);

    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "stormx-verify"));
    suites_start.push_attribute(("tests", total.as_str()));
    suites_start.push_attribute(("failures", failures.as_str()));
    suites_start.push_attribute(("skipped", skipped.as_str()));
    suites_start.push_attribute(("time", time.as_str()));
    writer.write_event(Event::Start(suites_start))?;

    // One suite per environment run
    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", results.environment.as_str()));
    suite_start.push_attribute(("tests", total.as_str()));
    suite_start.push_attribute(("failures", failures.as_str()));
    suite_start.push_attribute(("skipped", skipped.as_str()));
    suite_start.push_attribute(("id", results.session_id.as_str()));
    suite_start.push_attribute(("time", time.as_str()));
    suite_start.push_attribute(("timestamp", results.generated_at.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    let classname = format!("stormx.{}.{}", results.environment, results.mode);
    for case in &results.cases {
        write_test_case(&mut writer, case, &classname)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let xml = String::from_utf8(writer.into_inner().into_inner())?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(
    writer: &mut Writer<W>,
    case: &CaseReport,
    classname: &str,
) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", case.name.as_str()));
    case_start.push_attribute(("classname", classname));
    case_start.push_attribute(("time", seconds(case.duration_ms).as_str()));
    writer.write_event(Event::Start(case_start))?;

    match &case.status {
        CaseStatus::Failed { error } => {
            let mut fail_start = BytesStart::new("failure");
            fail_start.push_attribute(("message", error.lines().next().unwrap_or("failed")));
            fail_start.push_attribute(("type", "AssertionError"));
            writer.write_event(Event::Start(fail_start))?;
            writer.write_event(Event::Text(BytesText::new(error)))?;
            writer.write_event(Event::End(BytesEnd::new("failure")))?;
        }
        CaseStatus::Skipped { reason } => {
            let mut skip = BytesStart::new("skipped");
            skip.push_attribute(("message", reason.as_str()));
            writer.write_event(Event::Empty(skip))?;
        }
        _ => {}
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Write report to file
pub fn write_report(results: &TestResults, output_dir: &Path) -> Result<()> {
    let xml = generate_junit_xml(results)?;
    let path = output_dir.join(JUNIT_FILE);
    std::fs::write(&path, xml)?;
    println!("    Generated JUnit report: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::SuiteSummary;

    #[test]
    fn test_generate_junit_xml() {
        let results = TestResults {
            session_id: "test-session".to_string(),
            environment: "local".to_string(),
            mode: "standard".to_string(),
            cases: vec![
                CaseReport {
                    index: 0,
                    name: "login-page".to_string(),
                    description: "Login page renders".to_string(),
                    status: CaseStatus::Passed,
                    duration_ms: Some(1500),
                },
                CaseReport {
                    index: 1,
                    name: "voucher-listing".to_string(),
                    description: "Voucher listing reachable".to_string(),
                    status: CaseStatus::Failed {
                        error: "Voucher listing page is not loaded".to_string(),
                    },
                    duration_ms: Some(2000),
                },
                CaseReport {
                    index: 2,
                    name: "sso-login-page".to_string(),
                    description: "IDP form renders".to_string(),
                    status: CaseStatus::Skipped {
                        reason: "not an SSO run".to_string(),
                    },
                    duration_ms: None,
                },
            ],
            summary: SuiteSummary {
                session_id: "test-session".to_string(),
                environment: "local".to_string(),
                total_cases: 3,
                passed: 1,
                failed: 1,
                skipped: 1,
                total_duration_ms: Some(3500),
            },
            generated_at: "2023-01-01T12:00:00".to_string(),
        };

        let xml = generate_junit_xml(&results).expect("Failed to generate XML");

        assert!(xml.contains(r#"<testsuites name="stormx-verify""#));
        assert!(xml.contains(r#"tests="3""#));
        assert!(xml.contains(r#"failures="1""#));
        assert!(xml.contains(r#"time="3.5""#));
        assert!(xml.contains(r#"<testcase name="login-page" classname="stormx.local.standard""#));
        assert!(xml.contains(r#"message="Voucher listing page is not loaded""#));
        assert!(xml.contains(r#"<skipped message="not an SSO run"/>"#));
    }
}
