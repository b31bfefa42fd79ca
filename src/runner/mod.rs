//! Sequential smoke-suite runner

pub mod cases;
pub mod context;
pub mod state;

use anyhow::Result;
use colored::Colorize;
use std::collections::HashSet;

pub use cases::{CaseOutcome, SmokeCase};
pub use context::SuiteContext;
pub use state::{CaseStatus, SuiteState, SuiteSummary};

/// Cases to run, in suite order; an empty filter means all of them
pub fn select_cases(names: &[String]) -> Result<Vec<SmokeCase>> {
    if names.is_empty() {
        return Ok(SmokeCase::ALL.to_vec());
    }

    let mut wanted = HashSet::new();
    for name in names {
        match SmokeCase::from_name(name) {
            Some(case) => {
                wanted.insert(case);
            }
            None => {
                let known: Vec<&str> = SmokeCase::ALL.iter().map(|c| c.name()).collect();
                anyhow::bail!("Unknown case '{}' (known: {})", name, known.join(", "));
            }
        }
    }
    Ok(SmokeCase::ALL
        .into_iter()
        .filter(|c| wanted.contains(c))
        .collect())
}

/// Run `cases` one after the other and record each outcome
pub async fn run_suite(
    ctx: &mut SuiteContext<'_>,
    cases: &[SmokeCase],
    session_id: &str,
) -> SuiteState {
    let mut suite = SuiteState::new(session_id, &ctx.settings.environment.name);
    for case in cases {
        suite.add_case(case.name(), case.description());
    }

    println!(
        "\n{} Smoke suite on {} ({} cases)",
        "→".blue(),
        ctx.settings.environment.name.white().bold(),
        cases.len()
    );
    suite.start();

    let mut passed: HashSet<SmokeCase> = HashSet::new();
    for (index, case) in cases.iter().copied().enumerate() {
        let state = &mut suite.cases[index];

        if let Some(required) = case.requires() {
            if !passed.contains(&required) {
                state.skip(format!("{} did not pass", required));
                println!("  {} {} [{}]", "○".yellow(), case, "SKIPPED".yellow());
                continue;
            }
        }

        state.start();
        log::debug!("running {}", case);
        match case.execute(ctx).await {
            Ok(CaseOutcome::Passed) => {
                state.pass();
                passed.insert(case);
                println!(
                    "  {} {} [{}] {}ms",
                    "✓".green(),
                    case,
                    "PASSED".green().bold(),
                    state.duration_ms.unwrap_or(0)
                );
            }
            Ok(CaseOutcome::Skipped(reason)) => {
                println!("  {} {} [{}] {}", "○".yellow(), case, "SKIPPED".yellow(), reason);
                state.skip(reason);
            }
            Err(e) => {
                let error = format!("{:#}", e);
                log::error!("{} failed: {}", case, error);
                println!("  {} {} [{}]", "✗".red(), case, "FAILED".red().bold());
                println!("      {}", error.red());
                state.fail(error);
            }
        }
    }

    suite.finish();
    let summary = suite.summary();
    println!("\n{} Smoke suite finished", "■".blue().bold());
    println!(
        "  {} passed, {} failed, {} skipped",
        summary.passed.to_string().green(),
        summary.failed.to_string().red(),
        summary.skipped.to_string().yellow()
    );
    if let Some(duration) = summary.total_duration_ms {
        println!("  Duration: {}ms", duration);
    }
    suite
}
