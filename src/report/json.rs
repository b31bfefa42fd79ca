use super::types::TestResults;
use anyhow::Result;
use std::path::Path;

pub const RESULTS_FILE: &str = "results.json";

/// Write the JSON report into `output_dir`
pub fn write_report(results: &TestResults, output_dir: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    let path = output_dir.join(RESULTS_FILE);
    std::fs::write(&path, json)?;
    println!("    JSON report saved to: {}", path.display());
    Ok(())
}
