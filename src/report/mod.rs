pub mod json;
pub mod junit;
pub mod types;

use anyhow::{Context, Result};
use std::path::Path;

pub use types::TestResults;

/// Write `results.json` and `junit.xml` into `output_dir`
pub fn write_reports(results: &TestResults, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create report directory {}", output_dir.display()))?;
    json::write_report(results, output_dir)?;
    junit::write_report(results, output_dir)?;
    Ok(())
}

/// Load a previously written `results.json`
pub fn load_results(path: &Path) -> Result<TestResults> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let results = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(results)
}
