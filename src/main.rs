use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use stormx_verify::api::StormxApi;
use stormx_verify::config::{EnvironmentRegistry, Overrides, Settings};
use stormx_verify::driver::{BrowserSession, PlaywrightBrowser, WebBrowserConfig};
use stormx_verify::report::{self, TestResults};
use stormx_verify::runner::{self, SuiteContext};

#[derive(Parser)]
#[command(name = "stormx-verify")]
#[command(version = "0.1.0")]
#[command(about = "Smoke verification of a StormX environment", long_about = None)]
struct Cli {
    /// Environment name from the registry (e.g. local, dev, staging)
    environment: String,

    /// Headless browser unless this is "false"
    headless: String,

    /// Run mode; any mode containing "sso" enables the SSO cases
    mode: String,

    /// Environment registry file (defaults to $STORMX_ENVIRONMENTS, then ./environments.yaml)
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Output directory for reports
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,

    /// Write JSON and JUnit reports
    #[arg(long, default_value = "false")]
    report: bool,

    /// Run only the named case. Can be specified multiple times.
    #[arg(long = "case")]
    cases: Vec<String>,

    /// Skip every case that needs a browser
    #[arg(long, default_value = "false")]
    no_browser: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let registry_path = EnvironmentRegistry::resolve_path(cli.registry.as_deref());
    let registry = EnvironmentRegistry::load(&registry_path)?;
    let args = [cli.environment.as_str(), cli.headless.as_str(), cli.mode.as_str()];
    let settings = Settings::resolve(&args, &registry, Overrides::from_env()?)?;
    let cases = runner::select_cases(&cli.cases)?;

    println!(
        "{} Verifying {} at {}",
        "▶".green().bold(),
        settings.environment.name.cyan(),
        settings.base_url
    );
    println!("  Mode: {}", settings.mode.cyan());
    if settings.sso_enabled {
        println!("  SSO: {}", "Enabled".yellow());
    }
    log::debug!("resolved settings: {:?}", settings);

    let needs_browser = !cli.no_browser && cases.iter().any(|c| c.needs_browser());
    let browser = if needs_browser {
        let config = WebBrowserConfig::from_settings(&settings);
        Some(
            PlaywrightBrowser::launch(config)
                .await
                .context("Failed to launch the browser")?,
        )
    } else {
        None
    };

    let api = StormxApi::new(&settings)?;
    let session_id = uuid::Uuid::new_v4().to_string();
    let suite = {
        let browser_ref = browser.as_ref().map(|b| b as &dyn BrowserSession);
        let mut ctx = SuiteContext::new(&settings, api, browser_ref);
        runner::run_suite(&mut ctx, &cases, &session_id).await
    };

    if let Some(browser) = &browser {
        if let Err(e) = browser.close().await {
            log::warn!("failed to close browser: {:#}", e);
        }
    }

    if cli.report {
        let results = TestResults::from_suite(&suite, &settings.mode);
        report::write_reports(&results, &cli.output)?;
    }

    if suite.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
