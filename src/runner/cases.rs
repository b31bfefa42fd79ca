use anyhow::{Context, Result};
use std::fmt;

use super::context::SuiteContext;
use crate::api::ApiError;
use crate::driver::BrowserSession;
use crate::pages::{DashboardPage, LoginOutcome, LoginPage, SsoLoginPage, VoucherListingPage};
use crate::session::SessionSnapshot;
use crate::utils::fixtures;

/// Built-in smoke cases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmokeCase {
    EnvironmentSanity,
    ApiHealth,
    LoginPage,
    LoginSuccess,
    LoginInvalidCredentials,
    InvalidUrlRedirection,
    VoucherListing,
    SsoLoginPage,
    Logout,
}

/// How a case ended when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    Skipped(String),
}

impl SmokeCase {
    pub const ALL: [SmokeCase; 9] = [
        SmokeCase::EnvironmentSanity,
        SmokeCase::ApiHealth,
        SmokeCase::LoginPage,
        SmokeCase::LoginSuccess,
        SmokeCase::LoginInvalidCredentials,
        SmokeCase::InvalidUrlRedirection,
        SmokeCase::VoucherListing,
        SmokeCase::SsoLoginPage,
        SmokeCase::Logout,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SmokeCase::EnvironmentSanity => "environment-sanity",
            SmokeCase::ApiHealth => "api-health",
            SmokeCase::LoginPage => "login-page",
            SmokeCase::LoginSuccess => "login-success",
            SmokeCase::LoginInvalidCredentials => "login-invalid-credentials",
            SmokeCase::InvalidUrlRedirection => "invalid-url-redirection",
            SmokeCase::VoucherListing => "voucher-listing",
            SmokeCase::SsoLoginPage => "sso-login-page",
            SmokeCase::Logout => "logout",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SmokeCase::EnvironmentSanity => "PHP host answers its root page",
            SmokeCase::ApiHealth => "REST health check requires the from parameter",
            SmokeCase::LoginPage => "Login form is shown",
            SmokeCase::LoginSuccess => "Configured user reaches the dashboard",
            SmokeCase::LoginInvalidCredentials => "Wrong password is rejected",
            SmokeCase::InvalidUrlRedirection => "Unknown admin URL lands on the 404 page",
            SmokeCase::VoucherListing => "Voucher listing is reachable from the dashboard",
            SmokeCase::SsoLoginPage => "IDP login form is shown",
            SmokeCase::Logout => "Logout returns to the login form",
        }
    }

    pub fn from_name(name: &str) -> Option<SmokeCase> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Case that must have passed earlier in the run
    pub fn requires(self) -> Option<SmokeCase> {
        match self {
            SmokeCase::VoucherListing | SmokeCase::Logout => Some(SmokeCase::LoginSuccess),
            _ => None,
        }
    }

    pub fn needs_browser(self) -> bool {
        !matches!(
            self,
            SmokeCase::EnvironmentSanity | SmokeCase::ApiHealth | SmokeCase::LoginInvalidCredentials
        )
    }

    pub async fn execute(self, ctx: &mut SuiteContext<'_>) -> Result<CaseOutcome> {
        if self == SmokeCase::SsoLoginPage && !ctx.settings.sso_enabled {
            return Ok(CaseOutcome::Skipped(format!(
                "mode '{}' is not an SSO mode",
                ctx.settings.mode
            )));
        }

        let browser = match (self.needs_browser(), ctx.browser) {
            (false, _) => None,
            (true, Some(browser)) => Some(browser),
            (true, None) => return Ok(CaseOutcome::Skipped("no browser session".to_string())),
        };

        match (self, browser) {
            (SmokeCase::EnvironmentSanity, _) => {
                ctx.api.sanity_check().await?;
            }
            (SmokeCase::ApiHealth, _) => return api_health(ctx).await,
            (SmokeCase::LoginInvalidCredentials, _) => invalid_credentials(ctx).await?,
            (SmokeCase::LoginPage, Some(browser)) => {
                browser.goto(&ctx.login_url()).await?;
                LoginPage::from_base(ctx.page(browser))
                    .verify_browser_on_the_page()
                    .await?;
            }
            (SmokeCase::LoginSuccess, Some(browser)) => {
                ctx.session = Some(login_success(ctx, browser).await?);
            }
            (SmokeCase::InvalidUrlRedirection, Some(browser)) => {
                browser.goto(&ctx.settings.invalid_url()).await?;
                let code = LoginPage::from_base(ctx.page(browser))
                    .invalid_url_redirection()
                    .await?;
                anyhow::ensure!(code.contains("404"), "Expected a 404 error code, got '{}'", code);
            }
            (SmokeCase::VoucherListing, Some(browser)) => voucher_listing(ctx, browser).await?,
            (SmokeCase::SsoLoginPage, Some(browser)) => {
                let page = SsoLoginPage::from_base(ctx.page(browser));
                page.open().await?;
                page.verify_browser_on_the_page().await?;
            }
            (SmokeCase::Logout, Some(browser)) => {
                browser.goto(&ctx.settings.logout_url).await?;
                browser.goto(&ctx.login_url()).await?;
                LoginPage::from_base(ctx.page(browser))
                    .verify_browser_on_the_page()
                    .await
                    .context("Login form not shown after logout")?;
                ctx.session = None;
            }
            (case, None) => anyhow::bail!("{} needs a browser session", case),
        }
        Ok(CaseOutcome::Passed)
    }
}

impl fmt::Display for SmokeCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

async fn api_health(ctx: &SuiteContext<'_>) -> Result<CaseOutcome> {
    if ctx.settings.api_host().is_none() {
        return Ok(CaseOutcome::Skipped(format!(
            "environment '{}' has no REST API host",
            ctx.settings.environment.name
        )));
    }

    let with_from = ctx.api.health_check(true).await?;
    anyhow::ensure!(
        with_from.as_u16() == 200,
        "health check answered {} instead of 200",
        with_from
    );
    let without_from = ctx.api.health_check(false).await?;
    anyhow::ensure!(
        without_from.as_u16() == 404,
        "health check without 'from' answered {} instead of 404",
        without_from
    );
    Ok(CaseOutcome::Passed)
}

async fn invalid_credentials(ctx: &SuiteContext<'_>) -> Result<()> {
    let username = &ctx.settings.credentials.username;
    let wrong = fixtures::random_password();
    match ctx.api.login(username, &wrong, &wrong).await {
        Err(ApiError::IncorrectCredentials) => Ok(()),
        Err(e) => Err(e).context("Login with a wrong password failed unexpectedly"),
        Ok(_) => anyhow::bail!("Login with a wrong password was accepted"),
    }
}

async fn login_success(
    ctx: &SuiteContext<'_>,
    browser: &dyn BrowserSession,
) -> Result<SessionSnapshot> {
    let credentials = &ctx.settings.credentials;
    browser.goto(&ctx.login_url()).await?;

    let outcome = LoginPage::from_base(ctx.page(browser))
        .login(&credentials.username, &credentials.password, &credentials.password)
        .await?;
    anyhow::ensure!(
        outcome == LoginOutcome::LoggedIn,
        "Login as {} was rejected",
        credentials.username
    );

    DashboardPage::from_base(ctx.page(browser))
        .verify_browser_on_the_page()
        .await?;
    SessionSnapshot::capture(browser).await
}

async fn voucher_listing(ctx: &SuiteContext<'_>, browser: &dyn BrowserSession) -> Result<()> {
    // Earlier cases may have left the browser elsewhere (the 404 page)
    browser.goto(&ctx.login_url()).await?;
    let dashboard = DashboardPage::from_base(ctx.page(browser));
    dashboard
        .verify_browser_on_the_page()
        .await
        .context("Dashboard not shown for the logged-in session")?;
    dashboard.click_on_voucher_tab().await?;

    let listing = VoucherListingPage::from_base(ctx.page(browser));
    listing.verify_browser_on_the_page().await?;

    let markup = listing.base.fetch_current_page_markup().await?;
    anyhow::ensure!(!markup.trim().is_empty(), "Voucher listing markup is empty");

    let pnr_button = listing.pnr_button_presence().await?;
    if pnr_button.is_present() {
        log::info!(
            "\"Add New PNR\" is offered to {}",
            ctx.settings.credentials.username
        );
    } else {
        log::info!("\"Add New PNR\" button: {:?}", pnr_button);
    }
    Ok(())
}
