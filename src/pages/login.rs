use anyhow::{Context, Result};
use std::time::Duration;

use super::BasePage;
use crate::config::Settings;
use crate::driver::{BrowserSession, Selector};

const USERNAME: &str = "input#uID";
const PASSWORD: &str = "input#uPwd";
const NEW_PASSWORD: &str = ".newpassword";
const LOGIN_BUTTON: &str = "button[name=\"mbrIN\"]";
const FORGOT_PASSWORD: &str = "a[id=\"goForForgot\"]";
const ERROR_MESSAGE_ON_LOGIN_FORM: &str = "div#divLogin>span>div";
const ERROR_404_PAGE: &str = ".hero-unit h1";
const ERROR_CODE: &str = ".hero-unit h1 small";
const LOGIN_ERROR: &str = "#divLogin #errorMsg";

/// Result of submitting the login form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    Rejected,
}

/// StormX admin login form
pub struct LoginPage<'a> {
    pub base: BasePage<'a>,
}

impl<'a> LoginPage<'a> {
    pub fn new(browser: &'a dyn BrowserSession, settings: &'a Settings) -> Self {
        Self {
            base: BasePage::new(browser, settings),
        }
    }

    pub fn from_base(base: BasePage<'a>) -> Self {
        Self { base }
    }

    /// The forgot-password link marks the login page
    pub async fn verify_browser_on_the_page(&self) -> Result<()> {
        self.base
            .verify_marker(&Selector::css(FORGOT_PASSWORD), "StormX login page")
            .await
    }

    pub async fn provide_credentials(&self, username: &str, password: &str) -> Result<()> {
        self.base
            .actions()
            .fill(Selector::css(USERNAME), username)
            .fill(Selector::css(PASSWORD), password)
            .perform()
            .await
    }

    /// Submit the form, completing a forced password change if one is asked
    pub async fn click_on_login_button(&self, new_password: &str) -> Result<LoginOutcome> {
        let browser = self.base.browser();

        self.base
            .actions()
            .click(Selector::css(LOGIN_BUTTON))
            .pause(Duration::from_secs(2))
            .perform()
            .await?;

        if browser.count_elements(&Selector::css(NEW_PASSWORD)).await? > 0 {
            log::info!("password change requested, submitting the new password");
            self.base
                .actions()
                .fill(Selector::css(NEW_PASSWORD), new_password)
                .click(Selector::css(LOGIN_BUTTON))
                .pause(Duration::from_secs(1))
                .perform()
                .await?;
            return Ok(LoginOutcome::LoggedIn);
        }

        if browser.count_elements(&Selector::css(LOGIN_ERROR)).await? > 0 {
            return Ok(LoginOutcome::Rejected);
        }
        Ok(LoginOutcome::LoggedIn)
    }

    /// Full login from the login page
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        new_password: &str,
    ) -> Result<LoginOutcome> {
        self.verify_browser_on_the_page().await?;
        self.provide_credentials(username, password).await?;
        self.click_on_login_button(new_password).await
    }

    /// Error banner text without the close glyph
    pub async fn perform_error_validation(&self) -> Result<String> {
        let text = self
            .base
            .browser()
            .element_text(&Selector::css(ERROR_MESSAGE_ON_LOGIN_FORM))
            .await?
            .context("No error message on the login form")?;
        Ok(text.trim_matches(|c| c == '×' || c == '\n').to_string())
    }

    /// Header of the 404 page, e.g. "Error 404"
    pub async fn invalid_url_redirection(&self) -> Result<String> {
        let browser = self.base.browser();
        self.base
            .wait()
            .until_visible(browser, &Selector::css(ERROR_404_PAGE))
            .await
            .context("User is not redirected to 404 page")?;
        browser
            .element_text(&Selector::css(ERROR_CODE))
            .await?
            .context("404 page has no error code")
    }
}
