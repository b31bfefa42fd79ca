use anyhow::{Context, Result};
use std::time::Duration;

use super::BasePage;
use crate::config::Settings;
use crate::driver::{BrowserSession, Selector};

const USER_NAME: &str = "input[name=\"username\"]";
const PASSWORD: &str = "input[name=\"password\"]";
const LOGIN_BUTTON: &str = "button[id=\"submit_button\"]";
const ERROR_MESSAGE_ON_LOGIN_FORM: &str = "div p strong";
const PORT_SELECTOR: &str = "[ng-model=\"data.selected_port\"]";
const DASHBOARD_HEADER: &str = "[id=\"dashboard-header\"]";

/// Identity provider login form used in SSO runs
pub struct SsoLoginPage<'a> {
    pub base: BasePage<'a>,
}

impl<'a> SsoLoginPage<'a> {
    pub fn new(browser: &'a dyn BrowserSession, settings: &'a Settings) -> Self {
        Self {
            base: BasePage::new(browser, settings),
        }
    }

    pub fn from_base(base: BasePage<'a>) -> Self {
        Self { base }
    }

    pub async fn open(&self) -> Result<()> {
        let idp_url = &self.base.settings().idp_url;
        self.base.browser().goto(idp_url).await
    }

    pub async fn verify_browser_on_the_page(&self) -> Result<()> {
        self.base
            .verify_marker(&Selector::css(USER_NAME), "IDP page")
            .await
    }

    pub async fn provide_credentials(&self, username: &str, password: &str) -> Result<()> {
        self.base
            .actions()
            .fill(Selector::css(USER_NAME), username)
            .fill(Selector::css(PASSWORD), password)
            .perform()
            .await
    }

    /// Submit the form; true when StormX shows a port selector or dashboard
    pub async fn click_on_login_button(&self) -> Result<bool> {
        self.base
            .actions()
            .click(Selector::css(LOGIN_BUTTON))
            .pause(Duration::from_secs(2))
            .perform()
            .await?;

        let browser = self.base.browser();
        let landed = browser.count_elements(&Selector::css(PORT_SELECTOR)).await? > 0
            || browser
                .count_elements(&Selector::css(DASHBOARD_HEADER))
                .await?
                > 0;
        Ok(landed)
    }

    pub async fn perform_error_validation(&self) -> Result<String> {
        self.base
            .browser()
            .element_text(&Selector::css(ERROR_MESSAGE_ON_LOGIN_FORM))
            .await?
            .context("No error message on the IDP login form")
    }
}
