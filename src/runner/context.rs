use crate::api::StormxApi;
use crate::config::Settings;
use crate::driver::{BoundedWait, BrowserSession};
use crate::pages::BasePage;
use crate::session::SessionSnapshot;

/// Everything a smoke case may touch during one run
pub struct SuiteContext<'a> {
    pub settings: &'a Settings,
    pub api: StormxApi,
    pub browser: Option<&'a dyn BrowserSession>,
    /// Browser session captured after the UI login
    pub session: Option<SessionSnapshot>,
    wait: Option<BoundedWait>,
}

impl<'a> SuiteContext<'a> {
    pub fn new(
        settings: &'a Settings,
        api: StormxApi,
        browser: Option<&'a dyn BrowserSession>,
    ) -> Self {
        Self {
            settings,
            api,
            browser,
            session: None,
            wait: None,
        }
    }

    /// Override the bounded wait handed to every page object
    pub fn with_wait(mut self, wait: BoundedWait) -> Self {
        self.wait = Some(wait);
        self
    }

    pub fn page<'b>(&'b self, browser: &'b dyn BrowserSession) -> BasePage<'b> {
        let base = BasePage::new(browser, self.settings);
        match self.wait {
            Some(wait) => base.with_wait(wait),
            None => base,
        }
    }

    pub fn login_url(&self) -> String {
        format!("{}/admin/index.php", self.settings.base_url.trim_end_matches('/'))
    }
}
