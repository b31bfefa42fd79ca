use anyhow::{Context, Result};

use crate::config::Settings;
use crate::driver::{Actions, BoundedWait, BrowserSession, Presence, Selector};
use crate::session::{AuthenticatedClient, SessionSnapshot};

/// Shared page-object plumbing
pub struct BasePage<'a> {
    browser: &'a dyn BrowserSession,
    settings: &'a Settings,
    wait: BoundedWait,
}

impl<'a> BasePage<'a> {
    pub fn new(browser: &'a dyn BrowserSession, settings: &'a Settings) -> Self {
        Self {
            browser,
            settings,
            wait: BoundedWait::from_settings(settings),
        }
    }

    /// Same page with a custom wait (mostly for short test timeouts)
    pub fn with_wait(mut self, wait: BoundedWait) -> Self {
        self.wait = wait;
        self
    }

    pub fn browser(&self) -> &'a dyn BrowserSession {
        self.browser
    }

    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    pub fn wait(&self) -> &BoundedWait {
        &self.wait
    }

    /// Start an action sequence against this page's browser
    pub fn actions(&self) -> Actions<'a> {
        Actions::new(self.browser, self.settings.timing)
    }

    /// HTTP client authenticated as the browser session, as of now
    pub async fn request(&self) -> Result<AuthenticatedClient> {
        let snapshot = SessionSnapshot::capture(self.browser).await?;
        Ok(AuthenticatedClient::from_snapshot(snapshot)?)
    }

    /// Server-rendered markup of the URL the browser is showing
    ///
    /// Fetched out of band with the browser's cookies, so client-side DOM
    /// changes are not reflected.
    pub async fn fetch_current_page_markup(&self) -> Result<String> {
        let url = self.browser.current_url().await?;
        let client = self.request().await?;
        Ok(client.get_text(&url).await?)
    }

    /// True iff at least one element matches, right now
    pub async fn is_visible(&self, selector: &Selector) -> Result<bool> {
        Ok(self.browser.count_elements(selector).await? > 0)
    }

    /// Present / absent / timed-out classification with a bounded wait
    pub async fn presence(&self, selector: &Selector) -> Result<Presence> {
        self.wait.presence(self.browser, selector).await
    }

    /// Hotel inventory history used by the quick room transfer page
    pub async fn get_hotel_inventory(
        &self,
        port_id: u64,
        airline_id: u64,
    ) -> Result<reqwest::Response> {
        let url = format!(
            "{}/admin/remote/voucher.php?type=getBookingHistory&pid={}&airline_id={}",
            self.settings.base_url, port_id, airline_id
        );
        let client = self.request().await?;
        let response = client
            .send(client.get(&url))
            .await
            .context("Failed to fetch hotel inventory")?;
        Ok(response)
    }

    /// Wait for `selector` to show up, then confirm it is still on the page
    pub(crate) async fn verify_marker(&self, selector: &Selector, what: &str) -> Result<()> {
        self.wait
            .until_visible(self.browser, selector)
            .await
            .with_context(|| format!("{} is not loaded", what))?;
        anyhow::ensure!(
            self.is_visible(selector).await?,
            "{} is not loaded: {} left the page",
            what,
            selector
        );
        Ok(())
    }
}
