use anyhow::Result;

use super::BasePage;
use crate::config::Settings;
use crate::driver::{BrowserSession, Selector};

const REFRESH_BUTTON: &str = "button#dashboard-refresh-button";
const VOUCHER_TAB: &str = "a[href=\"vouchers.php\"]";
pub(crate) const SEARCH_VOUCHER_TEXT_FIELD: &str =
    "[placeholder=\"type voucher code here e.g 71003, 71002\"]";

/// Landing page after a TVL login
pub struct DashboardPage<'a> {
    pub base: BasePage<'a>,
}

impl<'a> DashboardPage<'a> {
    pub fn new(browser: &'a dyn BrowserSession, settings: &'a Settings) -> Self {
        Self {
            base: BasePage::new(browser, settings),
        }
    }

    pub fn from_base(base: BasePage<'a>) -> Self {
        Self { base }
    }

    pub async fn verify_browser_on_the_page(&self) -> Result<()> {
        self.base
            .verify_marker(&Selector::css(REFRESH_BUTTON), "Dashboard page")
            .await
    }

    /// Navigate to the voucher listing through the navigation bar
    pub async fn click_on_voucher_tab(&self) -> Result<()> {
        let browser = self.base.browser();
        let wait = self.base.wait();
        wait.until_visible(browser, &Selector::css(VOUCHER_TAB)).await?;
        self.base
            .actions()
            .click(Selector::css(VOUCHER_TAB))
            .perform()
            .await?;
        wait.until_present(browser, &Selector::css(SEARCH_VOUCHER_TEXT_FIELD))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::fake::{ClickEffect, FakeBrowser, FakeElement};
    use crate::pages::base::tests::{quick_wait, settings_for};

    #[tokio::test]
    async fn test_voucher_tab_navigation() {
        let settings = settings_for("http://app");
        let browser = FakeBrowser::new("http://app/admin/index.php")
            .with_element(Selector::css(REFRESH_BUTTON), FakeElement::visible("Refresh"))
            .with_element(Selector::css(VOUCHER_TAB), FakeElement::visible("Vouchers"))
            .on_click(
                Selector::css(VOUCHER_TAB),
                vec![
                    ClickEffect::Navigate("http://app/admin/vouchers.php".to_string()),
                    ClickEffect::Show(Selector::css(SEARCH_VOUCHER_TEXT_FIELD), String::new()),
                ],
            );
        let page = DashboardPage::from_base(BasePage::new(&browser, &settings).with_wait(quick_wait()));

        page.verify_browser_on_the_page().await.unwrap();
        page.click_on_voucher_tab().await.unwrap();
        assert_eq!(
            browser.current_url().await.unwrap(),
            "http://app/admin/vouchers.php"
        );
    }

    #[tokio::test]
    async fn test_missing_refresh_button() {
        let settings = settings_for("http://app");
        let browser = FakeBrowser::new("http://app/");
        let page = DashboardPage::from_base(BasePage::new(&browser, &settings).with_wait(quick_wait()));
        assert!(page.verify_browser_on_the_page().await.is_err());
    }
}
