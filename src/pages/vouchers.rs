use anyhow::Result;

use super::dashboard::SEARCH_VOUCHER_TEXT_FIELD;
use super::BasePage;
use crate::config::Settings;
use crate::driver::{BrowserSession, Presence, Selector};

const PNR_BUTTON: &str = "[title=\"Add New PNR\"]";

/// Voucher listing page
pub struct VoucherListingPage<'a> {
    pub base: BasePage<'a>,
}

impl<'a> VoucherListingPage<'a> {
    pub fn new(browser: &'a dyn BrowserSession, settings: &'a Settings) -> Self {
        Self {
            base: BasePage::new(browser, settings),
        }
    }

    pub fn from_base(base: BasePage<'a>) -> Self {
        Self { base }
    }

    /// The voucher search field marks the listing page
    pub async fn verify_browser_on_the_page(&self) -> Result<()> {
        anyhow::ensure!(
            self.base
                .is_visible(&Selector::css(SEARCH_VOUCHER_TEXT_FIELD))
                .await?,
            "Voucher listing page is not loaded: search field missing"
        );
        Ok(())
    }

    pub async fn pnr_button_presence(&self) -> Result<Presence> {
        self.base.presence(&Selector::css(PNR_BUTTON)).await
    }

    /// Airline users must not be offered the "Add New PNR" button
    pub async fn pnr_button_hidden_for_airline_users(&self) -> Result<()> {
        match self.pnr_button_presence().await? {
            Presence::Absent => Ok(()),
            Presence::Present => anyhow::bail!("\"Add New PNR\" button is shown to an airline user"),
            Presence::TimedOut => {
                anyhow::bail!("\"Add New PNR\" button did not settle within the wait")
            }
        }
    }
}
