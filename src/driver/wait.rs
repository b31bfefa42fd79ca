use anyhow::Result;
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::Settings;
use crate::driver::traits::{BrowserSession, Selector};

/// Fixed interval between two condition checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("timed out after {waited:?} waiting for {what}")]
    Timeout { what: String, waited: Duration },
}

/// Outcome of an element presence check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The element is in the DOM and visible
    Present,
    /// The element is not in the DOM (or left it within the wait)
    Absent,
    /// The element stayed in the DOM without ever becoming visible
    TimedOut,
}

impl Presence {
    /// Only a visible element counts; `TimedOut` is not present
    pub fn is_present(self) -> bool {
        self == Presence::Present
    }
}

/// Poll-until-condition-or-timeout helper
///
/// The condition is checked at least once, then every `poll_interval` until
/// it holds or `timeout` has elapsed. There is no backoff.
#[derive(Debug, Clone, Copy)]
pub struct BoundedWait {
    timeout: Duration,
    poll_interval: Duration,
}

impl BoundedWait {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Wait bounded by the scaled explicit-wait setting
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.explicit_wait_timeout())
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll the condition; `Ok(false)` when the timeout expired first
    pub async fn poll<F, Fut>(&self, mut condition: F) -> Result<bool>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let start = Instant::now();
        loop {
            if condition().await? {
                return Ok(true);
            }
            if start.elapsed() >= self.timeout {
                return Ok(false);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Poll the condition; a [`WaitError::Timeout`] when it never holds
    pub async fn until<F, Fut>(&self, what: &str, condition: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let start = Instant::now();
        if self.poll(condition).await? {
            Ok(())
        } else {
            log::debug!("wait for {} expired", what);
            Err(WaitError::Timeout {
                what: what.to_string(),
                waited: start.elapsed(),
            }
            .into())
        }
    }

    pub async fn until_visible(
        &self,
        browser: &dyn BrowserSession,
        selector: &Selector,
    ) -> Result<()> {
        self.until(&format!("{} to be visible", selector), move || {
            browser.is_displayed(selector)
        })
        .await
    }

    pub async fn until_invisible(
        &self,
        browser: &dyn BrowserSession,
        selector: &Selector,
    ) -> Result<()> {
        self.until(&format!("{} to be invisible", selector), move || async move {
            Ok(!browser.is_displayed(selector).await?)
        })
        .await
    }

    pub async fn until_present(
        &self,
        browser: &dyn BrowserSession,
        selector: &Selector,
    ) -> Result<()> {
        self.until(&format!("{} to be present", selector), move || async move {
            Ok(browser.count_elements(selector).await? > 0)
        })
        .await
    }

    /// Classify an element as present, absent, or unsettled
    ///
    /// Missing from the DOM is `Absent` right away. Visible is `Present`
    /// right away. An element that is in the DOM but hidden is polled until it
    /// either becomes visible or leaves the DOM; if neither happens within the
    /// timeout the result is `TimedOut`.
    pub async fn presence(
        &self,
        browser: &dyn BrowserSession,
        selector: &Selector,
    ) -> Result<Presence> {
        if browser.count_elements(selector).await? == 0 {
            return Ok(Presence::Absent);
        }
        if browser.is_displayed(selector).await? {
            return Ok(Presence::Present);
        }

        let start = Instant::now();
        while start.elapsed() < self.timeout {
            tokio::time::sleep(self.poll_interval).await;
            if browser.count_elements(selector).await? == 0 {
                return Ok(Presence::Absent);
            }
            if browser.is_displayed(selector).await? {
                return Ok(Presence::Present);
            }
        }

        log::debug!("{} stayed hidden for {:?}", selector, self.timeout);
        Ok(Presence::TimedOut)
    }
}
