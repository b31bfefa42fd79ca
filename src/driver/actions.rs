use anyhow::{Context, Result};
use std::time::Duration;

use crate::config::TimingPolicy;
use crate::driver::traits::{BrowserSession, Selector};

/// A single queued browser interaction
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Click(Selector),
    DoubleClick(Selector),
    Fill(Selector, String),
    /// Nominal pause, scaled by the timing policy when performed
    Pause(Duration),
}

/// Ordered sequence of interactions against one borrowed browser
///
/// Nothing touches the browser until [`Actions::perform`]. Steps run in
/// insertion order and the first failing step aborts the rest.
pub struct Actions<'a> {
    browser: &'a dyn BrowserSession,
    timing: TimingPolicy,
    steps: Vec<Action>,
}

impl<'a> Actions<'a> {
    pub fn new(browser: &'a dyn BrowserSession, timing: TimingPolicy) -> Self {
        Self {
            browser,
            timing,
            steps: Vec::new(),
        }
    }

    pub fn click(mut self, selector: Selector) -> Self {
        self.steps.push(Action::Click(selector));
        self
    }

    pub fn double_click(mut self, selector: Selector) -> Self {
        self.steps.push(Action::DoubleClick(selector));
        self
    }

    pub fn fill(mut self, selector: Selector, text: &str) -> Self {
        self.steps.push(Action::Fill(selector, text.to_string()));
        self
    }

    pub fn pause(mut self, nominal: Duration) -> Self {
        self.steps.push(Action::Pause(nominal));
        self
    }

    pub fn steps(&self) -> &[Action] {
        &self.steps
    }

    pub async fn perform(self) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            log::trace!("action #{}: {:?}", index, step);
            let outcome = match step {
                Action::Click(selector) => self.browser.click(selector).await,
                Action::DoubleClick(selector) => self.browser.double_click(selector).await,
                Action::Fill(selector, text) => self.browser.fill(selector, text).await,
                Action::Pause(nominal) => {
                    self.timing.sleep(*nominal).await;
                    Ok(())
                }
            };
            outcome.with_context(|| format!("action #{} ({:?}) failed", index, step))?;
        }
        Ok(())
    }
}
