//! In-memory browser used by the page-object tests

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::{BrowserCookie, BrowserSession, Selector};

#[derive(Debug, Clone)]
pub(crate) struct FakeElement {
    pub text: String,
    pub displayed: bool,
    /// Number of lookups that miss before the element shows up
    pub appears_after: usize,
    /// Number of lookups that hit before the element goes away
    pub vanishes_after: Option<usize>,
    /// Only rendered while the browser shows this URL; everywhere when unset
    pub page: Option<String>,
}

impl FakeElement {
    pub fn visible(text: &str) -> Self {
        Self {
            text: text.to_string(),
            displayed: true,
            appears_after: 0,
            vanishes_after: None,
            page: None,
        }
    }

    pub fn on_page(mut self, url: &str) -> Self {
        self.page = Some(url.to_string());
        self
    }

    pub fn hidden() -> Self {
        Self {
            displayed: false,
            ..Self::visible("")
        }
    }
}

/// Side effect applied when a selector is clicked
#[derive(Debug, Clone)]
pub(crate) enum ClickEffect {
    Navigate(String),
    Show(Selector, String),
}

#[derive(Default)]
struct FakeState {
    url: String,
    cookies: Vec<BrowserCookie>,
    elements: HashMap<Selector, Vec<FakeElement>>,
    lookups: HashMap<Selector, usize>,
    click_effects: HashMap<Selector, Vec<ClickEffect>>,
    filled: HashMap<Selector, String>,
    log: Vec<String>,
}

impl FakeState {
    /// Elements currently present for a selector, counting this lookup
    fn lookup(&mut self, selector: &Selector) -> Vec<FakeElement> {
        let seen = {
            let counter = self.lookups.entry(selector.clone()).or_insert(0);
            *counter += 1;
            *counter
        };
        let url = &self.url;
        self.elements
            .get(selector)
            .map(|elements| {
                elements
                    .iter()
                    .filter(|e| e.page.as_ref().map_or(true, |page| page == url))
                    .filter(|e| seen > e.appears_after)
                    .filter(|e| match e.vanishes_after {
                        Some(limit) => seen <= limit,
                        None => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub(crate) struct FakeBrowser {
    state: Mutex<FakeState>,
}

impl FakeBrowser {
    pub fn new(url: &str) -> Self {
        Self {
            state: Mutex::new(FakeState {
                url: url.to_string(),
                ..FakeState::default()
            }),
        }
    }

    pub fn with_element(self, selector: Selector, element: FakeElement) -> Self {
        self.state
            .lock()
            .unwrap()
            .elements
            .entry(selector)
            .or_default()
            .push(element);
        self
    }

    pub fn with_cookie(self, name: &str, value: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .cookies
            .push(BrowserCookie::new(name, value));
        self
    }

    pub fn on_click(self, selector: Selector, effects: Vec<ClickEffect>) -> Self {
        self.state
            .lock()
            .unwrap()
            .click_effects
            .insert(selector, effects);
        self
    }

    pub fn set_cookies(&self, cookies: Vec<BrowserCookie>) {
        self.state.lock().unwrap().cookies = cookies;
    }

    pub fn filled_value(&self, selector: &Selector) -> Option<String> {
        self.state.lock().unwrap().filled.get(selector).cloned()
    }

    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }
}

#[async_trait]
impl BrowserSession for FakeBrowser {
    fn name(&self) -> &str {
        "fake"
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.log.push(format!("goto {}", url));
        state.url = url.to_string();
        Ok(())
    }

    async fn cookies(&self) -> Result<Vec<BrowserCookie>> {
        Ok(self.state.lock().unwrap().cookies.clone())
    }

    async fn add_cookies(&self, cookies: &[BrowserCookie]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        for cookie in cookies {
            state.cookies.retain(|c| c.name != cookie.name);
            state.cookies.push(cookie.clone());
        }
        Ok(())
    }

    async fn count_elements(&self, selector: &Selector) -> Result<usize> {
        Ok(self.state.lock().unwrap().lookup(selector).len())
    }

    async fn is_displayed(&self, selector: &Selector) -> Result<bool> {
        let found = self.state.lock().unwrap().lookup(selector);
        Ok(found.first().map(|e| e.displayed).unwrap_or(false))
    }

    async fn element_text(&self, selector: &Selector) -> Result<Option<String>> {
        let found = self.state.lock().unwrap().lookup(selector);
        Ok(found.first().map(|e| e.text.clone()))
    }

    async fn click(&self, selector: &Selector) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.lookup(selector).is_empty() {
            anyhow::bail!("no element matches {}", selector);
        }
        state.log.push(format!("click {}", selector));
        let effects = state.click_effects.get(selector).cloned().unwrap_or_default();
        for effect in effects {
            match effect {
                ClickEffect::Navigate(url) => state.url = url,
                ClickEffect::Show(target, text) => state
                    .elements
                    .entry(target)
                    .or_default()
                    .push(FakeElement::visible(&text)),
            }
        }
        Ok(())
    }

    async fn double_click(&self, selector: &Selector) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.lookup(selector).is_empty() {
            anyhow::bail!("no element matches {}", selector);
        }
        state.log.push(format!("double_click {}", selector));
        Ok(())
    }

    async fn fill(&self, selector: &Selector, text: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.lookup(selector).is_empty() {
            anyhow::bail!("no element matches {}", selector);
        }
        state.log.push(format!("fill {}", selector));
        state.filled.insert(selector.clone(), text.to_string());
        Ok(())
    }
}
