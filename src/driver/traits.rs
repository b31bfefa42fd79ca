use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

/// Element selector for the page under test
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector
    Css(String),
    /// XPath expression
    XPath(String),
}

impl Selector {
    pub fn css(selector: impl Into<String>) -> Self {
        Selector::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Selector::XPath(expression.into())
    }

    /// Selector string in Playwright syntax
    pub fn to_playwright(&self) -> String {
        match self {
            Selector::Css(css) => css.clone(),
            Selector::XPath(xpath) => format!("xpath={}", xpath),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(css) => write!(f, "css `{}`", css),
            Selector::XPath(xpath) => write!(f, "xpath `{}`", xpath),
        }
    }
}

/// Cookie as reported by the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserCookie {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
}

impl BrowserCookie {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            domain: None,
            path: None,
        }
    }
}

/// Browser automation capabilities the page objects rely on
///
/// Implementations wrap one live browser page. The handle is owned by
/// whoever launched it; page objects only borrow it and never close it.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Short name of the backend (e.g. "chromium")
    fn name(&self) -> &str;

    /// URL currently displayed
    async fn current_url(&self) -> Result<String>;

    /// Navigate to a URL and wait for the load to finish
    async fn goto(&self, url: &str) -> Result<()>;

    /// Full cookie jar of the current browser context
    async fn cookies(&self) -> Result<Vec<BrowserCookie>>;

    /// Add cookies to the browser context
    ///
    /// Cookies without a domain are scoped to the current URL.
    async fn add_cookies(&self, cookies: &[BrowserCookie]) -> Result<()>;

    /// Number of elements matching the selector in the current DOM
    async fn count_elements(&self, selector: &Selector) -> Result<usize>;

    /// Whether the first matching element is rendered and visible
    ///
    /// Returns false when nothing matches.
    async fn is_displayed(&self, selector: &Selector) -> Result<bool>;

    /// Text of the first matching element, `None` when nothing matches
    async fn element_text(&self, selector: &Selector) -> Result<Option<String>>;

    /// Click the first matching element
    async fn click(&self, selector: &Selector) -> Result<()>;

    /// Double click the first matching element
    async fn double_click(&self, selector: &Selector) -> Result<()>;

    /// Replace the value of an input with `text`
    async fn fill(&self, selector: &Selector, text: &str) -> Result<()>;

    /// Shut the browser down. Only the owner of the handle calls this.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
