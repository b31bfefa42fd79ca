//! Chromium browser driven through Playwright
//!
//! This is the production [`BrowserSession`]: one browser, one context and
//! one page, launched headless or headed according to the settings.

use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;
use playwright::api::{Browser, BrowserContext, Cookie, Page, Viewport};
use playwright::Playwright;
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::config::Settings;
use crate::driver::traits::{BrowserCookie, BrowserSession, Selector};

/// Browser launch configuration
#[derive(Debug, Clone)]
pub struct WebBrowserConfig {
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Explicit browser executable; discovered on the system when unset
    pub executable: Option<PathBuf>,
}

impl Default for WebBrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            executable: std::env::var("PLAYWRIGHT_CHROMIUM_EXECUTABLE_PATH")
                .ok()
                .map(PathBuf::from),
        }
    }
}

impl WebBrowserConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            headless: settings.headless,
            ..Self::default()
        }
    }
}

/// Web browser session backed by Playwright
pub struct PlaywrightBrowser {
    #[allow(dead_code)]
    playwright: Playwright,
    browser: Browser,
    context: BrowserContext,
    page: Mutex<Page>,
}

impl PlaywrightBrowser {
    /// Launch Chromium and open a single page
    pub async fn launch(config: WebBrowserConfig) -> Result<Self> {
        let playwright = Playwright::initialize()
            .await
            .context("Failed to initialize Playwright")?;

        let chromium = playwright.chromium();
        let mut launcher = chromium.launcher().headless(config.headless);

        let executable = config.executable.clone().or_else(find_system_browser);
        if let Some(ref path) = executable {
            println!("{} Using browser: {}", "🌐".blue(), path.display());
            launcher = launcher.executable(path);
        } else {
            log::info!("no browser executable found, relying on the Playwright default");
        }

        let mut args: Vec<String> = [
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--start-maximized",
            "--ignore-certificate-errors",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        args.push(format!(
            "--window-size={},{}",
            config.viewport_width, config.viewport_height
        ));
        launcher = launcher.args(&args);

        let browser = launcher
            .launch()
            .await
            .context("Failed to launch Chromium")?;
        let context = browser.context_builder().build().await?;
        let page = context.new_page().await?;

        page.set_viewport_size(Viewport {
            width: config.viewport_width as i32,
            height: config.viewport_height as i32,
        })
        .await?;

        log::debug!(
            "chromium launched (headless: {}, viewport {}x{})",
            config.headless,
            config.viewport_width,
            config.viewport_height
        );

        Ok(Self {
            playwright,
            browser,
            context,
            page: Mutex::new(page),
        })
    }
}

#[async_trait]
impl BrowserSession for PlaywrightBrowser {
    fn name(&self) -> &str {
        "chromium"
    }

    async fn current_url(&self) -> Result<String> {
        let page = self.page.lock().await;
        Ok(page.url()?)
    }

    async fn goto(&self, url: &str) -> Result<()> {
        let page = self.page.lock().await;
        page.goto_builder(url)
            .goto()
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;
        Ok(())
    }

    async fn cookies(&self) -> Result<Vec<BrowserCookie>> {
        let cookies = self.context.cookies(&[]).await?;
        Ok(cookies
            .into_iter()
            .map(|c| BrowserCookie {
                name: c.name,
                value: c.value,
                domain: c.domain,
                path: c.path,
            })
            .collect())
    }

    async fn add_cookies(&self, cookies: &[BrowserCookie]) -> Result<()> {
        let current_url = self.current_url().await?;
        let converted: Vec<Cookie> = cookies
            .iter()
            .map(|c| match (&c.domain, &c.path) {
                (Some(domain), Some(path)) => {
                    Cookie::with_domain_path(&c.name, &c.value, domain, path)
                }
                _ => Cookie::with_url(&c.name, &c.value, &current_url),
            })
            .collect();
        self.context.add_cookies(&converted).await?;
        Ok(())
    }

    async fn count_elements(&self, selector: &Selector) -> Result<usize> {
        let page = self.page.lock().await;
        let elements = page.query_selector_all(&selector.to_playwright()).await?;
        Ok(elements.len())
    }

    async fn is_displayed(&self, selector: &Selector) -> Result<bool> {
        let page = self.page.lock().await;
        match page.query_selector(&selector.to_playwright()).await? {
            Some(el) => Ok(el.is_visible().await?),
            None => Ok(false),
        }
    }

    async fn element_text(&self, selector: &Selector) -> Result<Option<String>> {
        let page = self.page.lock().await;
        match page.query_selector(&selector.to_playwright()).await? {
            Some(el) => Ok(Some(el.inner_text().await?)),
            None => Ok(None),
        }
    }

    async fn click(&self, selector: &Selector) -> Result<()> {
        let page = self.page.lock().await;
        let sel = selector.to_playwright();
        page.click_builder(&sel)
            .click()
            .await
            .with_context(|| format!("Failed to click {}", selector))?;
        Ok(())
    }

    async fn double_click(&self, selector: &Selector) -> Result<()> {
        let page = self.page.lock().await;
        let sel = selector.to_playwright();
        page.dblclick_builder(&sel)
            .dblclick()
            .await
            .with_context(|| format!("Failed to double click {}", selector))?;
        Ok(())
    }

    async fn fill(&self, selector: &Selector, text: &str) -> Result<()> {
        let page = self.page.lock().await;
        let sel = selector.to_playwright();
        page.fill_builder(&sel, text)
            .fill()
            .await
            .with_context(|| format!("Failed to fill {}", selector))?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}

fn find_system_browser() -> Option<PathBuf> {
    let common_paths = [
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ];

    common_paths
        .iter()
        .map(std::path::Path::new)
        .find(|p| p.exists())
        .map(|p| p.to_path_buf())
}
