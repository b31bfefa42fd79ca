use anyhow::Result;

use crate::driver::{BrowserCookie, BrowserSession};

/// Name/value pairs copied out of a cookie jar
///
/// Domain, path and security attributes are deliberately not kept. Setting a
/// name twice keeps the first position and the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    cookies: Vec<(String, String)>,
}

impl SessionSnapshot {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut snapshot = Self::default();
        for (name, value) in pairs {
            snapshot.set(name, value);
        }
        snapshot
    }

    /// Read the browser's cookie jar as it is right now
    pub async fn capture(browser: &dyn BrowserSession) -> Result<Self> {
        let cookies = browser.cookies().await?;
        log::debug!(
            "captured {} cookie(s) from {} session",
            cookies.len(),
            browser.name()
        );
        Ok(Self::new(cookies.into_iter().map(|c| (c.name, c.value))))
    }

    /// Cookies set by an HTTP response (e.g. a login form post)
    pub fn from_response(response: &reqwest::Response) -> Self {
        Self::new(
            response
                .cookies()
                .map(|c| (c.name().to_string(), c.value().to_string())),
        )
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.cookies.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.cookies.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// `Cookie` header value, `None` for an empty snapshot
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(n, v)| format!("{}={}", n, v))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Cookies ready to be added to a browser context
    pub fn to_browser_cookies(&self) -> Vec<BrowserCookie> {
        self.iter()
            .map(|(name, value)| BrowserCookie::new(name, value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::fake::FakeBrowser;

    #[test]
    fn test_cookie_header() {
        let snapshot = SessionSnapshot::new([("PHPSESSID", "abc"), ("lang", "en")]);
        assert_eq!(
            snapshot.cookie_header().as_deref(),
            Some("PHPSESSID=abc; lang=en")
        );
        assert!(SessionSnapshot::default().cookie_header().is_none());
    }

    #[test]
    fn test_duplicate_names_keep_last_value() {
        let snapshot = SessionSnapshot::new([("a", "1"), ("b", "2"), ("a", "3")]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("a"), Some("3"));
        assert_eq!(snapshot.cookie_header().as_deref(), Some("a=3; b=2"));
    }

    #[tokio::test]
    async fn test_capture_drops_attributes() {
        let browser = FakeBrowser::new("http://app/");
        browser.set_cookies(vec![BrowserCookie {
            name: "PHPSESSID".to_string(),
            value: "s1".to_string(),
            domain: Some("app".to_string()),
            path: Some("/admin".to_string()),
        }]);

        let snapshot = SessionSnapshot::capture(&browser).await.unwrap();
        assert_eq!(snapshot, SessionSnapshot::new([("PHPSESSID", "s1")]));
        assert_eq!(
            snapshot.to_browser_cookies(),
            vec![BrowserCookie::new("PHPSESSID", "s1")]
        );
    }

    #[tokio::test]
    async fn test_capture_is_a_snapshot() {
        let browser = FakeBrowser::new("http://app/").with_cookie("k1", "v1");
        let snapshot = SessionSnapshot::capture(&browser).await.unwrap();

        browser.set_cookies(vec![BrowserCookie::new("k1", "changed")]);
        assert_eq!(snapshot.get("k1"), Some("v1"));
    }
}
