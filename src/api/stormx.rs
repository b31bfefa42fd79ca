use anyhow::Context;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::config::Settings;
use crate::driver::BrowserSession;
use crate::session::{AuthenticatedClient, BridgeError, SessionSnapshot};

/// User agent for form posts and health checks
pub const SYSTEM_TEST_AGENT: &str = "stormx_system_test";
/// User agent for calls the PHP application treats as internal
pub const INTERNAL_AGENT: &str = "stormx_selenium_test";

const LOGIN_PATH: &str = "/admin/index.php";
const LOGOUT_PATH: &str = "/admin/index.php?logout=true";
const HOTELS_PATH: &str = "/admin/hotels.php";
const HEALTH_CHECK_PATH: &str = "/health-check-api";

const INCORRECT_CREDENTIALS: &str = "Incorrect Username or Password";
const PASSWORD_CHANGE_REQUIRED: &str = "Please change your password before you log in.";
const PASSWORD_EXPIRED: &str = "Your password has expired. Please change it before you log in.";
const LOGIN_REDIRECTING: &str = "Please wait redirecting...";
const RESET_CONTINUE_TO: &str = "admin/vouchers.php";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("unexpected status code {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("login issue: incorrect username or password")]
    IncorrectCredentials,

    #[error("login issue: failed to reset password (status {status})")]
    PasswordResetFailed { status: u16 },

    #[error("login issue: unexpected response: {excerpt}")]
    UnexpectedResponse { excerpt: String },

    #[error("environment is not sane: {url} answered {status}")]
    EnvironmentNotSane { url: String, status: u16 },

    #[error("environment '{0}' has no REST API host")]
    NoApiHost(String),

    #[error("invalid JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// How the login form answered a post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginReply {
    IncorrectCredentials,
    PasswordChange,
    Redirecting,
    Unknown,
}

fn classify_login(body: &str) -> LoginReply {
    if body.contains(INCORRECT_CREDENTIALS) {
        LoginReply::IncorrectCredentials
    } else if body.contains(PASSWORD_CHANGE_REQUIRED) || body.contains(PASSWORD_EXPIRED) {
        LoginReply::PasswordChange
    } else if body.contains(LOGIN_REDIRECTING) {
        LoginReply::Redirecting
    } else {
        LoginReply::Unknown
    }
}

fn login_form<'a>(
    username: &'a str,
    password: &'a str,
    new_password: &'a str,
    continue_to: &'a str,
) -> [(&'static str, &'a str); 10] {
    [
        ("cPwd", ""),
        ("continue", continue_to),
        ("email", ""),
        ("mode", "login"),
        ("nPwd", new_password),
        ("pex", ""),
        ("rPwd", ""),
        ("token", ""),
        ("uID", username),
        ("uPwd", password),
    ]
}

/// Requests against the PHP application (and REST API) of one environment
pub struct StormxApi {
    environment: String,
    php_host: String,
    api_host: Option<String>,
    client: Client,
}

impl StormxApi {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        Self::with_hosts(
            &settings.environment.name,
            &settings.base_url,
            settings.api_host(),
        )
    }

    pub fn with_hosts(
        environment: &str,
        php_host: &str,
        api_host: Option<&str>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(BridgeError::Client)?;

        Ok(Self {
            environment: environment.to_string(),
            php_host: php_host.trim_end_matches('/').to_string(),
            api_host: api_host.map(|h| h.trim_end_matches('/').to_string()),
            client,
        })
    }

    fn php_url(&self, path: &str) -> String {
        format!("{}{}", self.php_host, path)
    }

    async fn post_login_form(&self, form: &[(&str, &str)]) -> Result<reqwest::Response, ApiError> {
        let url = self.php_url(LOGIN_PATH);
        self.client
            .post(&url)
            .header(ACCEPT, "*/*")
            .header(USER_AGENT, SYSTEM_TEST_AGENT)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(form)
            .send()
            .await
            .map_err(|source| ApiError::Http { url, source })
    }

    /// Post the admin login form and hand back the raw response
    pub async fn login_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<reqwest::Response, ApiError> {
        self.post_login_form(&login_form(username, password, "", ""))
            .await
    }

    /// Replace a forced or expired password; returns the new session
    pub async fn reset_password(
        &self,
        username: &str,
        password: &str,
        new_password: &str,
    ) -> Result<SessionSnapshot, ApiError> {
        let url = self.php_url(LOGIN_PATH);
        let form = login_form(username, password, new_password, RESET_CONTINUE_TO);
        let response = self.post_login_form(&form).await?;
        let status = response.status();
        let snapshot = SessionSnapshot::from_response(&response);
        let body = read_text(response, &url).await?;

        if status != StatusCode::OK || !body.contains(LOGIN_REDIRECTING) {
            return Err(ApiError::PasswordResetFailed {
                status: status.as_u16(),
            });
        }
        log::info!("password of {} was reset", username);
        Ok(snapshot)
    }

    /// Log in through the PHP form and return the session cookies
    ///
    /// A forced or expired password is replaced with `new_password` on the
    /// way in.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        new_password: &str,
    ) -> Result<SessionSnapshot, ApiError> {
        let url = self.php_url(LOGIN_PATH);
        let response = self.login_user(username, password).await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }
        let snapshot = SessionSnapshot::from_response(&response);
        let body = read_text(response, &url).await?;

        match classify_login(&body) {
            LoginReply::IncorrectCredentials => Err(ApiError::IncorrectCredentials),
            LoginReply::PasswordChange => {
                self.reset_password(username, password, new_password)
                    .await
            }
            LoginReply::Redirecting => {
                log::debug!("{} logged in with {} cookie(s)", username, snapshot.len());
                Ok(snapshot)
            }
            LoginReply::Unknown => Err(ApiError::UnexpectedResponse {
                excerpt: body.chars().take(200).collect(),
            }),
        }
    }

    /// Internal-client request carrying `session`
    fn internal_request(
        &self,
        client: &AuthenticatedClient,
        url: &str,
    ) -> RequestBuilder {
        client
            .get(url)
            .header(USER_AGENT, INTERNAL_AGENT)
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header("X-TVA-Internal", "1")
    }

    /// End the PHP session
    pub async fn logout(&self, session: &SessionSnapshot) -> Result<(), ApiError> {
        let url = self.php_url(LOGOUT_PATH);
        let client = AuthenticatedClient::from_snapshot(session.clone())?;
        let response = client.send(self.internal_request(&client, &url)).await?;
        expect_ok(&response, &url)
    }

    /// Hotel search as the admin hotel page runs it
    pub async fn search_hotel(
        &self,
        session: &SessionSnapshot,
        hotel_id: u64,
        port_id: Option<u64>,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.php_url(HOTELS_PATH);
        let mut query = vec![
            ("type", "search".to_string()),
            ("status", "1".to_string()),
            ("hid", hotel_id.to_string()),
        ];
        if let Some(port_id) = port_id {
            query.push(("pid", port_id.to_string()));
        }

        let client = AuthenticatedClient::from_snapshot(session.clone())?;
        let request = self.internal_request(&client, &url).query(&query);
        let response = client.send(request).await?;
        expect_ok(&response, &url)?;
        response
            .json()
            .await
            .map_err(|source| ApiError::Json { url, source })
    }

    /// Status of the REST API health check
    pub async fn health_check(&self, with_from: bool) -> Result<StatusCode, ApiError> {
        let api_host = self
            .api_host
            .as_deref()
            .ok_or_else(|| ApiError::NoApiHost(self.environment.clone()))?;
        let mut url = format!("{}{}", api_host, HEALTH_CHECK_PATH);
        if with_from {
            url.push_str("?from=system-test");
        }

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, SYSTEM_TEST_AGENT)
            .send()
            .await
            .map_err(|source| ApiError::Http {
                url: url.clone(),
                source,
            })?;
        log::debug!("GET {} -> {}", url, response.status());
        Ok(response.status())
    }

    /// The PHP host must answer its root page with 200
    pub async fn sanity_check(&self) -> Result<(), ApiError> {
        let url = format!("{}/", self.php_host);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Http {
                url: url.clone(),
                source,
            })?;
        if response.status() != StatusCode::OK {
            return Err(ApiError::EnvironmentNotSane {
                url,
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

fn expect_ok(response: &reqwest::Response, url: &str) -> Result<(), ApiError> {
    if response.status() != StatusCode::OK {
        return Err(ApiError::UnexpectedStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    Ok(())
}

async fn read_text(response: reqwest::Response, url: &str) -> Result<String, ApiError> {
    response.text().await.map_err(|source| ApiError::Http {
        url: url.to_string(),
        source,
    })
}

/// Hand an API-obtained session to the browser, then open `url` with it
pub async fn inject_session(
    browser: &dyn BrowserSession,
    snapshot: &SessionSnapshot,
    url: &str,
) -> anyhow::Result<()> {
    // Cookies without a domain bind to the current page, so land on the host first.
    browser.goto(url).await?;
    browser
        .add_cookies(&snapshot.to_browser_cookies())
        .await
        .context("Failed to add session cookies to the browser")?;
    browser.goto(url).await
}
