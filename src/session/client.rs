use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, Method, RequestBuilder};
use std::string::FromUtf8Error;
use std::time::Duration;
use thiserror::Error;

use super::SessionSnapshot;

/// Request timeout for bridge clients
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("cookie '{name}' cannot be sent in a Cookie header")]
    InvalidCookie { name: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("response from {url} is not valid UTF-8: {source}")]
    Decode {
        url: String,
        #[source]
        source: FromUtf8Error,
    },
}

/// HTTP client carrying a fixed set of session cookies
///
/// The cookies are baked into a default `Cookie` header when the client is
/// built. The client keeps no cookie store, so neither later browser changes
/// nor `Set-Cookie` responses alter what it sends.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    client: Client,
    snapshot: SessionSnapshot,
}

impl AuthenticatedClient {
    /// Build a client sending exactly the snapshot's cookies
    ///
    /// An empty snapshot gives an unauthenticated client.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self, BridgeError> {
        let mut headers = HeaderMap::new();
        for (name, value) in snapshot.iter() {
            validate_cookie(name, value)?;
        }
        if let Some(header) = snapshot.cookie_header() {
            let value = HeaderValue::from_str(&header).map_err(|_| BridgeError::InvalidCookie {
                name: "<combined>".to_string(),
            })?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(BridgeError::Client)?;

        Ok(Self { client, snapshot })
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub fn is_authenticated(&self) -> bool {
        !self.snapshot.is_empty()
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Send a prepared request, attaching the URL to transport errors
    pub async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, BridgeError> {
        let request = request.build().map_err(BridgeError::Client)?;
        let url = request.url().to_string();
        self.client
            .execute(request)
            .await
            .map_err(|source| BridgeError::Request { url, source })
    }

    /// GET `url` and decode the body as UTF-8 without touching it otherwise
    ///
    /// The status code is not inspected.
    pub async fn get_text(&self, url: &str) -> Result<String, BridgeError> {
        let response = self.send(self.get(url)).await?;
        log::debug!("GET {} -> {}", url, response.status());
        let bytes = response
            .bytes()
            .await
            .map_err(|source| BridgeError::Request {
                url: url.to_string(),
                source,
            })?;
        String::from_utf8(bytes.to_vec()).map_err(|source| BridgeError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

fn validate_cookie(name: &str, value: &str) -> Result<(), BridgeError> {
    let name_ok = !name.is_empty()
        && !name
            .chars()
            .any(|c| c == '=' || c == ';' || c.is_whitespace() || c.is_control());
    let value_ok = !value.contains(';') && HeaderValue::from_str(value).is_ok();
    if name_ok && value_ok {
        Ok(())
    } else {
        Err(BridgeError::InvalidCookie {
            name: name.to_string(),
        })
    }
}
