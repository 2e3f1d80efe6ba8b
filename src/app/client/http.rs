//! Core HTTP operations
//!
//! [`HttpFetcher`] performs a single GET and hands back status, content type
//! and body. It never interprets the status code: callers decide whether a
//! non-200 answer is fatal (listing) or a per-record failure (documents).

use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER};
use reqwest::Client;

use crate::app::client::config::ClientConfig;
use crate::constants::http;
use crate::errors::{FetchError, FetchResult};

/// Headers and timeout applied to one kind of request
#[derive(Debug, Clone, Default)]
pub struct RequestProfile {
    headers: Vec<(HeaderName, String)>,
    timeout: Option<Duration>,
}

impl RequestProfile {
    /// Empty profile: client defaults only
    pub fn new() -> Self {
        Self::default()
    }

    /// Structured listing request, marked as script-originated
    pub fn listing_api(referer: &str) -> Self {
        Self::new()
            .header(ACCEPT, http::ACCEPT_JSON)
            .header(
                HeaderName::from_static("x-requested-with"),
                http::REQUESTED_WITH,
            )
            .header(REFERER, referer)
    }

    /// Rendered listing page request
    pub fn listing_page(referer: &str) -> Self {
        Self::new()
            .header(ACCEPT, http::ACCEPT_HTML)
            .header(REFERER, referer)
    }

    /// Document download preferring PDF or binary content
    pub fn document(referer: &str, timeout: Duration) -> Self {
        Self::new()
            .header(ACCEPT, http::ACCEPT_DOCUMENT)
            .header(ACCEPT_LANGUAGE, http::ACCEPT_LANGUAGE)
            .header(REFERER, referer)
            .timeout(timeout)
    }

    /// Add a header
    pub fn header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Override the client's request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Look up a header value
    pub fn header_value(&self, name: &HeaderName) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Response of a completed request, whatever its status
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// `Content-Type` header, if any
    pub content_type: Option<String>,
    /// Full response body
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Whether the status is exactly 200
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP fetcher shared by the extractor and the downloader
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher around an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a fetcher from client configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::ClientBuild` if the TLS backend cannot be initialised
    pub fn from_config(config: &ClientConfig) -> FetchResult<Self> {
        Ok(Self::new(config.build_http_client()?))
    }

    /// Performs a GET request and reads the whole body
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Transport` on connection, TLS, timeout or body
    /// read failures, and `FetchError::InvalidHeader` if the profile carries
    /// a value that is not a valid header.
    pub async fn fetch(&self, url: &str, profile: &RequestProfile) -> FetchResult<FetchResponse> {
        let mut request = self.client.get(url);

        for (name, value) in &profile.headers {
            let header_value =
                HeaderValue::from_str(value).map_err(|_| FetchError::InvalidHeader {
                    name: name.to_string(),
                    value: value.clone(),
                })?;
            request = request.header(name.clone(), header_value);
        }

        if let Some(timeout) = profile.timeout {
            request = request.timeout(timeout);
        }

        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        tracing::debug!(
            "GET {} -> {} ({})",
            url,
            status,
            content_type.as_deref().unwrap_or("no content type")
        );

        let body = response.bytes().await.map_err(transport)?.to_vec();

        Ok(FetchResponse {
            status,
            content_type,
            body,
        })
    }
}
