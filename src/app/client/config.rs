//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the reqwest
//! client shared by the listing and document requests.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::http;
use crate::errors::{FetchError, FetchResult};

/// Configuration for the HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User agent sent with every request
    pub user_agent: String,
    /// Default request timeout (listing requests)
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Follow redirects (up to `max_redirects`)
    pub follow_redirects: bool,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Skip TLS certificate verification
    ///
    /// Enabled by default: the CBN origin intermittently serves an incomplete
    /// certificate chain.
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: http::USER_AGENT.to_string(),
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            follow_redirects: true,
            max_redirects: http::MAX_REDIRECTS,
            accept_invalid_certs: true,
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> FetchResult<Client> {
        let redirect_policy = if self.follow_redirects {
            Policy::limited(self.max_redirects)
        } else {
            Policy::none()
        };

        Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .redirect(redirect_policy)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(FetchError::ClientBuild)
    }
}
