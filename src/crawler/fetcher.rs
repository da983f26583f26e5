//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the shared HTTP client with a proper user agent string
//! - GET requests for page bodies and asset bytes
//! - Error classification into transport and protocol failures
//!
//! There is exactly one attempt per URL. Retries are not performed.

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{Client, Response};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a fetch did not produce a body
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchFailure {
    /// Connection refused, timeout, DNS failure, or a broken body stream
    #[error("Transport error for {url}: {detail}")]
    Transport { url: String, detail: String },

    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Protocol { url: String, status: u16 },
}

impl FetchFailure {
    /// The URL the failed request was made for
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::Protocol { url, .. } => url,
        }
    }

    /// The HTTP status, for protocol failures
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Protocol { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    /// Short failure kind used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Protocol { .. } => "protocol",
        }
    }

    fn transport(url: &Url, error: &reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            detail: describe_transport_error(error),
        }
    }
}

/// Builds the HTTP client shared by every task of a run
///
/// The client owns a connection pool; clones share that pool, so it is built
/// once and handed to each task.
///
/// # Arguments
///
/// * `crawler` - Timeouts
/// * `user_agent` - User agent identification
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use link_harvester::config::{CrawlerConfig, UserAgentConfig};
/// use link_harvester::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body text
///
/// # Response Handling
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(body)`, info log with URL and status |
/// | any other status | `Err(Protocol)`, body is not read |
/// | connect/timeout/DNS error | `Err(Transport)` |
/// | body read/decode error | `Err(Transport)` |
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, FetchFailure> {
    let response = send_checked(client, url).await?;

    response
        .text()
        .await
        .map_err(|e| FetchFailure::transport(url, &e))
}

/// Fetches a URL and returns the raw response bytes
///
/// Same status handling as [`fetch_page`].
pub async fn fetch_bytes(client: &Client, url: &Url) -> Result<Vec<u8>, FetchFailure> {
    let response = send_checked(client, url).await?;

    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|e| FetchFailure::transport(url, &e))
}

async fn send_checked(client: &Client, url: &Url) -> Result<Response, FetchFailure> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FetchFailure::transport(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchFailure::Protocol {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    tracing::info!(url = %url, status = status.as_u16(), "Got response [{}] for {}", status.as_u16(), url);
    Ok(response)
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
