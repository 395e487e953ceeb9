//! HTTP fetcher implementation
//!
//! This module handles all outbound HTTP requests, including:
//! - Building HTTP clients with a descriptive user agent string
//! - Bounded per-request and connect timeouts
//! - A cap on how many body bytes are read per response
//! - Classifying failures into transport errors
//!
//! Retries are not performed here. A failed listing fetch is reported to the
//! orchestrator, which moves on and tries again next cycle.

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{redirect::Policy, Client, Response};
use std::time::Duration;
use thiserror::Error;

/// Transport-level failure of a single request
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body from {url}: {message}")]
    Body { url: String, message: String },

    #[error("Body from {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl FetchError {
    /// The URL the failed request was sent to
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Status { url, .. }
            | Self::Body { url, .. }
            | Self::TooLarge { url, .. }
            | Self::Request { url, .. } => url,
        }
    }
}

/// Raw response of a successful fetch
#[derive(Debug, Clone)]
pub struct FetchedBody {
    /// Final URL after redirects
    pub final_url: String,

    /// Content-Type header value, lowercased (empty when absent)
    pub content_type: String,

    pub bytes: Vec<u8>,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use docket::config::{CrawlerConfig, UserAgentConfig};
/// use docket::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "DocketBot".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.gov/about".to_string(),
///     contact_email: "admin@example.gov".to_string(),
/// };
///
/// let client = build_http_client(&CrawlerConfig::default(), &user_agent).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    config: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues GET requests for listing pages and documents
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_body_bytes: usize,
}

impl Fetcher {
    /// Creates a fetcher with a client built from configuration
    pub fn new(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(crawler, user_agent)?;
        Ok(Self::with_client(client, crawler.max_body_bytes))
    }

    /// Wraps an existing client
    pub fn with_client(client: Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }

    /// Fetches a page and returns its markup
    ///
    /// The body is decoded using the charset announced by the server.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_page(url).await.map(|(_, body)| body)
    }

    /// Fetches a page and returns the final URL (after redirects) with its markup
    ///
    /// Relative links on the page must be resolved against the final URL.
    pub async fn fetch_page(&self, url: &str) -> Result<(String, String), FetchError> {
        let response = self.send(url).await?;
        let final_url = response.url().to_string();

        let body = response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok((final_url, body))
    }

    /// Fetches a document as raw bytes together with its content type
    pub async fn fetch_raw(&self, url: &str) -> Result<FetchedBody, FetchError> {
        let response = self.send(url).await?;
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        let bytes = self.read_limited(url, response).await?;

        Ok(FetchedBody {
            final_url,
            content_type,
            bytes,
        })
    }

    /// Reads the body chunk by chunk, giving up once it passes the byte cap
    async fn read_limited(
        &self,
        url: &str,
        mut response: Response,
    ) -> Result<Vec<u8>, FetchError> {
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })? {
            if bytes.len() + chunk.len() > self.max_body_bytes {
                return Err(self.too_large(url));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    fn too_large(&self, url: &str) -> FetchError {
        FetchError::TooLarge {
            url: url.to_string(),
            limit: self.max_body_bytes,
        }
    }

    /// Sends a GET request and rejects non-2xx responses
    async fn send(&self, url: &str) -> Result<Response, FetchError> {
        tracing::trace!(url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_body_bytes as u64)
        {
            return Err(self.too_large(url));
        }

        Ok(response)
    }
}

/// Maps a reqwest error onto the transport error taxonomy
fn classify_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: e.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}
