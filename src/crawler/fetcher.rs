//! HTTP fetcher implementation
//!
//! This module handles all network access for the crawler:
//! - The `Fetcher` trait workers fetch through
//! - Building the HTTP client with user agent and timeouts
//! - Racing each request against the crawl-wide cancellation token
//! - Error classification

use crate::config::FetcherConfig;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Retrieves the raw bytes of a page
///
/// Implementations must return promptly with an error once the crawl is cancelled, and
/// must never panic on network failures.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::FetcherConfig;
/// use ripple_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, FetchError> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(FetchError::Client)
}

/// Fetches pages with a single GET each
pub struct HttpFetcher {
    client: Client,
    cancel: CancellationToken,
}

impl HttpFetcher {
    /// Creates a fetcher bound to the crawl's cancellation token
    pub fn new(config: &FetcherConfig, cancel: CancellationToken) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_http_client(config)?,
            cancel,
        })
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
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

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        Ok(body.to_vec())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if self.cancel.is_cancelled() {
            return Err(FetchError::Cancelled {
                url: url.to_string(),
            });
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(FetchError::Cancelled { url: url.to_string() }),
            result = self.get(url) => {
                if let Err(e) = &result {
                    tracing::debug!("GET {} failed: {}", url, e);
                }
                result
            }
        }
    }
}

/// Maps a request error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
