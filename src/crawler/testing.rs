//! In-memory fetcher for scheduler tests

use crate::crawler::fetcher::Fetcher;
use crate::FetchError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Serves a fixed set of pages and records every fetch
///
/// Unknown URLs answer with a 404 status error.
#[derive(Default)]
pub struct SiteFetcher {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    blocking: HashSet<String>,
    panicking: HashSet<String>,
    delay: Option<Duration>,
    cancel: CancellationToken,
    fetches: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    blocked: Notify,
}

impl SiteFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves a page whose body links to `hrefs`
    pub fn page(mut self, url: &str, hrefs: &[&str]) -> Self {
        let body: String = hrefs
            .iter()
            .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
            .collect();
        self.pages
            .insert(url.to_string(), format!("<html><body>{}</body></html>", body));
        self
    }

    /// Answers `url` with a 500 status error
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Holds fetches of `url` until the token is cancelled
    pub fn blocking(mut self, url: &str) -> Self {
        self.blocking.insert(url.to_string());
        self
    }

    /// Panics while fetching `url`
    pub fn panicking(mut self, url: &str) -> Self {
        self.panicking.insert(url.to_string());
        self
    }

    /// Sleeps before answering every fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches.lock().get(url).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().values().sum()
    }

    pub fn fetched_urls(&self) -> HashSet<String> {
        self.fetches.lock().keys().cloned().collect()
    }

    /// Largest number of fetches observed running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Resolves once some fetch is parked on a blocking URL
    pub async fn wait_until_blocked(&self) {
        self.blocked.notified().await;
    }

    async fn answer(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.panicking.contains(url) {
            panic!("fetcher panicked on {}", url);
        }

        if self.blocking.contains(url) {
            self.blocked.notify_one();
            self.cancel.cancelled().await;
            return Err(FetchError::Cancelled {
                url: url.to_string(),
            });
        }

        if self.failing.contains(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 500,
            });
        }

        match self.pages.get(url) {
            Some(body) => Ok(body.clone().into_bytes()),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[async_trait]
impl Fetcher for SiteFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        *self.fetches.lock().entry(url.to_string()).or_insert(0) += 1;

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        let result = self.answer(url).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
