//! Page processing: the unit of work behind every crawl job

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_links;
use crate::crawler::CrawlResult;
use crate::FetchError;
use std::sync::Arc;

/// Fetches a page and extracts its links
///
/// Holds its collaborators explicitly; nothing here is shared mutable state, so one
/// instance serves every worker of every run.
pub struct PageCrawler {
    fetcher: Arc<dyn Fetcher>,
    config: CrawlerConfig,
}

impl PageCrawler {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: CrawlerConfig) -> Self {
        Self { fetcher, config }
    }

    /// Crawls a single URL
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - The page was fetched; `links` may be empty
    /// * `Err(FetchError)` - The fetch failed, timed out or was cancelled
    pub async fn crawl(&self, url: &str) -> Result<CrawlResult, FetchError> {
        let body = self.fetcher.fetch(url).await?;
        let links = extract_links(url, &body, self.config.follow_external_links);

        tracing::debug!("Found {} links on {}", links.len(), url);

        Ok(CrawlResult {
            url: url.to_string(),
            links,
        })
    }
}
