//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with timeouts and cancellation
//! - HTML parsing and link extraction
//! - The per-seed frontier scheduler
//! - Orchestration of runs across all seeds

mod fetcher;
mod frontier;
mod manager;
mod page;
mod parser;

#[cfg(test)]
pub(crate) mod testing;

pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use frontier::{Frontier, RunReport};
pub use manager::Manager;
pub use page::PageCrawler;
pub use parser::extract_links;

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::storage::{open_result_store, seen_cache_factory, ResultStore};
use crate::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A URL handed to exactly one worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlJob {
    pub url: String,

    /// Link hops from the seed (0 for the seed itself)
    pub depth: u32,
}

/// Links found on one crawled page, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    pub url: String,
    pub links: Vec<String>,
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the result store and seen cache engines named in the config
/// 2. Build the HTTP fetcher
/// 3. Run one frontier per seed, bounded by the run pool size
///
/// Steps 1 and 2 fail before any page is fetched. Once crawling starts, nothing fails
/// the crawl as a whole; cancelling `cancel` stops it early.
///
/// # Returns
///
/// * `Ok((CrawlSummary, store))` - The crawl ran; `store` holds everything fetched
/// * `Err(CrawlError)` - A backend or the fetcher could not be set up
pub async fn crawl(
    config: &Config,
    seeds: Vec<String>,
    cancel: CancellationToken,
) -> Result<(CrawlSummary, Arc<dyn ResultStore>)> {
    let store = open_result_store(&config.backends.storage_engine)?;
    let seen_factory = seen_cache_factory(&config.backends.seen_cache_engine)?;
    let fetcher = HttpFetcher::new(&config.fetcher, cancel.clone())?;

    tracing::info!(
        "Backends: storage={}, seen-cache={}",
        config.backends.storage_engine,
        config.backends.seen_cache_engine
    );

    let crawler = PageCrawler::new(Arc::new(fetcher), config.crawler.clone());
    let frontier = Frontier::new(
        Arc::new(crawler),
        Arc::clone(&store),
        config.frontier.clone(),
        cancel.clone(),
    );
    let manager = Manager::new(
        Arc::new(frontier),
        seen_factory,
        config.frontier.max_pool_size,
        cancel,
    );

    let summary = manager.run(seeds).await;
    Ok((summary, store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;
    use crate::CrawlError;

    #[tokio::test]
    async fn test_unknown_storage_engine_fails_before_crawling() {
        let mut config = Config::default();
        config.backends.storage_engine = "sqlite".to_string();

        let result = crawl(
            &config,
            vec!["https://example.com/".to_string()],
            CancellationToken::new(),
        )
        .await;

        assert!(matches!(
            result,
            Err(CrawlError::Storage(StorageError::UnknownEngine { .. }))
        ));
    }

    #[tokio::test]
    async fn test_unknown_seen_cache_engine_fails_before_crawling() {
        let mut config = Config::default();
        config.backends.seen_cache_engine = "redis".to_string();

        let result = crawl(&config, Vec::new(), CancellationToken::new()).await;
        assert!(matches!(result, Err(CrawlError::Storage(_))));
    }

    #[tokio::test]
    async fn test_crawl_without_seeds() {
        let (summary, store) = crawl(&Config::default(), Vec::new(), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.runs, 0);
        assert!(store.is_empty());
    }
}
