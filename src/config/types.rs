use serde::Deserialize;

/// Main configuration structure for Ripple-Crawl
///
/// Every section is optional in the TOML file; missing sections and keys fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub frontier: FrontierConfig,
    pub crawler: CrawlerConfig,
    pub fetcher: FetcherConfig,
    pub backends: BackendConfig,
    pub seeds: SeedsConfig,
    pub logging: LoggingConfig,
}

/// Scheduler configuration shared by every frontier run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrontierConfig {
    /// Number of workers attending crawl jobs within one run
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: usize,

    /// Number of link hops a page may be from its seed
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Number of frontier runs that may be active at the same time
    #[serde(rename = "max-pool-size")]
    pub max_pool_size: usize,

    /// Capacity of the channel workers publish discovered links on
    #[serde(rename = "publish-queue-size")]
    pub publish_queue_size: usize,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            max_depth: 2,
            max_pool_size: 4,
            publish_queue_size: 1024,
        }
    }
}

/// Page-processing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Whether to keep links whose host differs from the page they were found on
    #[serde(rename = "follow-external-links")]
    pub follow_external_links: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            follow_external_links: true,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Upper bound for a whole request, body included (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// Upper bound for establishing the connection (milliseconds)
    #[serde(rename = "connect-timeout-ms")]
    pub connect_timeout_ms: u64,

    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 3000,
            connect_timeout_ms: 3000,
            user_agent: format!("ripple-crawl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Backend engine selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Engine used to record crawl results
    #[serde(rename = "storage-engine")]
    pub storage_engine: String,

    /// Engine used to track already dispatched URLs
    #[serde(rename = "seen-cache-engine")]
    pub seen_cache_engine: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            storage_engine: "in-memory".to_string(),
            seen_cache_engine: "in-memory".to_string(),
        }
    }
}

/// Seed source configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedsConfig {
    /// Path to a line-delimited file of seed URLs
    pub file: String,
}

impl Default for SeedsConfig {
    fn default() -> Self {
        Self {
            file: "seeds.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of error, warning, info, debug or trace
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "error".to_string(),
        }
    }
}
