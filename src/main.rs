//! Ripple-Crawl main entry point
//!
//! This is the command-line interface for the Ripple-Crawl link crawler.

use anyhow::Context;
use clap::Parser;
use ripple_crawl::config::{load_config_with_hash, load_seeds, validate, Config};
use ripple_crawl::crawler::crawl;
use ripple_crawl::output::{log_summary, write_snapshot};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Ripple-Crawl: a bounded-depth breadth-first link crawler
///
/// Ripple-Crawl reads seed URLs from a file, crawls outward from each seed up to a
/// maximum depth, and prints a JSON map of every crawled page to the links found on it.
#[derive(Parser, Debug)]
#[command(name = "ripple-crawl")]
#[command(version)]
#[command(about = "A bounded-depth breadth-first link crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Line-delimited seed URL file
    #[arg(long, value_name = "FILE")]
    seeds_file: Option<String>,

    /// Maximum link hops from a seed
    #[arg(long)]
    max_depth: Option<u32>,

    /// Workers per frontier run
    #[arg(long)]
    max_concurrency: Option<usize>,

    /// Frontier runs active at the same time
    #[arg(long)]
    max_pool_size: Option<usize>,

    /// Capacity of each run's publish queue
    #[arg(long)]
    publish_queue_size: Option<usize>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    request_timeout_ms: Option<u64>,

    /// Whether to follow links to other hosts
    #[arg(long, value_name = "BOOL")]
    follow_external_links: Option<bool>,

    /// Result store engine
    #[arg(long)]
    storage_engine: Option<String>,

    /// Seen cache engine
    #[arg(long)]
    seen_cache_engine: Option<String>,

    /// Log level (error, warning, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Write the snapshot to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(file) = &self.seeds_file {
            config.seeds.file = file.clone();
        }
        if let Some(depth) = self.max_depth {
            config.frontier.max_depth = depth;
        }
        if let Some(concurrency) = self.max_concurrency {
            config.frontier.max_concurrency = concurrency;
        }
        if let Some(pool_size) = self.max_pool_size {
            config.frontier.max_pool_size = pool_size;
        }
        if let Some(queue_size) = self.publish_queue_size {
            config.frontier.publish_queue_size = queue_size;
        }
        if let Some(timeout) = self.request_timeout_ms {
            config.fetcher.request_timeout_ms = timeout;
        }
        if let Some(follow) = self.follow_external_links {
            config.crawler.follow_external_links = follow;
        }
        if let Some(engine) = &self.storage_engine {
            config.backends.storage_engine = engine.clone();
        }
        if let Some(engine) = &self.seen_cache_engine {
            config.backends.seen_cache_engine = engine.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration, then let the command line win
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };
    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration")?;

    setup_logging(&config.logging.level, cli.verbose, cli.quiet);

    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        ),
        _ => tracing::info!("Using default configuration"),
    }

    let seeds = load_seeds(Path::new(&config.seeds.file))
        .with_context(|| format!("Failed to load seeds from {}", config.seeds.file))?;
    tracing::info!("Loaded {} seed URLs", seeds.len());

    if cli.dry_run {
        return handle_dry_run(&config, &seeds);
    }

    handle_crawl(config, seeds, cli.output.as_deref()).await
}

/// Sets up the logging/tracing subscriber
///
/// `-q` and `-v` take precedence over the configured level. Logs go to stderr so stdout
/// carries only the snapshot.
fn setup_logging(level: &str, verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new(directive_for(level)),
            1 => EnvFilter::new("ripple_crawl=info,warn"),
            2 => EnvFilter::new("ripple_crawl=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Maps a configured level name onto a filter directive
fn directive_for(level: &str) -> String {
    match level.to_lowercase().as_str() {
        "warning" => "warn".to_string(),
        other => other.to_string(),
    }
}

/// Listens for interrupt/terminate and cancels the crawl
fn spawn_signal_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        tracing::warn!("Shutdown signal received, draining runs");
        cancel.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!("Cannot listen for SIGTERM: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Handles the --dry-run mode: shows the effective configuration and seeds
fn handle_dry_run(config: &Config, seeds: &[String]) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    write_dry_run_report(&mut stdout.lock(), config, seeds)
        .context("Failed to write dry run report")?;

    eprintln!("✓ Configuration is valid");
    eprintln!("✓ Would start crawling with {} seed URLs", seeds.len());
    Ok(())
}

/// Writes the effective configuration and seed list
fn write_dry_run_report(
    out: &mut impl Write,
    config: &Config,
    seeds: &[String],
) -> std::io::Result<()> {
    writeln!(out, "=== Ripple-Crawl Dry Run ===\n")?;

    writeln!(out, "Frontier:")?;
    writeln!(out, "  Max depth: {}", config.frontier.max_depth)?;
    writeln!(out, "  Workers per run: {}", config.frontier.max_concurrency)?;
    writeln!(out, "  Concurrent runs: {}", config.frontier.max_pool_size)?;
    writeln!(
        out,
        "  Publish queue size: {}",
        config.frontier.publish_queue_size
    )?;

    writeln!(out, "\nCrawler:")?;
    writeln!(
        out,
        "  Follow external links: {}",
        config.crawler.follow_external_links
    )?;

    writeln!(out, "\nFetcher:")?;
    writeln!(out, "  Request timeout: {}ms", config.fetcher.request_timeout_ms)?;
    writeln!(out, "  Connect timeout: {}ms", config.fetcher.connect_timeout_ms)?;
    writeln!(out, "  User agent: {}", config.fetcher.user_agent)?;

    writeln!(out, "\nBackends:")?;
    writeln!(out, "  Storage: {}", config.backends.storage_engine)?;
    writeln!(out, "  Seen cache: {}", config.backends.seen_cache_engine)?;

    writeln!(out, "\nSeeds ({}):", seeds.len())?;
    for seed in seeds {
        writeln!(out, "  - {}", seed)?;
    }
    out.flush()
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    seeds: Vec<String>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    spawn_signal_listener(cancel.clone());

    let (summary, store) = crawl(&config, seeds, cancel)
        .await
        .context("Failed to start crawl")?;

    log_summary(&summary);
    if summary.was_interrupted() {
        tracing::warn!("Crawl was interrupted; snapshot holds partial results");
    }

    write_snapshot(store.as_ref(), output).context("Failed to write snapshot")?;

    Ok(())
}
