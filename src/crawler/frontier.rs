//! Frontier scheduler
//!
//! One call to [`Frontier::run`] crawls outward from a set of seeds, one breadth level
//! at a time:
//! - A fixed pool of workers waits on a shared job channel
//! - Each worker fetches a page, stores its links and publishes the outcome
//! - The dispatch loop hands out a level's jobs and collects every publication of that
//!   level before it admits the next level through the run's seen cache
//!
//! Levels are strictly sequential: a link found at level N is only ever dispatched as
//! part of level N+1, so a run with depth budget D never dispatches anything further
//! than D hops from its seeds.

use crate::config::FrontierConfig;
use crate::crawler::page::PageCrawler;
use crate::crawler::{CrawlJob, CrawlResult};
use crate::state::RunState;
use crate::storage::{ResultStore, SeenCache};
use crate::url::normalize_url;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Message sent to the dispatch loop on the publish channel
///
/// Every dispatched job publishes exactly one `Crawled` or `Failed`, which is how the
/// dispatch loop knows a level has drained.
#[derive(Debug)]
enum Publication {
    /// The initial batch of a run
    Seeds(Vec<String>),
    Crawled(CrawlResult),
    Failed(String),
}

/// Outcome of a single frontier run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub seeds: Vec<String>,

    /// Breadth levels whose every job completed
    pub levels: u32,

    pub dispatched: usize,
    pub fetched: usize,
    pub failed: usize,

    /// Jobs whose worker died before publishing
    pub lost: usize,

    pub cancelled: bool,
    pub final_state: RunState,
}

impl RunReport {
    fn new(seeds: Vec<String>) -> Self {
        Self {
            seeds,
            levels: 0,
            dispatched: 0,
            fetched: 0,
            failed: 0,
            lost: 0,
            cancelled: false,
            final_state: RunState::Initializing,
        }
    }
}

/// Per-seed crawl scheduler
///
/// A `Frontier` holds only immutable collaborators, so a single instance can serve any
/// number of concurrent runs; all per-run state lives inside [`Frontier::run`].
pub struct Frontier {
    crawler: Arc<PageCrawler>,
    store: Arc<dyn ResultStore>,
    config: FrontierConfig,
    cancel: CancellationToken,
}

impl Frontier {
    pub fn new(
        crawler: Arc<PageCrawler>,
        store: Arc<dyn ResultStore>,
        config: FrontierConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            crawler,
            store,
            config,
            cancel,
        }
    }

    /// Crawls outward from `seeds` until the depth budget is spent, no new links turn
    /// up, or the crawl is cancelled
    ///
    /// `seen` must be private to this run. The run always reaches
    /// [`RunState::Terminated`] with every worker joined, whatever happens to its jobs.
    pub async fn run(&self, seeds: Vec<String>, seen: &dyn SeenCache) -> RunReport {
        let mut report = RunReport::new(seeds.clone());
        let mut state = RunState::Initializing;

        let (publish_tx, mut publish_rx) =
            mpsc::channel::<Publication>(self.config.publish_queue_size.max(1));
        // Capacity 1 is the smallest tokio allows; a worker can be at most one job ahead
        let (job_tx, job_rx) = mpsc::channel::<CrawlJob>(1);
        let job_rx = Arc::new(Mutex::new(job_rx));
        let shutdown = self.cancel.child_token();

        let seeds = seeds.iter().map(|seed| normalize_url(seed)).collect();
        if let Err(e) = publish_tx.try_send(Publication::Seeds(seeds)) {
            tracing::error!("Failed to inject seeds: {}", e);
        }

        let mut workers = JoinSet::new();
        for id in 0..self.config.max_concurrency.max(1) {
            workers.spawn(worker(
                id,
                Arc::clone(&self.crawler),
                Arc::clone(&self.store),
                Arc::clone(&job_rx),
                publish_tx.clone(),
                shutdown.clone(),
            ));
        }
        drop(publish_tx);

        let mut discovered = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            publication = publish_rx.recv() => match publication {
                Some(Publication::Seeds(seeds)) => Some(seeds),
                _ => None,
            },
        };

        if discovered.is_some() {
            advance(&mut state, RunState::Dispatching);
        }

        let mut level: u32 = 0;
        let mut budget = self.config.max_depth;

        while let Some(links) = discovered.take() {
            let jobs = admit(links, level, seen);
            if jobs.is_empty() {
                tracing::debug!("No new links at depth {}, stopping", level);
                break;
            }

            tracing::debug!("Dispatching {} jobs at depth {}", jobs.len(), level);

            let Some(next) = self
                .dispatch_level(jobs, &job_tx, &mut publish_rx, &mut workers, &mut report)
                .await
            else {
                break;
            };

            report.levels += 1;
            if budget == 0 {
                tracing::debug!("Depth budget spent after depth {}", level);
                break;
            }
            budget -= 1;
            level += 1;
            discovered = Some(next);
        }

        if self.cancel.is_cancelled() {
            report.cancelled = true;
        }

        advance(&mut state, RunState::Draining);
        shutdown.cancel();
        drop(job_tx);
        drop(publish_rx);

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker failed during shutdown: {}", e);
            }
        }

        advance(&mut state, RunState::Terminated);
        report.final_state = state;

        tracing::info!(
            "Run for {:?} finished: {} levels, {} fetched, {} failed{}",
            report.seeds,
            report.levels,
            report.fetched,
            report.failed,
            if report.cancelled { " (cancelled)" } else { "" }
        );

        report
    }

    /// Hands out one level's jobs and collects the links they publish
    ///
    /// Publications are received while jobs are still being handed out, so workers never
    /// stall on a full publish channel. Returns `None` if the level could not finish:
    /// the crawl was cancelled or no worker is left.
    async fn dispatch_level(
        &self,
        mut pending: VecDeque<CrawlJob>,
        job_tx: &mpsc::Sender<CrawlJob>,
        publish_rx: &mut mpsc::Receiver<Publication>,
        workers: &mut JoinSet<()>,
        report: &mut RunReport,
    ) -> Option<Vec<String>> {
        let mut outstanding = 0usize;
        let mut discovered = Vec::new();

        while !pending.is_empty() || outstanding > 0 {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    tracing::debug!("Cancelled with {} jobs in flight", outstanding);
                    report.cancelled = true;
                    return None;
                }

                publication = publish_rx.recv(), if outstanding > 0 => match publication {
                    Some(Publication::Crawled(result)) => {
                        outstanding -= 1;
                        report.fetched += 1;
                        discovered.extend(result.links);
                    }
                    Some(Publication::Failed(_)) => {
                        outstanding -= 1;
                        report.failed += 1;
                    }
                    Some(Publication::Seeds(_)) => {
                        tracing::warn!("Ignoring seed batch published mid-run");
                    }
                    None => {
                        tracing::error!("Publish channel closed with {} jobs in flight", outstanding);
                        return None;
                    }
                },

                permit = job_tx.reserve(), if !pending.is_empty() => match permit {
                    Ok(permit) => {
                        if let Some(job) = pending.pop_front() {
                            permit.send(job);
                            outstanding += 1;
                            report.dispatched += 1;
                        }
                    }
                    Err(_) => {
                        tracing::error!("Job channel closed with {} jobs pending", pending.len());
                        return None;
                    }
                },

                joined = workers.join_next(), if !workers.is_empty() => {
                    match joined {
                        Some(Err(e)) => {
                            tracing::error!("Worker lost its job: {}", e);
                            outstanding = outstanding.saturating_sub(1);
                            report.lost += 1;
                        }
                        _ => tracing::debug!("Worker exited mid-level"),
                    }
                    if workers.is_empty() {
                        tracing::error!("No workers left, abandoning level");
                        return None;
                    }
                }
            }
        }

        Some(discovered)
    }
}

/// Turns a level's discovered links into jobs, skipping anything this run has seen
///
/// This is the only place the run's seen cache is consulted, and `check_and_add`
/// answers and records in one step, so a URL becomes a job at most once.
fn admit(links: Vec<String>, depth: u32, seen: &dyn SeenCache) -> VecDeque<CrawlJob> {
    let mut jobs = VecDeque::new();

    for url in links {
        match seen.check_and_add(&url) {
            Ok(true) => jobs.push_back(CrawlJob { url, depth }),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Failed to mark {} as seen, dispatching anyway: {}", url, e);
                jobs.push_back(CrawlJob { url, depth });
            }
        }
    }

    jobs
}

fn advance(state: &mut RunState, next: RunState) {
    if state.can_transition_to(next) {
        tracing::debug!("Run state {} -> {}", state, next);
        *state = next;
    } else {
        tracing::warn!("Illegal run state transition {} -> {}", state, next);
    }
}

async fn next_job(jobs: &Mutex<mpsc::Receiver<CrawlJob>>) -> Option<CrawlJob> {
    jobs.lock().await.recv().await
}

/// Worker loop: claim a job, crawl it, store and publish the outcome
///
/// Exits when shutdown fires (at any wait: job, fetch or publish) or when the job
/// channel closes. Job failures are logged and never end the loop.
async fn worker(
    id: usize,
    crawler: Arc<PageCrawler>,
    store: Arc<dyn ResultStore>,
    jobs: Arc<Mutex<mpsc::Receiver<CrawlJob>>>,
    publish_tx: mpsc::Sender<Publication>,
    shutdown: CancellationToken,
) {
    loop {
        let job = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            job = next_job(&jobs) => match job {
                Some(job) => job,
                None => break,
            },
        };

        let outcome = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            outcome = crawler.crawl(&job.url) => outcome,
        };

        let publication = match outcome {
            Ok(result) => {
                if let Err(e) = store.store(&result.url, &result.links) {
                    tracing::warn!("Failed to store result for {}: {}", result.url, e);
                }
                Publication::Crawled(result)
            }
            Err(e) if e.is_cancelled() => {
                tracing::debug!("Worker {}: {}", id, e);
                Publication::Failed(job.url)
            }
            Err(e) => {
                tracing::error!("Failed to crawl {} (depth {}): {}", job.url, job.depth, e);
                Publication::Failed(job.url)
            }
        };

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            sent = publish_tx.send(publication) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }

    tracing::debug!("Worker {} exiting", id);
}
