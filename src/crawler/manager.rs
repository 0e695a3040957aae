//! Crawl manager: one isolated frontier run per seed

use crate::crawler::frontier::{Frontier, RunReport};
use crate::output::CrawlSummary;
use crate::storage::SeenCacheFactory;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Runs every seed through its own frontier run
///
/// At most `pool_size` runs are active at once. Each run gets a fresh seen cache; the
/// result store behind the frontier is shared by all of them.
pub struct Manager {
    frontier: Arc<Frontier>,
    seen_factory: SeenCacheFactory,
    pool_size: usize,
    cancel: CancellationToken,
}

impl Manager {
    pub fn new(
        frontier: Arc<Frontier>,
        seen_factory: SeenCacheFactory,
        pool_size: usize,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            frontier,
            seen_factory,
            pool_size: pool_size.max(1),
            cancel,
        }
    }

    /// Crawls all seeds and waits for every run to finish
    ///
    /// A run only starts once a pool slot is free and gives the slot back when it ends.
    /// After cancellation no new runs start; runs already going drain on their own.
    pub async fn run(&self, seeds: Vec<String>) -> CrawlSummary {
        let started_at = Utc::now();
        let pool = Arc::new(Semaphore::new(self.pool_size));
        let mut runs: JoinSet<RunReport> = JoinSet::new();
        let total = seeds.len();
        let mut started = 0usize;

        tracing::info!(
            "Crawling {} seeds with up to {} concurrent runs",
            total,
            self.pool_size
        );

        for seed in seeds {
            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::info!("Crawl cancelled, not starting {} remaining seeds", total - started);
                    break;
                }
                permit = Arc::clone(&pool).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(e) => {
                        tracing::error!("Run pool closed: {}", e);
                        break;
                    }
                },
            };

            let frontier = Arc::clone(&self.frontier);
            let seen = (self.seen_factory)();
            tracing::debug!("Starting run for {}", seed);

            runs.spawn(async move {
                let report = frontier.run(vec![seed], seen.as_ref()).await;
                drop(permit);
                report
            });
            started += 1;
        }

        let mut reports = Vec::with_capacity(started);
        let mut lost = 0usize;

        while let Some(joined) = runs.join_next().await {
            match joined {
                Ok(report) => {
                    if !report.final_state.is_terminal() {
                        tracing::warn!(
                            "Run for {:?} returned in state {}",
                            report.seeds,
                            report.final_state
                        );
                    }
                    reports.push(report);
                }
                Err(e) => {
                    tracing::error!("Frontier run failed: {}", e);
                    lost += 1;
                }
            }
        }

        CrawlSummary::from_reports(&reports, lost, total - started, started_at, Utc::now())
    }
}
