//! Crawl summary statistics
//!
//! Aggregates the per-seed run reports into one summary for the whole crawl.

use crate::crawler::RunReport;
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Number of frontier runs that finished
    pub runs: usize,

    /// Runs that stopped because the crawl was cancelled
    pub runs_cancelled: usize,

    /// Runs whose task panicked
    pub runs_lost: usize,

    /// Seeds that never got a run because the crawl was cancelled first
    pub seeds_skipped: usize,

    pub jobs_dispatched: usize,
    pub pages_fetched: usize,
    pub pages_failed: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlSummary {
    /// Builds a summary from finished run reports
    ///
    /// # Arguments
    ///
    /// * `reports` - One report per finished run
    /// * `runs_lost` - Runs that panicked and produced no report
    /// * `seeds_skipped` - Seeds for which no run was started
    pub fn from_reports(
        reports: &[RunReport],
        runs_lost: usize,
        seeds_skipped: usize,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            runs: reports.len(),
            runs_cancelled: reports.iter().filter(|r| r.cancelled).count(),
            runs_lost,
            seeds_skipped,
            jobs_dispatched: reports.iter().map(|r| r.dispatched).sum(),
            pages_fetched: reports.iter().map(|r| r.fetched).sum(),
            pages_failed: reports.iter().map(|r| r.failed).sum(),
            started_at,
            finished_at,
        }
    }

    /// Wall-clock duration of the crawl in milliseconds
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Returns true if any part of the crawl was cut short
    pub fn was_interrupted(&self) -> bool {
        self.runs_cancelled > 0 || self.seeds_skipped > 0
    }

    /// Share of fetched pages among all attempted jobs, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_fetched + self.pages_failed;
        if attempted > 0 {
            (self.pages_fetched as f64 / attempted as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Logs the summary at info level
pub fn log_summary(summary: &CrawlSummary) {
    tracing::info!("=== Crawl Summary ===");
    tracing::info!(
        "Runs: {} finished, {} cancelled, {} lost, {} seeds skipped",
        summary.runs,
        summary.runs_cancelled,
        summary.runs_lost,
        summary.seeds_skipped
    );
    tracing::info!(
        "Jobs: {} dispatched, {} fetched, {} failed ({:.1}% success)",
        summary.jobs_dispatched,
        summary.pages_fetched,
        summary.pages_failed,
        summary.success_rate()
    );
    tracing::info!(
        "Started {}, finished {} ({} ms)",
        summary.started_at.to_rfc3339(),
        summary.finished_at.to_rfc3339(),
        summary.duration_ms()
    );
}
