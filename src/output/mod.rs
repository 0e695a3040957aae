//! Output module for crawl results
//!
//! This module handles:
//! - Emitting the result store snapshot to stdout or a file
//! - Summarizing the crawl from its run reports

pub mod stats;

pub use stats::{log_summary, CrawlSummary};

use crate::storage::ResultStore;
use crate::Result;
use std::io::Write;
use std::path::Path;

/// Writes the result store snapshot
///
/// # Arguments
///
/// * `store` - The store to dump
/// * `destination` - Output file; stdout when `None`
///
/// # Returns
///
/// * `Ok(())` - The snapshot was written
/// * `Err(CrawlError)` - Serialization or IO failed
pub fn write_snapshot(store: &dyn ResultStore, destination: Option<&Path>) -> Result<()> {
    let dump = store.dump()?;

    match destination {
        Some(path) => {
            std::fs::write(path, format!("{}\n", dump))?;
            tracing::info!("Wrote {} results to {}", store.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", dump)?;
            handle.flush()?;
        }
    }

    Ok(())
}
