//! Storage traits and error types
//!
//! This module defines the capability contracts for the seen cache and the result
//! store. Implementations must be safe to share between tasks.

use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{what} engine '{kind}' not supported (available: {available})")]
    UnknownEngine {
        what: &'static str,
        kind: String,
        available: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Tracks URLs that have already been dispatched
pub trait SeenCache: Send + Sync {
    /// Returns true if `url` has been added before
    fn seen(&self, url: &str) -> bool;

    /// Records `url` as seen; adding the same URL twice is not an error
    fn add(&self, url: &str) -> StorageResult<()>;

    /// Records `url` and reports whether it was new
    ///
    /// Returns `Ok(true)` if the URL was not seen before. An `Err` means the URL was
    /// not seen before but recording it failed. Engines that can answer and insert
    /// under one lock should override this so concurrent callers never both get
    /// `Ok(true)` for the same URL.
    fn check_and_add(&self, url: &str) -> StorageResult<bool> {
        if self.seen(url) {
            return Ok(false);
        }
        self.add(url)?;
        Ok(true)
    }
}

/// Records the links extracted from every crawled page
pub trait ResultStore: Send + Sync {
    /// Records the links found on `url`, replacing any earlier entry
    fn store(&self, url: &str, links: &[String]) -> StorageResult<()>;

    /// Returns a sorted copy of every stored entry
    fn snapshot(&self) -> StorageResult<BTreeMap<String, Vec<String>>>;

    /// Number of crawled URLs stored so far
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializes the full state as tab-indented JSON with keys in sorted order
    fn dump(&self) -> StorageResult<String> {
        let snapshot = self.snapshot()?;
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        serde::Serialize::serialize(&snapshot, &mut serializer)?;
        String::from_utf8(buf).map_err(|e| StorageError::Backend(e.to_string()))
    }
}
