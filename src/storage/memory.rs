//! In-memory storage engines
//!
//! Both engines keep their map behind a `parking_lot::RwLock`: lookups share the
//! lock, inserts take it exclusively.

use crate::storage::traits::{ResultStore, SeenCache, StorageResult};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};

/// Seen cache backed by a `HashSet`
#[derive(Debug, Default)]
pub struct InMemorySeenCache {
    seen: RwLock<HashSet<String>>,
}

impl InMemorySeenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.seen.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.read().is_empty()
    }
}

impl SeenCache for InMemorySeenCache {
    fn seen(&self, url: &str) -> bool {
        self.seen.read().contains(url)
    }

    fn add(&self, url: &str) -> StorageResult<()> {
        self.seen.write().insert(url.to_string());
        Ok(())
    }

    fn check_and_add(&self, url: &str) -> StorageResult<bool> {
        Ok(self.seen.write().insert(url.to_string()))
    }
}

/// Result store backed by a `BTreeMap`, so snapshots come out sorted
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    db: RwLock<BTreeMap<String, Vec<String>>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the links stored for `url`, if it was crawled
    pub fn get(&self, url: &str) -> Option<Vec<String>> {
        self.db.read().get(url).cloned()
    }
}

impl ResultStore for InMemoryResultStore {
    fn store(&self, url: &str, links: &[String]) -> StorageResult<()> {
        self.db.write().insert(url.to_string(), links.to_vec());
        Ok(())
    }

    fn snapshot(&self) -> StorageResult<BTreeMap<String, Vec<String>>> {
        Ok(self.db.read().clone())
    }

    fn len(&self) -> usize {
        self.db.read().len()
    }
}
