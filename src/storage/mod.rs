//! Storage module for crawl bookkeeping
//!
//! This module handles:
//! - The seen cache contract used to suppress duplicate dispatch within a run
//! - The result store contract used to accumulate crawled pages across runs
//! - An engine registry mapping configuration names to constructors
//! - In-memory engines

mod memory;
mod traits;

pub use memory::{InMemoryResultStore, InMemorySeenCache};
pub use traits::{ResultStore, SeenCache, StorageError, StorageResult};

use std::sync::Arc;

/// Name of the in-memory engine for both backends
pub const IN_MEMORY: &str = "in-memory";

/// Constructor for a fresh, empty seen cache
pub type SeenCacheFactory = fn() -> Box<dyn SeenCache>;

/// Constructor for a result store
pub type ResultStoreFactory = fn() -> Arc<dyn ResultStore>;

const SEEN_CACHE_ENGINES: &[(&str, SeenCacheFactory)] =
    &[(IN_MEMORY, new_in_memory_seen_cache as SeenCacheFactory)];

const RESULT_STORE_ENGINES: &[(&str, ResultStoreFactory)] =
    &[(IN_MEMORY, new_in_memory_result_store as ResultStoreFactory)];

fn new_in_memory_seen_cache() -> Box<dyn SeenCache> {
    Box::new(InMemorySeenCache::new())
}

fn new_in_memory_result_store() -> Arc<dyn ResultStore> {
    Arc::new(InMemoryResultStore::new())
}

/// Looks up the constructor for a seen cache engine
///
/// Each frontier run builds its own cache from the returned factory, so no seen state
/// leaks between seeds.
///
/// # Returns
///
/// * `Ok(SeenCacheFactory)` - The engine exists
/// * `Err(StorageError::UnknownEngine)` - No engine is registered under `kind`
pub fn seen_cache_factory(kind: &str) -> StorageResult<SeenCacheFactory> {
    lookup(SEEN_CACHE_ENGINES, "Seen cache", kind)
}

/// Opens the result store engine named `kind`
pub fn open_result_store(kind: &str) -> StorageResult<Arc<dyn ResultStore>> {
    lookup(RESULT_STORE_ENGINES, "Storage", kind).map(|factory| factory())
}

fn lookup<F: Copy>(
    engines: &[(&str, F)],
    what: &'static str,
    kind: &str,
) -> StorageResult<F> {
    engines
        .iter()
        .find(|(name, _)| *name == kind)
        .map(|(_, factory)| *factory)
        .ok_or_else(|| StorageError::UnknownEngine {
            what,
            kind: kind.to_string(),
            available: engines
                .iter()
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
                .join(", "),
        })
}
