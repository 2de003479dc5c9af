use crate::algorithm::search::{ExtremalResult, SearchKey, extremal_search};
use crate::algorithm::variants::{RankedCandidates, rank_candidates};
use crate::io::error::{Result, computation_error};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Memoization of search results shared by every request of a process
///
/// Entries are keyed exactly by `(size, low, high)` (plus `k` for ranked
/// pools) and are never evicted. The lock is only held for lookups and
/// inserts; two callers racing on the same key may both search, and the
/// first insert wins.
#[derive(Default)]
pub struct MatrixCache {
    extremal: Mutex<HashMap<SearchKey, Arc<ExtremalResult>>>,
    ranked: Mutex<HashMap<(SearchKey, usize), Arc<RankedCandidates>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

/// Snapshot of cache effectiveness
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
}

impl MatrixCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Extremal matrices for `key`, searching on first use
    ///
    /// # Errors
    ///
    /// Returns an error if the search rejects the key or the lock is poisoned
    pub fn extremal(&self, key: SearchKey) -> Result<Arc<ExtremalResult>> {
        self.get_or_compute(&self.extremal, key, || extremal_search(key))
    }

    /// Ranked top/bottom-`k` pool for `key`, enumerating on first use
    ///
    /// # Errors
    ///
    /// Returns an error if the search rejects the key or the lock is poisoned
    pub fn ranked(&self, key: SearchKey, k: usize) -> Result<Arc<RankedCandidates>> {
        self.get_or_compute(&self.ranked, (key, k), || rank_candidates(key, k))
    }

    /// Current hit/miss counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Number of memoized extremal results
    pub fn len(&self) -> usize {
        self.extremal.lock().map_or(0, |map| map.len())
    }

    /// Whether no extremal result has been memoized yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_or_compute<K, V, F>(
        &self,
        map: &Mutex<HashMap<K, Arc<V>>>,
        key: K,
        compute_fn: F,
    ) -> Result<Arc<V>>
    where
        K: Eq + Hash + std::fmt::Debug,
        F: FnOnce() -> Result<V>,
    {
        {
            let guard = map
                .lock()
                .map_err(|e| computation_error("matrix cache lookup", &e))?;
            if let Some(found) = guard.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(?key, "matrix cache hit");
                return Ok(Arc::clone(found));
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(?key, "matrix cache miss");
        let computed = Arc::new(compute_fn()?);

        let mut guard = map
            .lock()
            .map_err(|e| computation_error("matrix cache insert", &e))?;
        Ok(Arc::clone(guard.entry(key).or_insert(computed)))
    }
}
