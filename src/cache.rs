/// In-memory response caching
///
/// This module handles:
/// - A TTL cache keyed by any hashable key
/// - `CachedSource`, a `SourceDataProvider` wrapper that caches search
///   results by query text and raw tables by stable key
///
/// Entries are immutable once written, and recomputing on a miss is
/// idempotent, so a plain mutex around the map is all the locking needed.
use crate::error::ProviderError;
use crate::provider::{SearchOutcome, SourceDataProvider};
use crate::types::RawTable;
use log::debug;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: Mutex::new(HashMap::new()) }
    }

    /// Fresh value for `key`, evicting it if it has expired
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some((stored, value)) if stored.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, (Instant::now(), value));
    }

    /// Cached value, or compute it with `f` and cache it if it succeeds.
    ///
    /// The lock is not held while `f` runs; two callers missing the same key
    /// both compute and the later write wins.
    pub fn get_or_try_insert_with<E, F>(&self, key: K, f: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = f()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Caching decorator around a source provider. Only successful responses are cached.
pub struct CachedSource<S> {
    inner: S,
    searches: TtlCache<String, SearchOutcome>,
    tables: TtlCache<String, Option<RawTable>>,
}

impl<S: SourceDataProvider> CachedSource<S> {
    pub fn new(inner: S, search_ttl: Duration, table_ttl: Duration) -> Self {
        Self { inner, searches: TtlCache::new(search_ttl), tables: TtlCache::new(table_ttl) }
    }
}

impl<S: SourceDataProvider> SourceDataProvider for CachedSource<S> {
    fn search(&self, query: &str) -> Result<SearchOutcome, ProviderError> {
        self.searches.get_or_try_insert_with(query.to_string(), || {
            debug!("search cache miss for {:?}", query);
            self.inner.search(query)
        })
    }

    fn fetch_roster_table(&self, stable_key: &str, display_name: &str) -> Result<Option<RawTable>, ProviderError> {
        self.tables.get_or_try_insert_with(stable_key.to_string(), || {
            debug!("table cache miss for {}", stable_key);
            self.inner.fetch_roster_table(stable_key, display_name)
        })
    }
}
