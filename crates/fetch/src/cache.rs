//! In-memory response cache with TTL staleness and bounded capacity.
//!
//! Keys are normalized request URLs; values are raw response bodies. The
//! cache is process-wide state owned by the fetcher: initialized empty at
//! construction, cleared only by eviction or teardown, never persisted.
//! Concurrent read-then-write races on the same key resolve to "last
//! successful fetch wins".

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::trace;

#[derive(Debug, Clone)]
struct CacheEntry {
    fetched_at: Instant,
    body: Vec<u8>,
}

#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    capacity: usize,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fresh body for `key`, or `None` when absent or older than the TTL.
    /// Stale entries are dropped on the way out.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.fetched_at.elapsed() <= self.ttl => return Some(entry.body.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Entry exists but is stale; evict it under the write lock. Another
        // session may have refreshed it in between, so re-check the age.
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if entry.fetched_at.elapsed() <= self.ttl {
                return Some(entry.body.clone());
            }
            trace!(key, "evicting stale cache entry");
            entries.remove(key);
        }
        None
    }

    /// Store or refresh an entry, evicting the oldest when at capacity.
    pub async fn insert(&self, key: String, body: Vec<u8>) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.write().await;
        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            let oldest = entries.iter().min_by_key(|(_, entry)| entry.fetched_at).map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                trace!(key = oldest, "evicting oldest cache entry at capacity");
                entries.remove(&oldest);
            }
        }
        entries.insert(key, CacheEntry { fetched_at: Instant::now(), body });
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
