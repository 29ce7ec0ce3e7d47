//! Response Cache
//!
//! TTL-bounded key/value store mapping an endpoint id plus the raw query
//! parameters to a previously computed payload. Shared by every worker:
//! `DashMap` gives lock-free concurrent `get`/`set`, and entries hold their
//! payload behind an `Arc` so they are published atomically and replaced
//! wholesale, never mutated in place.
//!
//! Expired entries are dropped lazily on `get` and swept periodically by a
//! background task. Errors are never stored, and identical concurrent
//! misses are not coalesced — both run the aggregation (accepted gap,
//! see DESIGN.md).

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

struct CacheEntry<V> {
    value: Arc<V>,
    created_at: Instant,
}

/// TTL-bounded concurrent response cache
pub struct ResponseCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

impl<V> ResponseCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Look up a fresh entry; expired entries are evicted on the spot
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let expired = match self.entries.get(key) {
            Some(entry) => {
                if entry.created_at.elapsed() < self.ttl {
                    return Some(entry.value.clone());
                }
                true
            }
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    /// Store a payload, replacing any previous entry for the key
    pub fn set(&self, key: impl Into<String>, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries.insert(
            key.into(),
            CacheEntry {
                value: value.clone(),
                created_at: Instant::now(),
            },
        );
        value
    }

    /// Drop every entry (explicit invalidation endpoint)
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove expired entries; returns how many were dropped
    pub fn sweep_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.created_at.elapsed() < self.ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.set("k", 42);
        assert_eq!(cache.get("k").as_deref(), Some(&42));
    }

    #[test]
    fn miss_after_expiry_and_entry_is_evicted() {
        let cache = ResponseCache::new(Duration::from_millis(10));
        cache.set("k", 1);
        std::thread::sleep(Duration::from_millis(25));
        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn set_replaces_wholesale() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.set("k", 1);
        cache.set("k", 2);
        assert_eq!(cache.get("k").as_deref(), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.set("a", 1);
        cache.set("b", 2);
        cache.clear();
        assert!(cache.get("a").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn sweep_removes_only_expired() {
        let cache = ResponseCache::new(Duration::from_millis(30));
        cache.set("old", 1);
        std::thread::sleep(Duration::from_millis(40));
        cache.set("new", 2);
        assert_eq!(cache.sweep_expired(), 1);
        assert_eq!(cache.get("new").as_deref(), Some(&2));
    }

    #[test]
    fn concurrent_readers_and_writers() {
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(60)));
        let mut handles = Vec::new();
        for i in 0..8 {
            let cache = cache.clone();
            handles.push(std::thread::spawn(move || {
                for j in 0..100 {
                    cache.set(format!("k{}", j % 10), i * 1000 + j);
                    let _ = cache.get(&format!("k{}", j % 10));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 10);
    }
}
