//! In-memory TTL store.
//!
//! Plain data structure with no locking of its own; the gateway owns it
//! behind its state mutex. Time is passed in by the caller so lookups and
//! inserts made under one lock agree on "now".

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

/// Expiry used when `now + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Cache entry with absolute expiry.
#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// Outcome of a store lookup.
#[derive(Debug, PartialEq)]
pub(crate) enum Lookup<V> {
    /// Entry present and fresh.
    Fresh(V),
    /// Entry was present but stale; it has been removed.
    Expired,
    /// No entry for the key.
    Miss,
}

/// URL-keyed TTL store.
#[derive(Debug)]
pub(crate) struct CacheStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V: Clone> CacheStore<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Looks up `key`, evicting it if stale.
    pub(crate) fn lookup(&mut self, key: &str, now: Instant) -> Lookup<V> {
        match self.entries.get(key) {
            None => Lookup::Miss,
            Some(entry) if entry.is_expired(now) => {
                self.entries.remove(key);
                Lookup::Expired
            }
            Some(entry) => Lookup::Fresh(entry.value.clone()),
        }
    }

    /// Inserts or overwrites the entry for `key`.
    pub(crate) fn insert(&mut self, key: String, value: V, now: Instant, ttl: Duration) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: now.checked_add(ttl).unwrap_or_else(|| now + FAR_FUTURE),
            },
        );
    }

    pub(crate) fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub(crate) fn stats(&self, now: Instant) -> CacheStats {
        let expired = self.entries.values().filter(|e| e.is_expired(now)).count();
        CacheStats {
            total_entries: self.entries.len(),
            expired_entries: expired,
            valid_entries: self.entries.len().saturating_sub(expired),
            in_flight: 0,
        }
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently held, fresh or not
    pub total_entries: usize,
    /// Entries past their expiry that have not been read since
    pub expired_entries: usize,
    /// Entries that would be served from memory
    pub valid_entries: usize,
    /// Keys with a fetch currently running
    pub in_flight: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_millis(1000);

    #[test]
    fn test_store_insert_lookup() {
        let now = Instant::now();
        let mut store = CacheStore::new();
        store.insert("a".into(), 1u32, now, TTL);
        assert_eq!(store.lookup("a", now), Lookup::Fresh(1));
        assert_eq!(store.lookup("a", now + Duration::from_millis(999)), Lookup::Fresh(1));
    }

    #[test]
    fn test_store_miss() {
        let mut store: CacheStore<u32> = CacheStore::new();
        assert_eq!(store.lookup("nonexistent", Instant::now()), Lookup::Miss);
    }

    #[test]
    fn test_store_expiry_is_inclusive_and_evicts() {
        let now = Instant::now();
        let mut store = CacheStore::new();
        store.insert("a".into(), 1u32, now, TTL);

        assert_eq!(store.lookup("a", now + TTL), Lookup::Expired);
        assert_eq!(store.stats(now).total_entries, 0);
        assert_eq!(store.lookup("a", now), Lookup::Miss);
    }

    #[test]
    fn test_store_overwrite_refreshes_expiry() {
        let now = Instant::now();
        let later = now + Duration::from_millis(800);
        let mut store = CacheStore::new();
        store.insert("a".into(), 1u32, now, TTL);
        store.insert("a".into(), 2u32, later, TTL);

        assert_eq!(store.stats(later).total_entries, 1);
        assert_eq!(store.lookup("a", now + Duration::from_millis(1500)), Lookup::Fresh(2));
    }

    #[test]
    fn test_store_huge_ttl_saturates() {
        let now = Instant::now();
        let mut store = CacheStore::new();
        store.insert("a".into(), 1u32, now, Duration::MAX);
        assert_eq!(store.lookup("a", now + Duration::from_secs(3600)), Lookup::Fresh(1));
    }

    #[test]
    fn test_store_remove() {
        let mut store = CacheStore::new();
        store.insert("a".into(), 1u32, Instant::now(), TTL);
        assert!(store.remove("a"));
        assert!(!store.remove("a"));
    }

    #[test]
    fn test_store_stats() {
        let now = Instant::now();
        let mut store = CacheStore::new();
        store.insert("a".into(), 1u32, now, Duration::from_millis(10));
        store.insert("b".into(), 2u32, now, TTL);

        let stats = store.stats(now + Duration::from_millis(20));
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.expired_entries, 1);
        assert_eq!(stats.valid_entries, 1);
    }
}
