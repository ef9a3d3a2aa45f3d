//! TTL-bounded memoization of resolved prices.
//!
//! This is an approximate cache, not a store of record. Writes are
//! best-effort: when the cache is at capacity and nothing can be evicted,
//! the write is dropped. Callers must treat a miss as "fetch again", never
//! as a correctness violation, and must not assume a `get` immediately
//! after a `set` observes the write.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// How many entries an eviction pass inspects before giving up.
const EVICTION_SAMPLE: usize = 8;

struct CacheEntry {
    value: f64,
    expires_at: Instant,
    /// Logical clock value of the last touch; evictions prefer the
    /// smallest one seen in a sample.
    touched: AtomicU64,
}

/// Concurrent price cache with a global TTL and a bounded entry count.
///
/// Every entry costs one unit against `capacity`. Eviction order is
/// approximate (a sample biased to the least recently touched entry),
/// not strict LRU. All bookkeeping is internally synchronized; the cache
/// is shared by reference across batches.
pub struct PriceCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    capacity: usize,
    tick: AtomicU64,
}

impl PriceCache {
    /// Create a cache applying `ttl` to every write, holding at most
    /// `capacity` entries.
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            capacity,
            tick: AtomicU64::new(0),
        }
    }

    fn next_tick(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::Relaxed)
    }

    /// Record `value` for `key` with the configured TTL.
    ///
    /// Best-effort: returns `false` when the write was dropped because the
    /// cache was full and no entry could be evicted. A `false` here is a
    /// normal outcome, not an error.
    pub fn set(&self, key: &str, value: f64) -> bool {
        // Replacing an existing entry reuses its cost unit; only fresh keys
        // are subject to the capacity check.
        if !self.entries.contains_key(key) {
            if self.entries.len() >= self.capacity {
                self.evict_expired();
            }
            if self.entries.len() >= self.capacity && !self.evict_one_stale() {
                return false;
            }
        }

        self.entries.insert(
            key.to_owned(),
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
                touched: AtomicU64::new(self.next_tick()),
            },
        );
        true
    }

    /// Look up `key`, treating expired entries as absent.
    ///
    /// `None` means never set, evicted, or expired; the three are
    /// indistinguishable.
    pub fn get(&self, key: &str) -> Option<f64> {
        let expired = match self.entries.get(key) {
            Some(entry) => {
                if entry.expires_at > Instant::now() {
                    entry.touched.store(self.next_tick(), Ordering::Relaxed);
                    return Some(entry.value);
                }
                true
            }
            None => false,
        };

        if expired {
            self.entries.remove_if(key, |_, entry| entry.expires_at <= Instant::now());
        }
        None
    }

    /// Drop every entry. Reset tooling only; the main flow never calls this.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of live entries, counting any not yet lazily expired.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove entries whose deadline has passed.
    fn evict_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    /// Evict the least recently touched entry from a small sample.
    ///
    /// Returns `false` when nothing could be removed.
    fn evict_one_stale(&self) -> bool {
        let victim = self
            .entries
            .iter()
            .take(EVICTION_SAMPLE)
            .min_by_key(|entry| entry.touched.load(Ordering::Relaxed))
            .map(|entry| entry.key().clone());

        match victim {
            Some(key) => self.entries.remove(&key).is_some(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with_ttl_ms(ms: u64) -> PriceCache {
        PriceCache::new(Duration::from_millis(ms), 16)
    }

    #[test]
    fn stores_and_returns_values() {
        let cache = cache_with_ttl_ms(10_000);
        assert!(cache.set("VTI", 250.5));
        assert_eq!(cache.get("VTI"), Some(250.5));
    }

    #[test]
    fn missing_key_is_none() {
        let cache = cache_with_ttl_ms(10_000);
        assert_eq!(cache.get("VGT"), None);
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = cache_with_ttl_ms(20);
        assert!(cache.set("VTI", 250.5));
        assert_eq!(cache.get("VTI"), Some(250.5));

        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(cache.get("VTI"), None);
        // The lazy removal actually freed the slot.
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let cache = cache_with_ttl_ms(10_000);
        cache.set("VTI", 1.0);
        cache.set("VGT", 2.0);
        cache.clear();
        assert_eq!(cache.get("VTI"), None);
        assert_eq!(cache.get("VGT"), None);
    }

    #[test]
    fn overwrite_keeps_single_entry() {
        let cache = cache_with_ttl_ms(10_000);
        cache.set("VTI", 1.0);
        cache.set("VTI", 2.0);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("VTI"), Some(2.0));
    }

    #[test]
    fn full_cache_evicts_least_recently_touched() {
        let cache = PriceCache::new(Duration::from_secs(60), 2);
        assert!(cache.set("OLD", 1.0));
        assert!(cache.set("WARM", 2.0));

        // Touch OLD so WARM becomes the stalest entry.
        assert_eq!(cache.get("OLD"), Some(1.0));

        assert!(cache.set("NEW", 3.0));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("OLD"), Some(1.0));
        assert_eq!(cache.get("NEW"), Some(3.0));
        assert_eq!(cache.get("WARM"), None);
    }

    #[test]
    fn full_cache_prefers_reclaiming_expired_entries() {
        let cache = PriceCache::new(Duration::from_millis(20), 2);
        cache.set("A", 1.0);
        cache.set("B", 2.0);
        std::thread::sleep(Duration::from_millis(50));

        assert!(cache.set("C", 3.0));
        assert_eq!(cache.get("C"), Some(3.0));
        assert_eq!(cache.get("A"), None);
        assert_eq!(cache.get("B"), None);
    }
}
