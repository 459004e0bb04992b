// In-memory cache store.
// One slot per key, TTL checked lazily on read, stale writes rejected by sequence.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::github::{Contributor, Readme, RepositoryInfo};

/// Default TTL for cached upstream data: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Cache slot identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    RepositoryInfo,
    Contributors,
    Readme,
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::RepositoryInfo => f.write_str("repository"),
            CacheKey::Contributors => f.write_str("contributors"),
            CacheKey::Readme => f.write_str("readme"),
        }
    }
}

/// Anything the cache can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
    Repository(RepositoryInfo),
    Contributors(Vec<Contributor>),
    Readme(Readme),
}

/// A cached value with its storage metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<T> {
    /// The cached data.
    pub data: T,
    /// When the data was stored.
    pub cached_at: DateTime<Utc>,
    /// Ticket of the request that produced the data.
    pub sequence: u64,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, cached_at: DateTime<Utc>, sequence: u64) -> Self {
        Self {
            data,
            cached_at,
            sequence,
        }
    }

    /// Fresh while `now - cached_at < ttl`. A clock that went backwards
    /// counts as zero elapsed time.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let elapsed = now
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::ZERO);

        elapsed < ttl
    }
}

#[derive(Debug, Default)]
struct Slot {
    /// Last ticket handed out for this key.
    issued: u64,
    entry: Option<CacheEntry<CachedValue>>,
}

/// Process-local cache. Entries are only ever replaced wholesale.
#[derive(Debug, Default)]
pub struct MemoryCache {
    slots: HashMap<CacheKey, Slot>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next request sequence number for `key`.
    pub fn ticket(&mut self, key: &CacheKey) -> u64 {
        let slot = self.slots.entry(key.clone()).or_default();
        slot.issued += 1;
        slot.issued
    }

    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry<CachedValue>> {
        self.slots.get(key).and_then(|slot| slot.entry.clone())
    }

    /// Store a fetched value unless a newer request already stored one.
    /// Returns whether the value was kept.
    pub fn store(
        &mut self,
        key: &CacheKey,
        value: CachedValue,
        ticket: u64,
        now: DateTime<Utc>,
    ) -> bool {
        let slot = self.slots.entry(key.clone()).or_default();
        if slot
            .entry
            .as_ref()
            .is_some_and(|existing| existing.sequence > ticket)
        {
            return false;
        }
        slot.issued = slot.issued.max(ticket);
        slot.entry = Some(CacheEntry::new(value, now, ticket));
        true
    }

    /// Drop the entry for one key. Ticket numbering keeps counting.
    pub fn invalidate(&mut self, key: &CacheKey) {
        if let Some(slot) = self.slots.get_mut(key) {
            slot.entry = None;
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        for slot in self.slots.values_mut() {
            slot.entry = None;
        }
    }

    pub fn len(&self) -> usize {
        self.slots.values().filter(|slot| slot.entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readme(content: &str) -> CachedValue {
        CachedValue::Readme(Readme {
            content: content.to_string(),
        })
    }

    #[test]
    fn test_fresh_until_ttl_elapses() {
        let t0 = Utc::now();
        let entry = CacheEntry::new("data", t0, 1);

        assert!(entry.is_fresh(t0 + chrono::Duration::seconds(299), DEFAULT_TTL));
        assert!(!entry.is_fresh(t0 + chrono::Duration::seconds(300), DEFAULT_TTL));
        assert!(!entry.is_fresh(t0 + chrono::Duration::seconds(301), DEFAULT_TTL));
    }

    #[test]
    fn test_clock_skew_counts_as_fresh() {
        let t0 = Utc::now();
        let entry = CacheEntry::new("data", t0, 1);
        assert!(entry.is_fresh(t0 - chrono::Duration::seconds(30), DEFAULT_TTL));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut cache = MemoryCache::new();
        let now = Utc::now();
        let key = CacheKey::Readme;

        let ticket = cache.ticket(&key);
        assert!(cache.store(&key, readme("v1"), ticket, now));

        assert!(cache.get(&key).is_some());
        assert!(cache.get(&CacheKey::Contributors).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_store_overwrites_wholesale() {
        let mut cache = MemoryCache::new();
        let now = Utc::now();
        let key = CacheKey::RepositoryInfo;

        let first = cache.ticket(&key);
        cache.store(&key, readme("v1"), first, now);
        let second = cache.ticket(&key);
        cache.store(&key, readme("v2"), second, now);

        let entry = cache.get(&key).unwrap();
        assert_eq!(entry.data, readme("v2"));
        assert_eq!(entry.sequence, second);
    }

    #[test]
    fn test_older_completion_is_discarded() {
        let mut cache = MemoryCache::new();
        let now = Utc::now();
        let key = CacheKey::Contributors;

        let older = cache.ticket(&key);
        let newer = cache.ticket(&key);

        assert!(cache.store(&key, readme("v2"), newer, now));
        assert!(!cache.store(&key, readme("v1"), older, now));
        assert_eq!(cache.get(&key).unwrap().data, readme("v2"));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = MemoryCache::new();
        let now = Utc::now();

        for key in [CacheKey::RepositoryInfo, CacheKey::Readme] {
            let ticket = cache.ticket(&key);
            cache.store(&key, readme("v1"), ticket, now);
        }

        cache.invalidate(&CacheKey::Readme);
        assert!(cache.get(&CacheKey::Readme).is_none());
        assert!(cache.get(&CacheKey::RepositoryInfo).is_some());

        cache.clear();
        assert!(cache.is_empty());

        // Tickets keep increasing after invalidation.
        assert_eq!(cache.ticket(&CacheKey::Readme), 2);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(CacheKey::RepositoryInfo.to_string(), "repository");
        assert_eq!(CacheKey::Contributors.to_string(), "contributors");
    }
}
