// Cached repository data client.
// Serves fresh cache hits, refetches stale keys, and falls back to stale data on failure.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{CacheKey, CachedValue, Clock, MemoryCache, SystemClock};
use crate::error::{Error, FetchError, Result};
use crate::fallback::FallbackDataset;
use crate::github::{AggregateStats, Contributor, Readme, RepositoryInfo, Upstream};

/// Values with their own cache slot.
trait Cacheable: Clone + Sized {
    const RESOURCE: &'static str;

    fn key() -> CacheKey;
    fn into_value(self) -> CachedValue;
    fn from_value(value: CachedValue) -> Option<Self>;
}

impl Cacheable for RepositoryInfo {
    const RESOURCE: &'static str = "repository info";

    fn key() -> CacheKey {
        CacheKey::RepositoryInfo
    }

    fn into_value(self) -> CachedValue {
        CachedValue::Repository(self)
    }

    fn from_value(value: CachedValue) -> Option<Self> {
        match value {
            CachedValue::Repository(repo) => Some(repo),
            _ => None,
        }
    }
}

impl Cacheable for Vec<Contributor> {
    const RESOURCE: &'static str = "contributors";

    fn key() -> CacheKey {
        CacheKey::Contributors
    }

    fn into_value(self) -> CachedValue {
        CachedValue::Contributors(self)
    }

    fn from_value(value: CachedValue) -> Option<Self> {
        match value {
            CachedValue::Contributors(contributors) => Some(contributors),
            _ => None,
        }
    }
}

impl Cacheable for Readme {
    const RESOURCE: &'static str = "readme";

    fn key() -> CacheKey {
        CacheKey::Readme
    }

    fn into_value(self) -> CachedValue {
        CachedValue::Readme(self)
    }

    fn from_value(value: CachedValue) -> Option<Self> {
        match value {
            CachedValue::Readme(readme) => Some(readme),
            _ => None,
        }
    }
}

/// Read-only, cached view of one repository.
///
/// Construct once per process and share it (e.g. behind an `Arc`). Each key is
/// cached for `ttl`; when a refresh fails the last stored value is served even
/// if stale, and [`Error::RemoteUnavailable`] is returned only when nothing
/// was ever stored.
///
/// Concurrent stale reads are not coalesced, each issues its own request. A
/// completion that arrives after a newer request already stored its result is
/// returned to its caller but not cached.
pub struct RepoDataClient<U> {
    upstream: U,
    ttl: Duration,
    clock: Box<dyn Clock>,
    cache: Mutex<MemoryCache>,
    fallback: FallbackDataset,
}

impl<U: Upstream> RepoDataClient<U> {
    pub fn new(upstream: U, ttl: Duration) -> Self {
        Self::with_clock(upstream, ttl, SystemClock)
    }

    pub fn with_clock(upstream: U, ttl: Duration, clock: impl Clock + 'static) -> Self {
        Self {
            upstream,
            ttl,
            clock: Box::new(clock),
            cache: Mutex::new(MemoryCache::new()),
            fallback: FallbackDataset::bundled(),
        }
    }

    pub async fn repository_info(&self) -> Result<RepositoryInfo> {
        self.read(|| self.upstream.fetch_repository()).await
    }

    /// Contributors in upstream order (descending contributions).
    pub async fn contributors(&self) -> Result<Vec<Contributor>> {
        self.read(|| self.upstream.fetch_contributors()).await
    }

    pub async fn readme(&self) -> Result<Readme> {
        self.read(|| self.upstream.fetch_readme()).await
    }

    /// Combine repository info and contributors, each read through its own
    /// cache slot.
    pub async fn aggregate_stats(&self) -> Result<AggregateStats> {
        let repo = self.repository_info().await?;
        let contributors = self.contributors().await?;
        Ok(AggregateStats::from_parts(&repo, &contributors))
    }

    pub fn static_fallback_contributors(&self) -> Vec<Contributor> {
        self.fallback.contributors.clone()
    }

    pub fn static_fallback_stats(&self) -> AggregateStats {
        self.fallback.stats
    }

    /// Drop every cached entry so the next read of each key refetches.
    pub fn invalidate(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> MutexGuard<'_, MemoryCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn read<T, F, Fut>(&self, fetch: F) -> Result<T>
    where
        T: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, FetchError>>,
    {
        let key = T::key();

        let ticket = {
            let mut cache = self.lock_cache();
            let now = self.clock.now();
            if let Some(entry) = cache.get(&key)
                && entry.is_fresh(now, self.ttl)
                && let Some(value) = T::from_value(entry.data)
            {
                debug!(%key, "cache hit");
                return Ok(value);
            }
            cache.ticket(&key)
        };

        info!(%key, ticket, "fetching from upstream");
        match fetch().await {
            Ok(value) => {
                let now = self.clock.now();
                if !self
                    .lock_cache()
                    .store(&key, value.clone().into_value(), ticket, now)
                {
                    warn!(%key, ticket, "newer response already cached, discarding");
                }
                Ok(value)
            }
            Err(source) => {
                let stale = self
                    .lock_cache()
                    .get(&key)
                    .and_then(|entry| T::from_value(entry.data));
                match stale {
                    Some(value) => {
                        warn!(%key, error = %source, "fetch failed, serving stale cache");
                        Ok(value)
                    }
                    None => {
                        warn!(%key, error = %source, "fetch failed with nothing cached");
                        Err(Error::RemoteUnavailable {
                            resource: T::RESOURCE,
                            source,
                        })
                    }
                }
            }
        }
    }
}
