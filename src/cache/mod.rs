// Cache module for in-process caching.
// Holds upstream responses for a TTL window and keeps the last good value.

pub mod clock;
pub mod store;

#[cfg(test)]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use store::{CacheEntry, CacheKey, CachedValue, DEFAULT_TTL, MemoryCache};
