//! Cache module for storing API responses in a local SQLite file
//!
//! The store keeps one row per key with the JSON value and the time it was
//! written. Freshness is decided when reading: callers pass the TTL they care
//! about and stale rows are reported as absent but left in place.

mod clock;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{CacheEntry, CacheError, KvStore, DEFAULT_CACHE_PATH};
