//! SQLite-backed key-value store with read-time TTL checks
//!
//! Each row holds a key, the JSON-encoded value and the epoch second it was
//! written. Nothing is ever evicted: a row older than the TTL a caller asks
//! for is simply reported as absent. Every operation opens its own
//! connection and drops it before returning, so several processes can share
//! one cache file.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use thiserror::Error;

use super::clock::{Clock, SystemClock};

/// Cache file used when no path is configured
pub const DEFAULT_CACHE_PATH: &str = ".weather_cache.sqlite";

/// How long a connection waits on a lock held by another process
const BUSY_TIMEOUT: StdDuration = StdDuration::from_secs(5);

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS kv (
    k TEXT PRIMARY KEY,
    v TEXT NOT NULL,
    ts INTEGER NOT NULL
)";

/// Errors raised by the cache store
///
/// A missing or stale key is not an error; these variants mean the cache
/// itself could not be used.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache file could not be opened, read or written
    #[error("cache unavailable at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A stored value could not be decoded
    #[error("cached value for '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The value to store could not be encoded as JSON
    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A stored value together with the time it was written
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub key: String,
    pub value: T,
    pub stored_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Age of the entry at `now`, truncated to whole seconds
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        Duration::seconds(now.timestamp().saturating_sub(self.stored_at.timestamp()))
    }

    /// Whether the entry is still usable under `ttl` at `now`
    ///
    /// The boundary is inclusive: an entry exactly `ttl` old is fresh.
    pub fn is_fresh(&self, ttl: StdDuration, now: DateTime<Utc>) -> bool {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        self.age(now).num_seconds() <= ttl_secs
    }
}

/// Handle to the on-disk cache
///
/// Cheap to clone; holds only the file path and the clock.
#[derive(Debug, Clone)]
pub struct KvStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl KvStore {
    /// Creates a handle for the cache file at `path` without touching disk
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    /// Creates a handle that reads time from `clock`
    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
        }
    }

    /// Creates a handle and makes sure the schema exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let store = Self::new(path);
        store.ensure_initialized()?;
        Ok(store)
    }

    /// Path of the backing SQLite file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, source: rusqlite::Error) -> CacheError {
        CacheError::Unavailable {
            path: self.path.clone(),
            source,
        }
    }

    fn connect(&self) -> Result<Connection, CacheError> {
        let conn = Connection::open(&self.path).map_err(|e| self.unavailable(e))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| self.unavailable(e))?;
        Ok(conn)
    }

    /// Creates the cache table if it does not exist yet
    ///
    /// Safe to run any number of times against an existing file.
    pub fn ensure_initialized(&self) -> Result<(), CacheError> {
        let conn = self.connect()?;
        conn.execute_batch(CREATE_TABLE)
            .map_err(|e| self.unavailable(e))
    }

    /// Fetches the undecoded value and its timestamp
    fn row(&self, key: &str) -> Result<Option<CacheEntry<String>>, CacheError> {
        let conn = self.connect()?;
        let row: Option<(String, i64)> = conn
            .query_row(
                "SELECT v, ts FROM kv WHERE k = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| self.unavailable(e))?;

        Ok(row.map(|(json, ts)| CacheEntry {
            key: key.to_string(),
            value: json,
            stored_at: DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default(),
        }))
    }

    fn decode<T: DeserializeOwned>(key: &str, json: &str) -> Result<T, CacheError> {
        serde_json::from_str(json).map_err(|source| CacheError::Corrupt {
            key: key.to_string(),
            source,
        })
    }

    /// Reads the raw entry for `key`, fresh or not
    pub fn entry<T: DeserializeOwned>(&self, key: &str) -> Result<Option<CacheEntry<T>>, CacheError> {
        let Some(raw) = self.row(key)? else {
            return Ok(None);
        };

        Ok(Some(CacheEntry {
            value: Self::decode(key, &raw.value)?,
            key: raw.key,
            stored_at: raw.stored_at,
        }))
    }

    /// Returns the value for `key` if it was written no more than `ttl` ago
    ///
    /// Missing and stale keys both yield `Ok(None)`. Stale rows are left in
    /// place and never decoded, so only a fresh row can be `Corrupt`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, ttl: StdDuration) -> Result<Option<T>, CacheError> {
        let Some(raw) = self.row(key)? else {
            return Ok(None);
        };

        let now = self.clock.now();
        if !raw.is_fresh(ttl, now) {
            tracing::debug!(
                key,
                age_secs = raw.age(now).num_seconds(),
                ttl_secs = ttl.as_secs(),
                "cache entry is stale"
            );
            return Ok(None);
        }

        Self::decode(key, &raw.value).map(Some)
    }

    /// Stores `value` under `key`, stamped with the current time
    ///
    /// Replaces any previous entry for the key in a single statement, so
    /// readers see either the old row or the new one.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value).map_err(|source| CacheError::Encode {
            key: key.to_string(),
            source,
        })?;
        let ts = self.clock.now().timestamp();

        let conn = self.connect()?;
        conn.execute(
            "INSERT OR REPLACE INTO kv (k, v, ts) VALUES (?1, ?2, ?3)",
            params![key, json, ts],
        )
        .map_err(|e| self.unavailable(e))?;
        Ok(())
    }
}
