use super::KeyValueCache;
use crate::error::CacheError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::trace;

/// A cached value and its expiry.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-process [`KeyValueCache`].
///
/// Expired entries are dropped lazily on read and when the cache is full.
#[derive(Debug)]
pub struct InMemoryCache {
    entries: DashMap<String, Entry>,
    max_capacity: usize,
}

impl InMemoryCache {
    /// Creates a new [`InMemoryCache`] holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: DashMap::new(),
            max_capacity: usize::try_from(max_capacity).unwrap_or(usize::MAX),
        }
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| !entry.is_expired(now));
    }
}

#[async_trait]
impl KeyValueCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        let Some(entry) = self.entries.get(key).map(|entry| entry.clone()) else {
            return Ok(None);
        };
        if entry.is_expired(now) {
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
            return Ok(None);
        }
        Ok(Some(entry.value))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        if !self.entries.contains_key(key) && self.entries.len() >= self.max_capacity {
            self.purge_expired();
            if self.entries.len() >= self.max_capacity {
                trace!(key, "Cache full, skipping write");
                return Ok(());
            }
        }

        self.entries.insert(key.to_string(), Entry { value, expires_at: Instant::now() + ttl });
        Ok(())
    }
}
