//! Key-value caching of wallet data.
//!
//! Every cache access is best-effort: backend failures are logged and treated as misses so the
//! caller falls through to a live lookup.

use crate::error::CacheError;
use alloy::primitives::{Address, ChainId};
use async_trait::async_trait;
use std::{fmt::Display, str::FromStr, sync::Arc, time::Duration};
use tracing::{debug, warn};

mod memory;
pub use memory::InMemoryCache;

mod metrics;
pub use metrics::CacheMetrics;

mod upstash;
pub use upstash::UpstashCache;

/// A key-value store with per-entry TTL.
#[async_trait]
pub trait KeyValueCache: std::fmt::Debug + Send + Sync {
    /// Reads the value of `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Writes `value` to `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
}

/// Cache key of the wallet address of `eoa` at `index`.
pub fn wallet_address_key(eoa: Address, index: u32) -> String {
    format!("WALLET_ADDRESS:{eoa}:{index}")
}

/// Cache key of the required signer count of `wallet` on `chain_id`.
pub fn required_signers_key(chain_id: ChainId, wallet: Address) -> String {
    format!("REQ_SIGNERS:{chain_id}:{wallet}")
}

/// Cache key of the nonce of `wallet` on `chain_id`.
pub fn nonce_key(chain_id: ChainId, wallet: Address) -> String {
    format!("WALLET_NONCE:{chain_id}:{wallet}")
}

/// Best-effort typed access to a [`KeyValueCache`].
#[derive(Debug, Clone)]
pub struct RouterCache {
    inner: Arc<dyn KeyValueCache>,
    metrics: CacheMetrics,
}

impl RouterCache {
    /// Creates a new [`RouterCache`].
    pub fn new(inner: Arc<dyn KeyValueCache>) -> Self {
        Self { inner, metrics: CacheMetrics::new("wallet") }
    }

    /// An in-memory cache.
    pub fn in_memory(max_capacity: u64) -> Self {
        Self::new(Arc::new(InMemoryCache::new(max_capacity)))
    }

    /// Reads and parses the value of `key`.
    ///
    /// Backend errors and malformed values are misses.
    pub async fn get<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = match self.inner.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "Cache MISS");
                self.metrics.record_miss();
                return None;
            }
            Err(err) => {
                warn!(key, %err, "Cache read failed");
                self.metrics.record_error();
                return None;
            }
        };

        match raw.parse() {
            Ok(value) => {
                debug!(key, "Cache HIT");
                self.metrics.record_hit();
                Some(value)
            }
            Err(_) => {
                let err = CacheError::Malformed { key: key.to_string(), value: raw };
                warn!(%err, "Ignoring cached value");
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Writes `value` to `key`. Failures are logged and dropped.
    pub async fn set<T: Display>(&self, key: &str, value: &T, ttl: Duration) {
        if let Err(err) = self.inner.set(key, value.to_string(), ttl).await {
            warn!(key, %err, "Cache write failed");
            self.metrics.record_error();
        }
    }
}
