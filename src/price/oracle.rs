use super::{Instadapp, InstadappClient, PriceFetcher, metrics::NativePriceMetrics};
use alloy::primitives::ChainId;
use std::{
    collections::{HashMap, hash_map::Entry},
    time::{Duration, Instant},
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

/// Native token rate taken at a certain instant.
#[derive(Debug, Clone, Copy)]
struct RateTick {
    /// USD price.
    rate: f64,
    /// When the rate was received.
    timestamp: Instant,
}

/// Messages used by the price oracle task.
#[derive(Debug)]
pub enum PriceOracleMessage {
    /// Message to update native token USD prices.
    Update { fetcher: PriceFetcher, prices: Vec<(ChainId, f64)>, timestamp: Instant },
    /// Message to lookup the native token USD price of a chain.
    Lookup { chain_id: ChainId, tx: oneshot::Sender<Option<f64>> },
}

/// Configuration for the price oracle.
#[derive(Debug, Clone)]
pub struct PriceOracleConfig {
    /// Duration after which a rate is considered expired.
    pub rate_ttl: Duration,
}

impl Default for PriceOracleConfig {
    fn default() -> Self {
        Self { rate_ttl: Duration::from_secs(300) }
    }
}

/// A price oracle for the USD price of each chain's native token.
#[derive(Debug, Clone)]
pub struct PriceOracle {
    /// Channel sender to lookup and update prices.
    tx: mpsc::UnboundedSender<PriceOracleMessage>,
    /// Client used when a lookup misses.
    on_demand: Option<InstadappClient>,
    /// Constant rate returned by every lookup. For testing only.
    constant_rate: Option<f64>,
}

impl Default for PriceOracle {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

impl PriceOracle {
    /// Return a new [`PriceOracle`].
    pub fn new(config: PriceOracleConfig) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut registry = PriceRegistry::default();
            while let Some(message) = rx.recv().await {
                match message {
                    PriceOracleMessage::Update { fetcher, prices, timestamp } => {
                        trace!(?fetcher, count = prices.len(), "Received USD price updates.");
                        for (chain_id, rate) in prices {
                            trace!(chain_id, usd_price = rate, "USD price update");
                            registry.insert(chain_id, RateTick { rate, timestamp });
                        }
                    }
                    PriceOracleMessage::Lookup { chain_id, tx } => {
                        let _ = tx.send(registry.get(chain_id, config.rate_ttl));
                    }
                }
            }
        });

        Self { tx, on_demand: None, constant_rate: None }
    }

    /// Returns [`Self`] answering every lookup with a constant rate.
    pub fn with_constant_rate(mut self, rate: f64) -> Self {
        self.constant_rate = Some(rate);
        self
    }

    /// Returns [`Self`] fetching missing or expired prices on demand.
    pub fn with_on_demand(mut self, client: InstadappClient) -> Self {
        self.on_demand = Some(client);
        self
    }

    /// Spawns a price fetcher refreshing the prices of `chains`.
    pub fn spawn_fetcher(
        &self,
        client: InstadappClient,
        chains: Vec<ChainId>,
        refresh_interval: Duration,
    ) {
        Instadapp::launch(client, chains, refresh_interval, self.tx.clone());
    }

    /// Returns the USD price of the native token of `chain_id`.
    pub async fn usd_price(&self, chain_id: ChainId) -> Option<f64> {
        if let Some(rate) = self.constant_rate {
            return Some(rate);
        }

        let (req_tx, req_rx) = oneshot::channel();
        let _ = self.tx.send(PriceOracleMessage::Lookup { chain_id, tx: req_tx });
        if let Some(rate) = req_rx.await.ok().flatten() {
            return Some(rate);
        }

        let client = self.on_demand.as_ref()?;
        debug!(chain_id, "Fetching native price on demand");
        match client.native_price(chain_id).await {
            Ok(rate) => {
                let _ = self.tx.send(PriceOracleMessage::Update {
                    fetcher: PriceFetcher::Instadapp,
                    prices: vec![(chain_id, rate)],
                    timestamp: Instant::now(),
                });
                Some(rate)
            }
            Err(err) => {
                warn!(chain_id, %err, "Native price unavailable");
                None
            }
        }
    }

    /// Pushes prices into the oracle.
    pub fn update(&self, prices: Vec<(ChainId, f64)>) {
        let _ = self.tx.send(PriceOracleMessage::Update {
            fetcher: PriceFetcher::Instadapp,
            prices,
            timestamp: Instant::now(),
        });
    }
}

/// Tracks the rate of a chain
#[derive(Debug)]
struct NativePriceInfo {
    metrics: NativePriceMetrics,
    rate: RateTick,
}

/// Keeps track of native token rates
#[derive(Debug, Default)]
struct PriceRegistry {
    usd_prices: HashMap<ChainId, NativePriceInfo>,
}

impl PriceRegistry {
    /// Inserts or updates the rate of the given chain
    fn insert(&mut self, chain_id: ChainId, rate: RateTick) {
        match self.usd_prices.entry(chain_id) {
            Entry::Occupied(mut e) => {
                e.get().metrics.rate.set(rate.rate);
                e.get_mut().rate = rate;
            }
            Entry::Vacant(e) => {
                let info = NativePriceInfo {
                    metrics: NativePriceMetrics::new_with_labels(&[(
                        "chain_id",
                        chain_id.to_string(),
                    )]),
                    rate,
                };
                info.metrics.rate.set(rate.rate);
                e.insert(info);
            }
        }
    }

    /// Gets the unexpired rate of the given chain
    fn get(&self, chain_id: ChainId, rate_ttl: Duration) -> Option<f64> {
        let info = self.usd_prices.get(&chain_id)?;
        if info.rate.timestamp.elapsed() > rate_ttl {
            info.metrics.expired_hits.increment(1);
            return None;
        }
        Some(info.rate.rate)
    }
}
