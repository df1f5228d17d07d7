use crate::{
    cache::{RouterCache, wallet_address_key},
    chains::Chain,
};
use alloy::{primitives::Address, transports::TransportResult};
use std::time::Duration;
use tracing::{debug, instrument};

/// Derives wallet addresses from their owner and index.
///
/// Addresses are deterministic, so the configured TTL only bounds cache growth.
#[derive(Debug, Clone)]
pub struct WalletAddressResolver {
    chain: Chain,
    cache: RouterCache,
    ttl: Duration,
}

impl WalletAddressResolver {
    /// Creates a resolver deriving addresses on `chain`.
    pub fn new(chain: Chain, cache: RouterCache, ttl: Duration) -> Self {
        Self { chain, cache, ttl }
    }

    /// The wallet address of `eoa` at `index`.
    #[instrument(skip(self), fields(chain_id = self.chain.id()))]
    pub async fn compute(&self, eoa: Address, index: u32) -> TransportResult<Address> {
        let key = wallet_address_key(eoa, index);
        if let Some(address) = self.cache.get::<Address>(&key).await {
            return Ok(address);
        }

        let address = self.chain.client.compute_wallet_address(eoa, index).await?;
        debug!(%address, "Derived wallet address");
        self.cache.set(&key, &address, self.ttl).await;
        Ok(address)
    }
}
