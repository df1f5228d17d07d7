use crate::{
    cache::{RouterCache, nonce_key, required_signers_key},
    chains::Chain,
    config::CacheConfig,
    error::EstimationError,
    types::{Nonce, WalletMetadata},
};
use alloy::{primitives::Address, transports::TransportError};
use tracing::{debug, instrument, warn};

/// How metadata read failures are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetadataMode {
    /// Every failure falls back to the metadata of an undeployed wallet.
    #[default]
    Soft,
    /// Failures on a deployed wallet, or when deployment cannot be checked, are errors.
    Strict,
}

/// Reads wallet signer counts and nonces through the cache.
#[derive(Debug, Clone)]
pub struct WalletMetadataProvider {
    cache: RouterCache,
    config: CacheConfig,
}

impl WalletMetadataProvider {
    /// Creates a new [`WalletMetadataProvider`].
    pub fn new(cache: RouterCache, config: CacheConfig) -> Self {
        Self { cache, config }
    }

    /// Metadata of `wallet` on `chain`.
    ///
    /// Undeployed wallets get [`WalletMetadata::default`]. Failed reads are cached only once the
    /// wallet is known to be undeployed.
    #[instrument(skip(self, chain), fields(chain_id = chain.id()))]
    pub async fn metadata(
        &self,
        chain: &Chain,
        wallet: Address,
        mode: MetadataMode,
    ) -> Result<WalletMetadata, EstimationError> {
        let (required_signers, nonce) =
            tokio::join!(self.required_signers(chain, wallet), self.nonce(chain, wallet));

        let fallback = WalletMetadata::default();
        let (signers_failed, nonce_failed) = (required_signers.is_err(), nonce.is_err());
        let failure = match (required_signers, nonce) {
            (Ok(required_signers), Ok(next_nonce)) => {
                return Ok(WalletMetadata { required_signers, next_nonce });
            }
            (Err(err), _) | (_, Err(err)) => err,
        };

        if mode == MetadataMode::Soft {
            debug!(%wallet, err = %failure, "Using fallback wallet metadata");
            return Ok(fallback);
        }

        match chain.client.code_at(wallet).await {
            Ok(code) if code.is_empty() => {
                // undeployed, the fallback is the real metadata
                if signers_failed {
                    let key = required_signers_key(chain.id(), wallet);
                    let ttl = self.config.required_signers_ttl;
                    self.cache.set(&key, &fallback.required_signers, ttl).await;
                }
                if nonce_failed {
                    let key = nonce_key(chain.id(), wallet);
                    self.cache.set(&key, &fallback.next_nonce, self.config.nonce_ttl).await;
                }
                Ok(fallback)
            }
            Ok(_) | Err(_) => Err(EstimationError::MetadataUnavailable {
                chain_id: chain.id(),
                wallet,
                source: failure,
            }),
        }
    }

    async fn required_signers(&self, chain: &Chain, wallet: Address) -> Result<u8, TransportError> {
        let key = required_signers_key(chain.id(), wallet);
        if let Some(required_signers) = self.cache.get::<u8>(&key).await.filter(|n| *n > 0) {
            return Ok(required_signers);
        }

        match chain.client.required_signers(wallet).await {
            Ok(required_signers) => {
                let required_signers = required_signers.max(1);
                self.cache.set(&key, &required_signers, self.config.required_signers_ttl).await;
                Ok(required_signers)
            }
            Err(err) => {
                warn!(%wallet, %err, "Failed to read required signers");
                Err(err)
            }
        }
    }

    async fn nonce(&self, chain: &Chain, wallet: Address) -> Result<Nonce, TransportError> {
        let key = nonce_key(chain.id(), wallet);
        if let Some(nonce) = self.cache.get::<Nonce>(&key).await {
            return Ok(nonce);
        }

        match chain.client.wallet_nonce(wallet).await {
            Ok(nonce) => {
                let nonce = Nonce::Sequential(nonce);
                self.cache.set(&key, &nonce, self.config.nonce_ttl).await;
                Ok(nonce)
            }
            Err(err) => {
                warn!(%wallet, %err, "Failed to read wallet nonce");
                Err(err)
            }
        }
    }
}
