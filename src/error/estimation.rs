use crate::{pricing::PricingError, types::TokenSymbol};
use alloy::{
    primitives::{Address, ChainId},
    transports::TransportError,
};
use std::time::Duration;
use thiserror::Error;

/// Reasons a fee quote or balance could not be obtained on a chain.
#[derive(Debug, Error)]
pub enum EstimationError {
    /// An RPC request failed.
    #[error(transparent)]
    Rpc(#[from] TransportError),
    /// The forwarder simulation reverted.
    #[error("simulation reverted: {0}")]
    SimulationReverted(String),
    /// The native token price is not available.
    #[error("native token price unavailable on chain {0}")]
    PriceUnavailable(ChainId),
    /// The lookup did not finish in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    /// The token is not deployed on the chain.
    #[error("{token} is not supported on chain {chain_id}")]
    UnsupportedToken {
        /// The chain.
        chain_id: ChainId,
        /// The token.
        token: TokenSymbol,
    },
    /// The chain is not configured.
    #[error("unsupported chain {0}")]
    UnsupportedChain(ChainId),
    /// The fee could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
    /// Metadata of a deployed wallet could not be read.
    #[error("wallet metadata unavailable for {wallet} on chain {chain_id}")]
    MetadataUnavailable {
        /// The chain.
        chain_id: ChainId,
        /// The wallet.
        wallet: Address,
        /// The failed read.
        #[source]
        source: TransportError,
    },
}

impl EstimationError {
    /// Whether this error must abort the request instead of dropping the chain.
    pub fn is_hard(&self) -> bool {
        matches!(self, Self::MetadataUnavailable { .. })
    }
}

/// A chain excluded from a request.
#[derive(Debug, Error)]
#[error("chain {chain_id} unavailable: {reason}")]
pub struct ChainUnavailable {
    /// The chain.
    pub chain_id: ChainId,
    /// Why it is unavailable.
    #[source]
    pub reason: EstimationError,
}

impl ChainUnavailable {
    /// Creates a new [`ChainUnavailable`].
    pub fn new(chain_id: ChainId, reason: impl Into<EstimationError>) -> Self {
        Self { chain_id, reason: reason.into() }
    }
}
