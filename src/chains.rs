//! Supported chains, their static profiles and RPC clients.

use crate::{
    provider::ChainClient,
    types::{TokenProfile, TokenSymbol},
};
use alloy::primitives::{Address, ChainId};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};

pub mod arb;
pub mod op;

/// How a chain prices gas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeMarket {
    /// Base fee plus priority fee.
    Eip1559,
    /// A single gas price.
    #[default]
    Legacy,
}

/// Extra fee a rollup charges for publishing data to its settlement layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum L1Surcharge {
    /// No surcharge.
    #[default]
    None,
    /// The surcharge is paid as extra L2 gas, estimated by the Arbitrum NodeInterface.
    ///
    /// Gas estimation on these chains is unreliable, so casts get the large fixed safe buffer
    /// and no large transaction buffer.
    GasComponent,
    /// The surcharge is a separate data fee read from an OP Stack style oracle.
    DataFee {
        /// Oracle contract.
        oracle: Address,
        /// Precision of the oracle's scalar.
        scaling_divisor: u64,
    },
}

/// Static metadata of a supported chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainProfile {
    /// Chain id.
    pub chain_id: ChainId,
    /// Display name.
    pub name: String,
    /// Gas price multiplier in basis-hundreds, `110` being +10%.
    pub gas_price_multiplier: u64,
    /// Fee market.
    pub fee_market: FeeMarket,
    /// L1 surcharge.
    pub l1_surcharge: L1Surcharge,
    /// Supported tokens.
    pub tokens: BTreeMap<TokenSymbol, TokenProfile>,
}

impl ChainProfile {
    /// Whether the chain charges an L1 surcharge.
    pub const fn has_l1_surcharge(&self) -> bool {
        !matches!(self.l1_surcharge, L1Surcharge::None)
    }

    /// Whether gas estimation on this chain is unreliable.
    pub const fn has_unreliable_estimation(&self) -> bool {
        matches!(self.l1_surcharge, L1Surcharge::GasComponent)
    }

    /// Returns the deployment of `symbol`, if supported on this chain.
    pub fn token(&self, symbol: TokenSymbol) -> Option<&TokenProfile> {
        self.tokens.get(&symbol)
    }
}

/// A single supported chain.
#[derive(Debug, Clone)]
pub struct Chain {
    /// Static profile.
    pub profile: Arc<ChainProfile>,
    /// RPC client.
    pub client: Arc<dyn ChainClient>,
}

impl Chain {
    /// Creates a new [`Chain`].
    pub fn new(profile: ChainProfile, client: Arc<dyn ChainClient>) -> Self {
        Self { profile: Arc::new(profile), client }
    }

    /// The chain ID.
    pub fn id(&self) -> ChainId {
        self.profile.chain_id
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.profile.name
    }
}

/// The supported chains, ordered by chain ID.
#[derive(Clone, Default)]
pub struct Chains {
    chains: BTreeMap<ChainId, Chain>,
}

impl Chains {
    /// Creates a new instance of [`Chains`].
    pub fn new(chains: impl IntoIterator<Item = Chain>) -> Self {
        Self { chains: chains.into_iter().map(|chain| (chain.id(), chain)).collect() }
    }

    /// Get a chain by ID.
    pub fn get(&self, chain_id: ChainId) -> Option<&Chain> {
        self.chains.get(&chain_id)
    }

    /// Iterate over all chains.
    pub fn iter(&self) -> impl Iterator<Item = &Chain> {
        self.chains.values()
    }

    /// Iterate over every chain except `excluded`.
    pub fn others(&self, excluded: ChainId) -> impl Iterator<Item = &Chain> {
        self.chains.values().filter(move |chain| chain.id() != excluded)
    }

    /// Get an iterator over the supported chain IDs.
    pub fn chain_ids_iter(&self) -> impl Iterator<Item = &ChainId> {
        self.chains.keys()
    }

    /// Number of supported chains.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Whether there are no supported chains.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl std::fmt::Debug for Chains {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chains").field("chains", &self.chains.keys()).finish()
    }
}
