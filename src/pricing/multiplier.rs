//! Base gas limit multipliers.
//!
//! Each chain's historical estimation error is covered by a base multiplier on the gas limit.
//! The values are empirically tuned and live in configuration.

use alloy::primitives::ChainId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Multiplier of a single chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GasMultiplier {
    /// Same multiplier for every wallet version and kind.
    Flat(Decimal),
    /// Multiplier depending on wallet version and kind.
    Versioned {
        /// Version 1 wallets.
        v1: Decimal,
        /// Any later version.
        latest: Decimal,
        /// Version 1 multisig wallets.
        multisig_v1: Decimal,
        /// Any later multisig version.
        multisig_latest: Decimal,
    },
}

impl GasMultiplier {
    /// Resolves the multiplier for a wallet.
    pub fn resolve(&self, version: u8, is_multisig: bool) -> Decimal {
        match *self {
            Self::Flat(multiplier) => multiplier,
            Self::Versioned { v1, latest, multisig_v1, multisig_latest } => {
                match (is_multisig, version == 1) {
                    (false, true) => v1,
                    (false, false) => latest,
                    (true, true) => multisig_v1,
                    (true, false) => multisig_latest,
                }
            }
        }
    }
}

/// Base gas limit multipliers by chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasMultiplierTable {
    /// Multiplier of chains without an entry.
    pub default: Decimal,
    /// Per chain multipliers.
    #[serde(default)]
    pub chains: BTreeMap<ChainId, GasMultiplier>,
}

impl GasMultiplierTable {
    /// The base gas limit multiplier of a wallet on `chain_id`.
    pub fn compute_gas_multiplier(
        &self,
        chain_id: ChainId,
        version: u8,
        is_multisig: bool,
    ) -> Decimal {
        self.chains
            .get(&chain_id)
            .map(|multiplier| multiplier.resolve(version, is_multisig))
            .unwrap_or(self.default)
    }
}

impl Default for GasMultiplierTable {
    fn default() -> Self {
        let flat = |value, scale| GasMultiplier::Flat(Decimal::new(value, scale));
        Self {
            default: Decimal::new(105, 2),
            chains: BTreeMap::from([
                (1, flat(11, 1)),
                (10, flat(115, 2)),
                (204, flat(115, 2)),
                (8453, flat(115, 2)),
                (
                    42161,
                    GasMultiplier::Versioned {
                        v1: Decimal::from(3),
                        latest: Decimal::new(15, 1),
                        multisig_v1: Decimal::new(115, 2),
                        multisig_latest: Decimal::new(15, 1),
                    },
                ),
            ]),
        }
    }
}
