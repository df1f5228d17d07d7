//! Wallet metadata types.

use alloy::primitives::{I256, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// A wallet nonce.
///
/// Non-sequential nonces are encoded as `-1` on chain and in cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nonce {
    /// The next value of the sequential counter.
    Sequential(U256),
    /// Salted replay protection.
    NonSequential,
}

impl Nonce {
    /// Whether this is a sequential nonce.
    pub const fn is_sequential(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }

    /// The signed representation used in cast params.
    pub fn as_signed(&self) -> I256 {
        match self {
            Self::Sequential(nonce) => I256::try_from(*nonce).unwrap_or(I256::MAX),
            Self::NonSequential => I256::MINUS_ONE,
        }
    }
}

impl Default for Nonce {
    fn default() -> Self {
        Self::Sequential(U256::ZERO)
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential(nonce) => write!(f, "{nonce}"),
            Self::NonSequential => f.write_str("-1"),
        }
    }
}

/// Error returned when a nonce string is neither `-1` nor a decimal counter.
#[derive(Debug, thiserror::Error)]
#[error("invalid nonce: {0}")]
pub struct ParseNonceError(String);

impl FromStr for Nonce {
    type Err = ParseNonceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "-1" {
            return Ok(Self::NonSequential);
        }
        U256::from_str_radix(s, 10).map(Self::Sequential).map_err(|_| ParseNonceError(s.into()))
    }
}

impl Serialize for Nonce {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Nonce {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-chain wallet metadata needed to size a cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletMetadata {
    /// Number of signatures the wallet requires. Always at least one.
    pub required_signers: u8,
    /// Next nonce.
    pub next_nonce: Nonce,
}

impl Default for WalletMetadata {
    /// The metadata of a wallet that is not deployed yet.
    fn default() -> Self {
        Self { required_signers: 1, next_nonce: Nonce::default() }
    }
}
