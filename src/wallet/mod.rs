//! Wallet address resolution and per-chain wallet metadata.

mod address;
pub use address::WalletAddressResolver;

mod metadata;
pub use metadata::{MetadataMode, WalletMetadataProvider};
