//! Per-chain fee estimation and balance lookups.
//!
//! - `service`: builds a cast for the requested actions, simulates it and prices it.
//! - `balance`: reads the wallet's token balance on a chain.

mod balance;
pub use balance::BalanceProvider;

mod service;
pub use service::{EstimationRequest, FeeEstimationService};
