//! # Route Finder
//!
//! Fee estimation and sourcing route optimization for smart-contract wallets that share one
//! address across several EVM chains.

pub mod api;
pub mod cache;
pub mod chains;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod estimation;
pub mod price;
pub mod pricing;
pub mod provider;
pub mod routing;
pub mod serde;
pub mod spawn;
pub mod transport;
pub mod types;
pub mod wallet;
