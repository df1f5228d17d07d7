//! Shared primitive types.
mod action;
pub use action::*;

mod contracts;
pub use contracts::*;

mod erc20;
pub use erc20::*;

mod plan;
pub use plan::*;

mod quote;
pub use quote::*;

mod token;
pub use token::*;

mod wallet;
pub use wallet::*;
