use axum::http::StatusCode;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors related to sourcing plans.
#[derive(Debug, Error)]
pub enum SourcingError {
    /// The wallet does not hold enough across all other chains.
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// The requested amount.
        required: Decimal,
        /// The total balance across all other chains.
        available: Decimal,
    },
    /// Balances suffice but the chains holding them could not be quoted.
    #[error("fee quotes unavailable for the chains holding the balance")]
    QuotesUnavailable,
    /// Every candidate chain failed.
    #[error("all chains unavailable")]
    AllChainsUnavailable,
    /// The wallet address could not be resolved.
    #[error("wallet address unavailable: {0}")]
    WalletAddressUnavailable(String),
}

impl SourcingError {
    /// The HTTP status of this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InsufficientBalance { .. } => StatusCode::BAD_REQUEST,
            Self::QuotesUnavailable
            | Self::AllChainsUnavailable
            | Self::WalletAddressUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
