//! Pricing-specific error types.

/// Errors that can occur while computing a fee.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    /// The chain's fee data cannot be priced.
    #[error("invalid fee data: {0}")]
    InvalidFeeData(&'static str),

    /// The native token price is not a positive finite number.
    #[error("invalid native token price: {0}")]
    InvalidPrice(f64),

    /// An intermediate value does not fit the fixed-point representation.
    #[error("fee arithmetic overflow")]
    Overflow,
}
