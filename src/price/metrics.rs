//! Price metrics

use metrics::{Counter, Gauge};
use metrics_derive::Metrics;

/// Metrics for the native token price of a chain.
#[derive(Metrics)]
#[metrics(scope = "oracle")]
pub struct NativePriceMetrics {
    /// USD rate of the native token.
    pub rate: Gauge,
    /// Lookups that found an expired rate.
    pub expired_hits: Counter,
}
