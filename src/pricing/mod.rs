//! Gas fee model: gas price derivation, gas limit composition and fee conversion.

pub mod error;
pub use error::PricingError;

mod fee_data;
pub use fee_data::{FeeData, GasPricing};

mod fee_engine;
pub use fee_engine::{ComputedFee, FeeEngine, FeeInputs};

mod gas_estimation;
pub use gas_estimation::{GasBreakdown, GasEstimator};

mod l1;
pub use l1::{L1FeeInputs, l1_data_fee};

mod multiplier;
pub use multiplier::{GasMultiplier, GasMultiplierTable};
