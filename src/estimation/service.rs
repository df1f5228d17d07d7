use crate::{
    chains::{Chain, L1Surcharge},
    config::EstimationConfig,
    error::EstimationError,
    price::PriceOracle,
    pricing::{FeeEngine, FeeInputs, GasEstimator, GasMultiplierTable, GasPricing, l1_data_fee},
    provider::SimulationOutcome,
    types::{
        Action, FeeQuote, ForwarderCall, PopulatedTransaction, TransactionPayload,
        mock_signatures,
    },
    wallet::{MetadataMode, WalletMetadataProvider},
};
use alloy::primitives::{Address, U256};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A cast to estimate on a single chain.
#[derive(Debug, Clone)]
pub struct EstimationRequest {
    /// The wallet casting.
    pub wallet: Address,
    /// Owner of the wallet.
    pub eoa: Address,
    /// Index of the wallet.
    pub index: u32,
    /// Actions to execute.
    pub actions: Vec<Action>,
    /// Action set id.
    pub action_id: U256,
    /// How wallet metadata failures are handled.
    pub mode: MetadataMode,
}

/// Quotes the fee of casting on a chain.
#[derive(Debug, Clone)]
pub struct FeeEstimationService {
    metadata: WalletMetadataProvider,
    price_oracle: PriceOracle,
    gas_multipliers: Arc<GasMultiplierTable>,
    config: Arc<EstimationConfig>,
}

impl FeeEstimationService {
    /// Creates a new [`FeeEstimationService`].
    pub fn new(
        metadata: WalletMetadataProvider,
        price_oracle: PriceOracle,
        gas_multipliers: Arc<GasMultiplierTable>,
        config: Arc<EstimationConfig>,
    ) -> Self {
        Self { metadata, price_oracle, gas_multipliers, config }
    }

    /// Quotes `request` on `chain`.
    ///
    /// Simulation, fee data, native price and L1 surcharge are fetched concurrently once the
    /// wallet metadata is known.
    #[instrument(skip_all, fields(chain_id = chain.id(), wallet = %request.wallet))]
    pub async fn estimate(
        &self,
        chain: &Chain,
        request: EstimationRequest,
    ) -> Result<FeeQuote, EstimationError> {
        let metadata = self.metadata.metadata(chain, request.wallet, request.mode).await?;

        let payload = TransactionPayload::new(request.actions, metadata.next_nonce)
            .with_id(request.action_id);
        let call = ForwarderCall {
            owner: request.eoa,
            index: request.index,
            payload,
            signatures: mock_signatures(metadata.required_signers),
        };
        let populated = chain.client.populate(&call);
        let profile = &chain.profile;

        let (simulation, fee_data, native_price, (l1_gas, l1_fee)) = tokio::try_join!(
            self.simulate(chain, &call),
            async {
                chain.client.fee_data(profile.fee_market).await.map_err(EstimationError::from)
            },
            async {
                self.price_oracle
                    .usd_price(chain.id())
                    .await
                    .ok_or(EstimationError::PriceUnavailable(chain.id()))
            },
            self.l1_surcharge(chain, &populated),
        )?;

        let unreliable = profile.has_unreliable_estimation();
        let breakdown = GasEstimator::breakdown(
            metadata.required_signers,
            &metadata.next_nonce,
            call.payload.params.metadata.len(),
            unreliable,
            &populated,
            simulation.deployment_gas_used,
            simulation.cast_gas_used,
            l1_gas,
        );
        let gas_limit = GasEstimator::gas_limit(
            &breakdown,
            call.payload.params.id,
            unreliable,
            &self.config.gas,
        );

        let fee = FeeEngine::compute(
            &FeeInputs {
                gas_limit,
                pricing: GasPricing::derive(&fee_data, profile.gas_price_multiplier)?,
                l1_data_fee: l1_fee,
                native_price,
                gas_limit_multiplier: self.gas_multipliers.compute_gas_multiplier(
                    chain.id(),
                    self.config.wallet_version,
                    false,
                ),
            },
            &self.config.fee,
        )?;
        debug!(
            ?breakdown,
            gas_limit,
            %l1_fee,
            native_price,
            fee = %fee.fee_amount,
            "Estimated fee"
        );

        Ok(FeeQuote {
            chain_id: chain.id(),
            chain_name: chain.name().to_string(),
            fee_amount: fee.fee_amount,
            fee_multiplier_bps: fee.fee_multiplier_bps,
        })
    }

    async fn simulate(
        &self,
        chain: &Chain,
        call: &ForwarderCall,
    ) -> Result<SimulationOutcome, EstimationError> {
        let outcome = chain.client.simulate(call).await?;
        if !outcome.success {
            return Err(EstimationError::SimulationReverted(outcome.revert_reason));
        }
        Ok(outcome)
    }

    /// The L1 gas component and L1 data fee of `populated`.
    async fn l1_surcharge(
        &self,
        chain: &Chain,
        populated: &PopulatedTransaction,
    ) -> Result<(u64, U256), EstimationError> {
        match chain.profile.l1_surcharge {
            L1Surcharge::None => Ok((0, U256::ZERO)),
            L1Surcharge::GasComponent => {
                let gas =
                    chain.client.l1_gas_component(populated.to, populated.data.clone()).await?;
                Ok((gas, U256::ZERO))
            }
            L1Surcharge::DataFee { oracle, scaling_divisor } => {
                let encoded = GasEstimator::rlp_encode(populated);
                let inputs = chain.client.l1_fee_inputs(oracle, encoded).await?;
                Ok((0, l1_data_fee(&inputs, scaling_divisor)))
            }
        }
    }
}
