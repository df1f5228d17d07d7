use crate::e2e::{EOA, Environment, EnvironmentConfig, GWEI, MockChain, WALLET, usdc};
use alloy::primitives::{ChainId, U256, address};
use route_finder::{
    chains::L1Surcharge,
    error::EstimationError,
    estimation::EstimationRequest,
    pricing::L1FeeInputs,
    types::{Action, FeeQuote},
    wallet::MetadataMode,
};

fn transfer(chain_id: ChainId) -> EstimationRequest {
    EstimationRequest {
        wallet: WALLET,
        eoa: EOA,
        index: 0,
        actions: Action::sourcing_transfer(usdc(chain_id), EOA),
        action_id: U256::ZERO,
        mode: MetadataMode::Soft,
    }
}

async fn quote(env: &Environment, chain_id: ChainId) -> Result<FeeQuote, EstimationError> {
    env.orchestrator.estimation().estimate(env.chain(chain_id), transfer(chain_id)).await
}

#[tokio::test]
async fn legacy_chain_quote() -> eyre::Result<()> {
    let env = Environment::setup(vec![MockChain::legacy(137, 100 * GWEI)]);
    let quote = quote(&env, 137).await?;

    assert_eq!(quote.chain_id, 137);
    assert_eq!(quote.chain_name, "Chain 137");
    // round(1.05 * 100) * 120 / 8000
    assert_eq!(quote.fee_multiplier_bps, 15_750);
    // well above the minimum fee for ~200k gas at 100 gwei
    assert!(quote.fee_amount > U256::from(10u64.pow(16)));

    Ok(())
}

#[tokio::test]
async fn eip1559_chain_quote() -> eyre::Result<()> {
    let env = Environment::setup(vec![MockChain::eip1559(1, 10 * GWEI, GWEI)]);
    let quote = quote(&env, 1).await?;

    // round(1.1 * 100) * (14 / 11 * 1.1 * 100) / 8000
    assert_eq!(quote.fee_multiplier_bps, 19_250);
    assert!(quote.fee_amount > U256::from(10u64.pow(14)));

    Ok(())
}

#[tokio::test]
async fn fee_scales_with_native_price() -> eyre::Result<()> {
    let cheap = Environment::setup(vec![MockChain::legacy(137, 100 * GWEI)]);
    let expensive = Environment::setup_with_config(
        vec![MockChain::legacy(137, 100 * GWEI)],
        EnvironmentConfig { native_price: Some(1_000.0), ..Default::default() },
    );

    let cheap = quote(&cheap, 137).await?;
    let expensive = quote(&expensive, 137).await?;
    assert!(expensive.fee_amount > cheap.fee_amount * U256::from(900));
    assert_eq!(expensive.fee_multiplier_bps, cheap.fee_multiplier_bps);

    Ok(())
}

#[tokio::test]
async fn fee_grows_with_simulated_gas() -> eyre::Result<()> {
    let small = Environment::setup(vec![MockChain::legacy(137, 100 * GWEI)]);
    let large =
        Environment::setup(vec![MockChain::legacy(137, 100 * GWEI).with_cast_gas(1_000_000)]);

    assert!(quote(&large, 137).await?.fee_amount > quote(&small, 137).await?.fee_amount);

    Ok(())
}

#[tokio::test]
async fn minimum_fee() -> eyre::Result<()> {
    let env = Environment::setup(vec![MockChain::legacy(137, 1)]);
    assert_eq!(quote(&env, 137).await?.fee_amount, U256::from(100_000_000_000_000u64));

    Ok(())
}

#[tokio::test]
async fn arbitrum_gas_component_is_charged() -> eyre::Result<()> {
    let arbitrum = |l1_gas| MockChain {
        l1_surcharge: L1Surcharge::GasComponent,
        l1_gas,
        ..MockChain::legacy(42161, 10 * GWEI)
    };
    let without = Environment::setup(vec![arbitrum(0)]);
    let with = Environment::setup(vec![arbitrum(1_000_000)]);

    assert!(quote(&with, 42161).await?.fee_amount > quote(&without, 42161).await?.fee_amount);

    Ok(())
}

#[tokio::test]
async fn op_data_fee_is_charged() -> eyre::Result<()> {
    let optimism = |l1_base_fee: u64| MockChain {
        l1_surcharge: L1Surcharge::DataFee {
            oracle: address!("0x420000000000000000000000000000000000000F"),
            scaling_divisor: 1_000_000,
        },
        l1_fee_inputs: L1FeeInputs {
            l1_base_fee: U256::from(l1_base_fee),
            scalar: U256::from(684_000),
            l1_gas_used: U256::from(3_000),
        },
        ..MockChain::legacy(10, GWEI)
    };
    let without = Environment::setup(vec![optimism(0)]);
    let with = Environment::setup(vec![optimism(100 * GWEI as u64)]);

    let without = quote(&without, 10).await?;
    let with = quote(&with, 10).await?;
    // (3000 + 1552) * 0.684 * 100 gwei
    assert!(with.fee_amount - without.fee_amount > U256::from(300_000_000_000_000u64));

    Ok(())
}

#[tokio::test]
async fn flashloan_batches_cost_more() -> eyre::Result<()> {
    let env = Environment::setup(vec![MockChain::legacy(137, 100 * GWEI).with_cast_gas(500_000)]);
    let chain = env.chain(137);

    let regular = env.orchestrator.estimation().estimate(chain, transfer(137)).await?;
    let flashloan = env
        .orchestrator
        .estimation()
        .estimate(chain, EstimationRequest { action_id: U256::from(21), ..transfer(137) })
        .await?;
    assert!(flashloan.fee_amount > regular.fee_amount);

    Ok(())
}

#[tokio::test]
async fn simulation_revert() {
    let mut chain = MockChain::legacy(137, GWEI);
    if let Some(simulation) = &mut chain.simulation {
        simulation.success = false;
        simulation.revert_reason = "insufficient balance".to_string();
    }
    let env = Environment::setup(vec![chain]);

    let err = quote(&env, 137).await.unwrap_err();
    assert!(matches!(
        &err,
        EstimationError::SimulationReverted(reason) if reason == "insufficient balance"
    ));
    assert!(!err.is_hard());
}

#[tokio::test]
async fn simulation_call_failure() {
    let env =
        Environment::setup(vec![MockChain { simulation: None, ..MockChain::legacy(137, GWEI) }]);
    assert!(matches!(quote(&env, 137).await, Err(EstimationError::Rpc(_))));
}

#[tokio::test]
async fn missing_native_price() {
    let env = Environment::setup_with_config(
        vec![MockChain::legacy(137, GWEI)],
        EnvironmentConfig { native_price: None, ..Default::default() },
    );
    assert!(matches!(quote(&env, 137).await, Err(EstimationError::PriceUnavailable(137))));
}
