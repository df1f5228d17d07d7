//! Minimum-fee selection of the chains to source from.
//!
//! The search is exhaustive over every subset of candidate chains, which is exponential in the
//! number of chains. It is only meant for the handful of chains a deployment supports.

use crate::{
    error::SourcingError,
    types::{Balance, FeeQuote, PlanEntry, SourcingPlan},
};
use alloy::primitives::{ChainId, U256};
use itertools::Itertools;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::trace;

/// Every non-empty subset of `0..n`, by size and then lexicographically.
///
/// Subsets are produced lazily.
pub fn subsets(n: usize) -> impl Iterator<Item = Vec<usize>> {
    (1..=n).flat_map(move |size| (0..n).combinations(size))
}

/// Ordering of covering subsets, lowest is selected.
///
/// Lowest total fee wins, then fewer chains, then the subset that comes first in balance order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SelectionKey {
    total_fee: U256,
    chains: usize,
    positions: Vec<usize>,
}

/// Finds the cheapest set of chains whose balances cover `target` and plans the draw-down.
///
/// Chains are drawn from in `balances` order, the last one only for the remaining shortfall.
/// Entries of the returned plan are sorted ascending by fee.
pub fn find_optimal_sources(
    quotes: &[FeeQuote],
    balances: &[Balance],
    target: Decimal,
) -> Result<SourcingPlan, SourcingError> {
    let available: Decimal = balances.iter().map(|balance| balance.amount).sum();
    if available < target {
        return Err(SourcingError::InsufficientBalance { required: target, available });
    }
    if target <= Decimal::ZERO {
        return Ok(SourcingPlan::default());
    }

    let quotes: HashMap<ChainId, &FeeQuote> =
        quotes.iter().map(|quote| (quote.chain_id, quote)).collect();
    let candidates: Vec<(&Balance, &FeeQuote)> = balances
        .iter()
        .filter_map(|balance| Some((balance, *quotes.get(&balance.chain_id)?)))
        .collect();

    let selected = subsets(candidates.len())
        .filter(|subset| {
            subset.iter().map(|position| candidates[*position].0.amount).sum::<Decimal>() >= target
        })
        .map(|subset| SelectionKey {
            total_fee: subset.iter().fold(U256::ZERO, |total, position| {
                total.saturating_add(candidates[*position].1.fee_amount)
            }),
            chains: subset.len(),
            positions: subset,
        })
        .min()
        .ok_or(SourcingError::QuotesUnavailable)?;
    trace!(?selected, "Selected sources");

    let mut sourced = Decimal::ZERO;
    let mut entries = Vec::with_capacity(selected.chains);
    for position in selected.positions {
        let (balance, quote) = candidates[position];
        let shortfall = target - sourced;
        let amount = balance.amount.min(shortfall);
        sourced += amount;
        entries.push((
            quote.fee_amount,
            PlanEntry {
                chain_id: balance.chain_id,
                chain_name: quote.chain_name.clone(),
                amount_sourced: amount,
                fee_amount: quote.fee_in_usd(),
            },
        ));
        if sourced == target {
            break;
        }
    }

    entries.sort_by_key(|(fee, _)| *fee);
    Ok(SourcingPlan(entries.into_iter().map(|(_, entry)| entry).collect()))
}
