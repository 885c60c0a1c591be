//! Optimized strategy: validators sized to compound up to the cap.
//!
//! The validator set is fixed at the start (one activation fee each) and
//! never grows; each balance compounds yearly on its whole-ETH part until it
//! reaches 2048 ETH, after which it earns nothing further.

use maxeb_types::{Eth, OptimalDistribution, TraceEvent, ACTIVATION_FEE, MAX_EFFECTIVE_BALANCE};

use crate::growth::{continuous_rate, floored_reward, simulate_validator_growth};
use crate::trace::TraceSink;
use crate::validator_set::ValidatorSet;
use crate::Result;

/// Outcome of the optimized strategy over the whole horizon.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimizedRun {
    pub yearly_rewards: Vec<Eth>,
    pub total_rewards: Eth,
    pub total_fees: Eth,
    /// Initial capital actually staked: main validators plus the extra one.
    pub capital_base: Eth,
    /// Balances at the end of the horizon.
    pub validators: ValidatorSet,
}

/// Initial validator set: `num_validators` at the optimal stake, then the
/// remainder as one extra validator when it is at least 32 ETH.
pub fn initial_validators(distribution: &OptimalDistribution) -> Result<ValidatorSet> {
    let mut set = ValidatorSet::uniform(distribution.num_validators, distribution.optimal_stake)?;
    if distribution.has_extra {
        set.push(distribution.remaining_eth);
    }
    Ok(set)
}

/// Activation fees for the optimized set. No validators are added later.
pub fn activation_fees(distribution: &OptimalDistribution) -> Eth {
    distribution.num_validators as f64 * ACTIVATION_FEE
        + if distribution.has_extra {
            ACTIVATION_FEE
        } else {
            0.0
        }
}

/// Balance after one year. Validators already at the cap are left untouched.
fn grow_balance(balance: Eth, annual_rate: f64) -> Eth {
    if balance >= MAX_EFFECTIVE_BALANCE {
        balance
    } else {
        (balance + floored_reward(balance, annual_rate)).min(MAX_EFFECTIVE_BALANCE)
    }
}

/// Yearly trajectory of every validator in `set`, initial balance first.
pub fn trajectories(set: &ValidatorSet, cl_apr: f64, years: u32) -> Vec<Vec<Eth>> {
    set.balances()
        .iter()
        .map(|&stake| simulate_validator_growth(stake, cl_apr, years))
        .collect()
}

/// Simulate the optimized strategy year by year over `years` years.
pub fn simulate_optimized<S: TraceSink>(
    distribution: &OptimalDistribution,
    cl_apr: f64,
    years: u32,
    sink: &mut S,
) -> Result<OptimizedRun> {
    let rate = continuous_rate(cl_apr, 1);
    let start = initial_validators(distribution)?;
    let total_fees = activation_fees(distribution);
    let capital_base = start.total();

    tracing::debug!(
        validators = start.len(),
        initial_fees = total_fees,
        capital_base,
        "optimized: starting simulation"
    );
    sink.record(TraceEvent::OptimizedStart {
        balances: start.balances().to_vec(),
        initial_fees: total_fees,
        total_staked: capital_base,
    });

    let (validators, yearly_rewards, total_rewards) = (1..=years).fold(
        (start, Vec::new(), 0.0),
        |(current, mut yearly, total): (ValidatorSet, Vec<Eth>, Eth), year| {
            let next = current.map(|b| grow_balance(b, rate));
            let year_rewards = current
                .balances()
                .iter()
                .zip(next.balances())
                .fold(0.0, |acc, (before, after)| acc + (after - before));
            let total = total + year_rewards;
            yearly.push(year_rewards);

            tracing::trace!(year, year_rewards, total, "optimized: closed year");
            if sink.enabled() {
                sink.record(TraceEvent::OptimizedYear {
                    year,
                    year_rewards,
                    balances: next.balances().to_vec(),
                    total_rewards_so_far: total,
                });
            }
            (next, yearly, total)
        },
    );

    Ok(OptimizedRun {
        yearly_rewards,
        total_rewards,
        total_fees,
        capital_base,
        validators,
    })
}
