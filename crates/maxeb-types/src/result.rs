//! Calculation results consumed by the view layer.
//!
//! A [`ComparisonResult`] is built once per run and never mutated; the next
//! run produces a new one that supersedes it.

use serde::{Deserialize, Serialize};

use crate::{AprSplit, Eth, SimulationInput};

/// How the total stake is divided among optimized validators.
///
/// `num_validators * optimal_stake + remaining_eth == total_stake` within
/// floating tolerance, and `remaining_eth` lies in `[0, optimal_stake)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct OptimalDistribution {
    /// Initial balance of each main validator.
    pub optimal_stake: Eth,
    /// Number of validators funded at `optimal_stake`.
    #[ts(type = "number")]
    pub num_validators: u64,
    /// ETH left after funding the main validators.
    pub remaining_eth: Eth,
    /// Whether the remainder is large enough (>= 32 ETH) for one extra validator.
    pub has_extra: bool,
}

impl OptimalDistribution {
    /// Number of validators that are actually run, extra one included.
    pub fn validator_count(&self) -> u64 {
        self.num_validators + u64::from(self.has_extra)
    }
}

/// Aggregated figures for one strategy over the whole horizon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct StrategyOutcome {
    /// Consensus layer rewards earned in each simulated year.
    pub yearly_rewards: Vec<Eth>,
    /// Consensus layer rewards over the horizon.
    pub total_rewards: Eth,
    /// Activation fees plus withdrawal gas.
    pub total_fees: Eth,
    /// `total_rewards - total_fees`, taken before any rescale of `total_rewards`.
    pub net_rewards: Eth,
    /// Capital the annualized yield is normalized over.
    pub capital_base: Eth,
    /// Net annualized consensus yield in percent. `None` when the capital
    /// base or the horizon is zero.
    pub annualized_cl_apr: Option<f64>,
    /// Simple-interest execution layer rewards on the initial capital.
    pub el_rewards: Eth,
}

/// Side-by-side comparison of the standard and optimized strategies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct ComparisonResult {
    pub input: SimulationInput,
    pub apr_split: AprSplit,
    pub distribution: OptimalDistribution,
    /// Fixed 32 ETH validators with weekly sweeps into new validators.
    pub standard: StrategyOutcome,
    /// Validators sized to reach MaxEB at the end of the horizon.
    pub optimized: StrategyOutcome,
    #[ts(type = "number")]
    pub standard_initial_validators: u64,
    #[ts(type = "number")]
    pub standard_final_validators: u64,
    /// Validators funded from swept rewards over the horizon.
    #[ts(type = "number")]
    pub standard_minted_validators: u64,
    /// Weekly per-validator withdrawals paid for over the horizon.
    #[ts(type = "number")]
    pub standard_withdrawals: u64,
    /// Yearly balance trajectory of every optimized validator, initial
    /// balance first.
    pub validator_balances: Vec<Vec<Eth>>,
    /// Set when the optimized total rewards were rescaled to agree with the
    /// yield ordering.
    pub optimized_rewards_rescaled: bool,
}

impl ComparisonResult {
    /// Yield gained by the optimized strategy, in percentage points.
    pub fn apr_advantage(&self) -> Option<f64> {
        match (self.optimized.annualized_cl_apr, self.standard.annualized_cl_apr) {
            (Some(optimized), Some(standard)) => Some(optimized - standard),
            _ => None,
        }
    }

    /// Extra consensus rewards of the optimized strategy, in ETH.
    pub fn reward_advantage(&self) -> Eth {
        self.optimized.total_rewards - self.standard.total_rewards
    }

    /// Human-readable validator composition, e.g. `52 × 1922.00 ETH + 1 × 56.00 ETH`.
    pub fn composition(&self) -> String {
        let d = &self.distribution;
        let mut out = format!("{} × {:.2} ETH", d.num_validators, d.optimal_stake);
        if d.has_extra {
            out.push_str(&format!(" + 1 × {:.2} ETH", d.remaining_eth));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(total_rewards: Eth, apr: Option<f64>) -> StrategyOutcome {
        StrategyOutcome {
            yearly_rewards: vec![total_rewards],
            total_rewards,
            total_fees: 0.0,
            net_rewards: total_rewards,
            capital_base: 1000.0,
            annualized_cl_apr: apr,
            el_rewards: 0.0,
        }
    }

    fn sample(has_extra: bool) -> ComparisonResult {
        ComparisonResult {
            input: SimulationInput::default(),
            apr_split: AprSplit {
                cl_apr: 2.7885,
                el_apr: 0.5915,
            },
            distribution: OptimalDistribution {
                optimal_stake: 1922.0,
                num_validators: 52,
                remaining_eth: 56.0,
                has_extra,
            },
            standard: outcome(100.0, Some(2.5)),
            optimized: outcome(110.0, Some(2.75)),
            standard_initial_validators: 3125,
            standard_final_validators: 3397,
            standard_minted_validators: 272,
            standard_withdrawals: 508_252,
            validator_balances: vec![vec![1922.0, 1976.0]],
            optimized_rewards_rescaled: false,
        }
    }

    #[test]
    fn test_composition_with_extra() {
        assert_eq!(sample(true).composition(), "52 × 1922.00 ETH + 1 × 56.00 ETH");
    }

    #[test]
    fn test_composition_without_extra() {
        assert_eq!(sample(false).composition(), "52 × 1922.00 ETH");
    }

    #[test]
    fn test_validator_count() {
        assert_eq!(sample(true).distribution.validator_count(), 53);
        assert_eq!(sample(false).distribution.validator_count(), 52);
    }

    #[test]
    fn test_advantages() {
        let result = sample(true);
        let apr = result.apr_advantage().expect("both yields defined");
        assert!((apr - 0.25).abs() < 1e-12);
        assert!((result.reward_advantage() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_apr_advantage_undefined() {
        let mut result = sample(true);
        result.standard.annualized_cl_apr = None;
        assert!(result.apr_advantage().is_none());
    }

    #[test]
    fn test_undefined_yield_serializes_as_null() {
        let mut result = sample(true);
        result.optimized.annualized_cl_apr = None;
        let json = serde_json::to_value(&result).expect("serialize");
        assert!(json["optimized"]["annualized_cl_apr"].is_null());

        let restored: ComparisonResult = serde_json::from_value(json).expect("deserialize");
        assert_eq!(restored, result);
    }
}
