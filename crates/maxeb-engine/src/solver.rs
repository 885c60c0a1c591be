//! Optimal initial stake search.
//!
//! Bisects over `[32, 2048]` for the initial balance that compounds up to the
//! effective balance cap after the requested number of years. The inner
//! simulation uses the same floored annual step as [`crate::growth`] but
//! returns as soon as the cap is reached.
//!
//! When the target cannot be met within [`SOLVER_TOLERANCE`] (for example a
//! zero-year horizon), the search stops on bracket width and returns the
//! converged midpoint.

use std::ops::ControlFlow;

use maxeb_types::{
    Eth, OptimalDistribution, MAX_EFFECTIVE_BALANCE, MIN_VALIDATOR_STAKE, SOLVER_TOLERANCE,
};

use crate::apr::split_network_apr;
use crate::growth::{continuous_rate, floored_reward};
use crate::validator_set::whole_validators;
use crate::Result;

/// Result of the bisection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverOutcome {
    pub optimal_stake: Eth,
    /// Midpoints evaluated.
    pub iterations: u32,
    /// Whether a midpoint landed within tolerance of the cap.
    pub converged: bool,
}

/// Balance of a validator starting at `initial` after `years` annual steps,
/// stopping early once the cap is reached.
pub fn simulate_to_target(initial: Eth, annual_rate: f64, years: u32) -> Eth {
    let outcome = (0..years).try_fold(initial, |balance, _| {
        if balance >= MAX_EFFECTIVE_BALANCE {
            ControlFlow::Break(balance)
        } else {
            ControlFlow::Continue(
                (balance + floored_reward(balance, annual_rate)).min(MAX_EFFECTIVE_BALANCE),
            )
        }
    });
    match outcome {
        ControlFlow::Continue(balance) | ControlFlow::Break(balance) => balance,
    }
}

/// Bisect for the stake that reaches the cap after `years` at `cl_apr` percent.
pub fn solve_optimal_stake(cl_apr: f64, years: u32) -> SolverOutcome {
    let rate = continuous_rate(cl_apr, 1);
    let target = MAX_EFFECTIVE_BALANCE;
    let mut low = MIN_VALIDATOR_STAKE;
    let mut high = target;
    let mut iterations = 0;
    let mut converged = false;

    while high - low > SOLVER_TOLERANCE {
        debug_assert!(MIN_VALIDATOR_STAKE <= low && low <= high && high <= target);
        iterations += 1;
        let mid = (low + high) / 2.0;
        let final_balance = simulate_to_target(mid, rate, years);

        if (final_balance - target).abs() < SOLVER_TOLERANCE {
            converged = true;
            break;
        } else if final_balance < target {
            low = mid;
        } else {
            high = mid;
        }
    }

    let optimal_stake = (low + high) / 2.0;

    if converged {
        tracing::trace!(optimal_stake, iterations, "solver: converged");
    } else {
        tracing::warn!(
            optimal_stake,
            iterations,
            years,
            "solver: cap unreachable within tolerance, using bracket midpoint"
        );
    }

    SolverOutcome {
        optimal_stake,
        iterations,
        converged,
    }
}

/// Divide `total_stake` into validators of `optimal_stake` plus a remainder.
pub fn distribute(total_stake: Eth, optimal_stake: Eth) -> Result<OptimalDistribution> {
    let num_validators = whole_validators(total_stake, optimal_stake)?;
    let remaining_eth = total_stake - num_validators as f64 * optimal_stake;
    Ok(OptimalDistribution {
        optimal_stake,
        num_validators,
        remaining_eth,
        has_extra: remaining_eth >= MIN_VALIDATOR_STAKE,
    })
}

/// Solve for the optimal stake at the CL share of `network_apr` and divide
/// `total_stake` accordingly.
pub fn find_optimal_distribution(
    total_stake: Eth,
    network_apr: f64,
    years: u32,
) -> Result<OptimalDistribution> {
    let split = split_network_apr(network_apr);
    let outcome = solve_optimal_stake(split.cl_apr, years);
    distribute(total_stake, outcome.optimal_stake)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::simulate_validator_growth;
    use crate::EngineError;

    const CL_APR: f64 = 3.38 * 0.825;

    #[test]
    fn test_converges_to_cap() {
        let outcome = solve_optimal_stake(CL_APR, 3);
        assert!(outcome.converged);
        let rate = continuous_rate(CL_APR, 1);
        let reached = simulate_to_target(outcome.optimal_stake, rate, 3);
        assert!((reached - MAX_EFFECTIVE_BALANCE).abs() < SOLVER_TOLERANCE);

        let trajectory = simulate_validator_growth(outcome.optimal_stake, CL_APR, 3);
        let last = trajectory.last().copied().expect("non-empty trajectory");
        assert!((last - MAX_EFFECTIVE_BALANCE).abs() < SOLVER_TOLERANCE);
    }

    #[test]
    fn test_known_optimal_stakes() {
        // Capped midpoints hit the target exactly, so the search stops early.
        for (years, expected) in [(1, 2016.5), (2, 1985.0), (3, 1922.0), (5, 1796.0)] {
            let outcome = solve_optimal_stake(CL_APR, years);
            assert!(
                (outcome.optimal_stake - expected).abs() < 1e-9,
                "years {years}: got {}",
                outcome.optimal_stake
            );
        }
    }

    #[test]
    fn test_zero_years_uses_bracket_midpoint() {
        let outcome = solve_optimal_stake(CL_APR, 0);
        assert!(!outcome.converged);
        assert!(outcome.optimal_stake < MAX_EFFECTIVE_BALANCE);
        assert!(MAX_EFFECTIVE_BALANCE - outcome.optimal_stake < SOLVER_TOLERANCE);
    }

    #[test]
    fn test_zero_apr_stays_in_bounds() {
        let outcome = solve_optimal_stake(0.0, 3);
        assert!(outcome.optimal_stake >= MIN_VALIDATOR_STAKE);
        assert!(outcome.optimal_stake <= MAX_EFFECTIVE_BALANCE);
    }

    #[test]
    fn test_simulate_to_target_stops_at_cap() {
        let rate = continuous_rate(CL_APR, 1);
        assert_eq!(simulate_to_target(2048.0, rate, 3), 2048.0);
        assert_eq!(simulate_to_target(2040.0, rate, 3), 2048.0);
        assert_eq!(simulate_to_target(100.0, rate, 0), 100.0);
    }

    #[test]
    fn test_distribution_consistency() {
        for total in [10.0, 32.0, 1000.0, 5000.5, 100_000.0, 1_000_000.0] {
            for stake in [32.0, 1796.0, 1922.0, 2016.5, 2047.99] {
                let d = distribute(total, stake).expect("distribute");
                let rebuilt = d.num_validators as f64 * d.optimal_stake + d.remaining_eth;
                assert!((rebuilt - total).abs() < 1e-6);
                assert!(d.remaining_eth >= 0.0 && d.remaining_eth < d.optimal_stake);
                assert_eq!(d.num_validators, (total / stake).floor() as u64);
                assert_eq!(d.has_extra, d.remaining_eth >= 32.0);
            }
        }
    }

    #[test]
    fn test_distribution_below_minimum_stake() {
        let d = find_optimal_distribution(10.0, 3.38, 2).expect("distribute");
        assert_eq!(d.num_validators, 0);
        assert_eq!(d.remaining_eth, 10.0);
        assert!(!d.has_extra);
    }

    #[test]
    fn test_default_scenario_distribution() {
        let d = find_optimal_distribution(100_000.0, 3.38, 3).expect("distribute");
        assert_eq!(d.num_validators, 52);
        assert!((d.remaining_eth - 56.0).abs() < 1e-9);
        assert!(d.has_extra);
    }

    #[test]
    fn test_distribution_rejects_unrepresentable_count() {
        assert!(matches!(
            distribute(1e300, 1922.0),
            Err(EngineError::TooManyValidators { .. })
        ));
    }
}
