//! Result aggregation and the calculation pipeline.
//!
//! ## Annualized yield
//!
//! ```text
//! apr = (total_rewards - total_fees) / capital_base / years * 100
//! ```
//!
//! The standard strategy normalizes over its *final* validator count times
//! 32 ETH, the optimized strategy over the capital it actually staked.
//!
//! ## Reward reconciliation
//!
//! Because the two capital bases differ, the optimized strategy can show a
//! higher yield yet lower absolute rewards. In that case its total rewards are
//! rescaled to `standard_total_rewards * optimized_apr / standard_apr`. Net
//! rewards are taken before the rescale.

use maxeb_types::{
    ComparisonResult, Eth, SimulationInput, StrategyOutcome, TraceEvent, MAX_TOTAL_STAKE,
    MIN_VALIDATOR_STAKE,
};

use crate::apr::split_network_apr;
use crate::el::el_rewards;
use crate::optimized::{initial_validators, simulate_optimized, trajectories};
use crate::solver::{distribute, solve_optimal_stake};
use crate::standard::simulate_standard;
use crate::trace::{NoTrace, TraceSink};
use crate::{EngineError, Result};

/// Reject inputs no simulation can be run on.
///
/// Out-of-range but finite values (stake below 32, zero years) are accepted.
/// Stakes above [`MAX_TOTAL_STAKE`] are not.
pub fn validate_input(input: &SimulationInput) -> Result<()> {
    if !input.total_stake.is_finite() || input.total_stake < 0.0 {
        return Err(EngineError::InvalidInput {
            field: "total_stake",
            reason: format!("must be a finite, non-negative amount, got {}", input.total_stake),
        });
    }
    if input.total_stake > MAX_TOTAL_STAKE {
        return Err(EngineError::InvalidInput {
            field: "total_stake",
            reason: format!(
                "must not exceed {MAX_TOTAL_STAKE} ETH, got {}",
                input.total_stake
            ),
        });
    }
    if !input.network_apr.is_finite() || input.network_apr < 0.0 {
        return Err(EngineError::InvalidInput {
            field: "network_apr",
            reason: format!(
                "must be a finite, non-negative percentage, got {}",
                input.network_apr
            ),
        });
    }
    Ok(())
}

/// Net annualized yield in percent, or `None` when the capital base or the
/// horizon is zero.
pub fn annualized_yield(
    total_rewards: Eth,
    total_fees: Eth,
    capital_base: Eth,
    years: u32,
) -> Option<f64> {
    if capital_base <= 0.0 || years == 0 {
        return None;
    }
    let apr = (total_rewards - total_fees) / capital_base / f64::from(years) * 100.0;
    apr.is_finite().then_some(apr)
}

/// Optimized total rewards after reconciliation, and whether the rescale fired.
pub fn reconcile_rewards(
    standard_apr: Option<f64>,
    optimized_apr: Option<f64>,
    standard_total_rewards: Eth,
    optimized_total_rewards: Eth,
) -> (Eth, bool) {
    match (standard_apr, optimized_apr) {
        (Some(standard), Some(optimized))
            if optimized > standard && optimized_total_rewards <= standard_total_rewards =>
        {
            let adjustment_factor = optimized / standard;
            (standard_total_rewards * adjustment_factor, true)
        }
        _ => (optimized_total_rewards, false),
    }
}

/// Run the full pipeline without recording a trace.
pub fn calculate(input: &SimulationInput) -> Result<ComparisonResult> {
    calculate_traced(input, &mut NoTrace)
}

/// Run the full pipeline, reporting stage snapshots to `sink`.
pub fn calculate_traced<S: TraceSink>(
    input: &SimulationInput,
    sink: &mut S,
) -> Result<ComparisonResult> {
    validate_input(input)?;
    let (total_stake, network_apr, years) = (input.total_stake, input.network_apr, input.years);

    let split = split_network_apr(network_apr);
    tracing::debug!(
        total_stake,
        network_apr,
        cl_apr = split.cl_apr,
        years,
        "calculation started"
    );
    sink.record(TraceEvent::Setup {
        total_stake,
        network_apr,
        cl_apr: split.cl_apr,
        el_apr: split.el_apr,
        years,
    });

    let solved = solve_optimal_stake(split.cl_apr, years);
    let distribution = distribute(total_stake, solved.optimal_stake)?;
    let start = initial_validators(&distribution)?;
    tracing::debug!(
        optimal_stake = distribution.optimal_stake,
        num_validators = distribution.num_validators,
        remaining_eth = distribution.remaining_eth,
        has_extra = distribution.has_extra,
        "optimal distribution found"
    );
    sink.record(TraceEvent::Distribution {
        optimal_stake: distribution.optimal_stake,
        num_validators: distribution.num_validators,
        remaining_eth: distribution.remaining_eth,
        has_extra: distribution.has_extra,
        total_staked: start.total(),
        iterations: solved.iterations,
        converged: solved.converged,
    });
    let validator_balances = trajectories(&start, split.cl_apr, years);

    let standard = simulate_standard(total_stake, split.cl_apr, years, &mut *sink)?;
    let optimized = simulate_optimized(&distribution, split.cl_apr, years, &mut *sink)?;

    let standard_capital = standard.capital_base();
    let standard_apr = annualized_yield(
        standard.total_rewards,
        standard.total_fees,
        standard_capital,
        years,
    );
    let optimized_apr = annualized_yield(
        optimized.total_rewards,
        optimized.total_fees,
        optimized.capital_base,
        years,
    );

    let standard_net = standard.total_rewards - standard.total_fees;
    let optimized_net = optimized.total_rewards - optimized.total_fees;

    let (optimized_total_rewards, rescaled) = reconcile_rewards(
        standard_apr,
        optimized_apr,
        standard.total_rewards,
        optimized.total_rewards,
    );
    if rescaled {
        tracing::warn!(
            before = optimized.total_rewards,
            after = optimized_total_rewards,
            "optimized rewards rescaled to match yield ordering"
        );
    }

    tracing::debug!(
        ?standard_apr,
        ?optimized_apr,
        standard_net,
        optimized_net,
        "calculation finished"
    );
    sink.record(TraceEvent::Final {
        standard_capital,
        optimized_capital: optimized.capital_base,
        standard_apr,
        optimized_apr,
        standard_net_rewards: standard_net,
        optimized_net_rewards: optimized_net,
        rescaled,
    });

    let standard_initial_capital = standard.initial_validators as f64 * MIN_VALIDATOR_STAKE;

    Ok(ComparisonResult {
        input: input.clone(),
        apr_split: split,
        standard_initial_validators: standard.initial_validators,
        standard_final_validators: standard.final_validators(),
        standard_minted_validators: standard.minted,
        standard_withdrawals: standard.withdrawals,
        standard: StrategyOutcome {
            yearly_rewards: standard.yearly_rewards,
            total_rewards: standard.total_rewards,
            total_fees: standard.total_fees,
            net_rewards: standard_net,
            capital_base: standard_capital,
            annualized_cl_apr: standard_apr,
            el_rewards: el_rewards(standard_initial_capital, split.el_apr, years),
        },
        optimized: StrategyOutcome {
            yearly_rewards: optimized.yearly_rewards,
            total_rewards: optimized_total_rewards,
            total_fees: optimized.total_fees,
            net_rewards: optimized_net,
            capital_base: optimized.capital_base,
            annualized_cl_apr: optimized_apr,
            el_rewards: el_rewards(optimized.capital_base, split.el_apr, years),
        },
        distribution,
        validator_balances,
        optimized_rewards_rescaled: rescaled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Trace;

    fn input(total_stake: f64, network_apr: f64, years: u32) -> SimulationInput {
        SimulationInput {
            total_stake,
            network_apr,
            years,
        }
    }

    #[test]
    fn test_default_scenario() {
        let result = calculate(&SimulationInput::default()).expect("calculate");
        assert!((result.apr_split.cl_apr - 2.7885).abs() < 1e-9);
        let d = &result.distribution;
        assert!(d.optimal_stake > 32.0 && d.optimal_stake < 2048.0);
        assert_eq!(d.num_validators, (100_000.0 / d.optimal_stake).floor() as u64);

        let standard = result.standard.annualized_cl_apr.expect("standard yield");
        let optimized = result.optimized.annualized_cl_apr.expect("optimized yield");
        assert!(standard > 0.0 && standard < 10.0);
        assert!(optimized > 0.0 && optimized < 10.0);
        assert!(!result.optimized_rewards_rescaled);
        assert!((standard - 2.657469).abs() < 1e-5);
        assert!((optimized - 2.185586).abs() < 1e-5);
    }

    #[test]
    fn test_rescale_fires_on_five_years() {
        let result = calculate(&input(100_000.0, 3.38, 5)).expect("calculate");
        assert!(result.optimized_rewards_rescaled);
        let standard = result.standard.annualized_cl_apr.expect("standard yield");
        let optimized = result.optimized.annualized_cl_apr.expect("optimized yield");
        assert!(optimized > standard);
        let expected = result.standard.total_rewards * (optimized / standard);
        assert_eq!(result.optimized.total_rewards, expected);
        // Net rewards still reflect the simulated, unscaled total.
        assert!((result.optimized.net_rewards - (14042.445951 - 0.112)).abs() < 1e-4);
    }

    #[test]
    fn test_reconcile_rewards_rules() {
        assert_eq!(reconcile_rewards(Some(2.0), Some(3.0), 100.0, 90.0), (150.0, true));
        assert_eq!(reconcile_rewards(Some(2.0), Some(3.0), 100.0, 120.0), (120.0, false));
        assert_eq!(reconcile_rewards(Some(3.0), Some(2.0), 100.0, 90.0), (90.0, false));
        assert_eq!(reconcile_rewards(None, Some(3.0), 100.0, 90.0), (90.0, false));
        assert_eq!(reconcile_rewards(Some(2.0), Some(2.0), 100.0, 90.0), (90.0, false));
    }

    #[test]
    fn test_annualized_yield_undefined_cases() {
        assert_eq!(annualized_yield(10.0, 1.0, 0.0, 3), None);
        assert_eq!(annualized_yield(10.0, 1.0, 1000.0, 0), None);
        let apr = annualized_yield(31.0, 1.0, 1000.0, 1).expect("defined");
        assert!((apr - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_years() {
        let result = calculate(&input(100_000.0, 3.38, 0)).expect("calculate");
        assert!(result.standard.yearly_rewards.is_empty());
        assert!(result.optimized.yearly_rewards.is_empty());
        assert_eq!(result.standard.total_rewards, 0.0);
        assert_eq!(result.optimized.total_rewards, 0.0);
        assert_eq!(result.standard.annualized_cl_apr, None);
        assert_eq!(result.optimized.annualized_cl_apr, None);
        assert!(result.validator_balances.iter().all(|p| p.len() == 1));
    }

    #[test]
    fn test_stake_below_minimum() {
        let result = calculate(&input(10.0, 3.38, 2)).expect("calculate");
        assert_eq!(result.distribution.num_validators, 0);
        assert_eq!(result.distribution.remaining_eth, 10.0);
        assert!(!result.distribution.has_extra);
        assert_eq!(result.standard_initial_validators, 0);
        assert_eq!(result.standard.annualized_cl_apr, None);
        assert_eq!(result.optimized.annualized_cl_apr, None);
        assert!(result.validator_balances.is_empty());
        assert!(!result.optimized_rewards_rescaled);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        for bad in [
            input(f64::NAN, 3.38, 3),
            input(-1.0, 3.38, 3),
            input(f64::INFINITY, 3.38, 3),
            input(1000.0, f64::NAN, 3),
            input(1000.0, -0.5, 3),
            input(1e300, 3.38, 1),
            input(MAX_TOTAL_STAKE * 2.0, 3.38, 1),
        ] {
            assert!(matches!(
                calculate(&bad),
                Err(EngineError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn test_stake_ceiling_is_inclusive() {
        assert!(validate_input(&input(MAX_TOTAL_STAKE, 3.38, 1)).is_ok());
        let err = validate_input(&input(MAX_TOTAL_STAKE + 1.0, 3.38, 1)).expect_err("too large");
        assert!(matches!(err, EngineError::InvalidInput { field: "total_stake", .. }));
    }

    #[test]
    fn test_el_rewards_on_initial_capital() {
        let result = calculate(&SimulationInput::default()).expect("calculate");
        assert!((result.standard.el_rewards - 100_000.0 * 0.005915 * 3.0).abs() < 1e-6);
        assert!((result.optimized.el_rewards - 100_000.0 * 0.005915 * 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_trace_stage_order() {
        let mut trace = Trace::new();
        let traced = calculate_traced(&input(5_000.0, 3.38, 2), &mut trace).expect("calculate");
        let untraced = calculate(&input(5_000.0, 3.38, 2)).expect("calculate");
        assert_eq!(traced, untraced);

        let stages: Vec<&str> = trace.events().iter().map(|e| e.stage()).collect();
        assert_eq!(stages.first(), Some(&"setup"));
        assert_eq!(stages.get(1), Some(&"distribution"));
        assert_eq!(stages.last(), Some(&"final"));
        assert_eq!(trace.stage("standard_year").count(), 2);
        assert_eq!(trace.stage("optimized_year").count(), 2);
    }
}
