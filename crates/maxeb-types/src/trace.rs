//! Stage snapshots emitted by an opted-in calculation run.
//!
//! The trace is a debugging side channel. Nothing in a [`crate::ComparisonResult`]
//! depends on whether it was recorded.

use serde::{Deserialize, Serialize};

use crate::Eth;

/// One named snapshot of intermediate pipeline values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Inputs and the derived APR split.
    Setup {
        total_stake: Eth,
        network_apr: f64,
        cl_apr: f64,
        el_apr: f64,
        years: u32,
    },
    /// Solver output.
    Distribution {
        optimal_stake: Eth,
        #[ts(type = "number")]
        num_validators: u64,
        remaining_eth: Eth,
        has_extra: bool,
        total_staked: Eth,
        iterations: u32,
        converged: bool,
    },
    /// Standard strategy before the first week.
    StandardStart {
        #[ts(type = "number")]
        initial_validators: u64,
        initial_fees: Eth,
        weekly_reward_per_validator: Eth,
    },
    /// Quarterly checkpoint inside a standard year (weeks 1, 14, 27 and 40).
    StandardWeek {
        year: u32,
        week: u32,
        week_rewards: Eth,
        excess_rewards: Eth,
        #[ts(type = "number")]
        active_validators: u64,
        #[ts(type = "number")]
        pending_validators: u64,
    },
    /// End of a standard year.
    StandardYear {
        year: u32,
        year_rewards: Eth,
        #[ts(type = "number")]
        active_validators: u64,
        fees_so_far: Eth,
    },
    /// Optimized strategy before the first year.
    OptimizedStart {
        balances: Vec<Eth>,
        initial_fees: Eth,
        total_staked: Eth,
    },
    /// End of an optimized year.
    OptimizedYear {
        year: u32,
        year_rewards: Eth,
        balances: Vec<Eth>,
        total_rewards_so_far: Eth,
    },
    /// Figures feeding the final comparison.
    Final {
        standard_capital: Eth,
        optimized_capital: Eth,
        standard_apr: Option<f64>,
        optimized_apr: Option<f64>,
        standard_net_rewards: Eth,
        optimized_net_rewards: Eth,
        rescaled: bool,
    },
}

impl TraceEvent {
    /// Stage name as it appears in serialized form.
    pub fn stage(&self) -> &'static str {
        match self {
            TraceEvent::Setup { .. } => "setup",
            TraceEvent::Distribution { .. } => "distribution",
            TraceEvent::StandardStart { .. } => "standard_start",
            TraceEvent::StandardWeek { .. } => "standard_week",
            TraceEvent::StandardYear { .. } => "standard_year",
            TraceEvent::OptimizedStart { .. } => "optimized_start",
            TraceEvent::OptimizedYear { .. } => "optimized_year",
            TraceEvent::Final { .. } => "final",
        }
    }
}
