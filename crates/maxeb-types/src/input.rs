//! Calculator inputs.

use serde::{Deserialize, Serialize};

use crate::Eth;

/// The three values a calculation run is a pure function of.
///
/// Practical ranges are a stake of 32 to 1,000,000 ETH, a network APR of
/// 1% to 6% and 1 to 5 years, but values outside them are still computed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct SimulationInput {
    /// Total ETH available to stake.
    pub total_stake: Eth,
    /// Network-wide annual yield, in percent.
    pub network_apr: f64,
    /// Simulated horizon in whole years.
    pub years: u32,
}

impl Default for SimulationInput {
    fn default() -> Self {
        Self {
            total_stake: 100_000.0,
            network_apr: 3.38,
            years: 3,
        }
    }
}

/// Network APR divided into its consensus and execution layer parts, in percent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct AprSplit {
    pub cl_apr: f64,
    pub el_apr: f64,
}
