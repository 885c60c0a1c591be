//! # maxeb-types
//!
//! Shared domain types for the validator stake optimizer.
//! Every structure here is produced by `maxeb-engine` and rendered by a view
//! layer, so all of them serialize to JSON and export TypeScript bindings.

pub mod input;
pub mod result;
pub mod trace;

pub use input::{AprSplit, SimulationInput};
pub use result::{ComparisonResult, OptimalDistribution, StrategyOutcome};
pub use trace::TraceEvent;

/// Amount of ether, as a float.
pub type Eth = f64;

/// Maximum effective balance of a single validator (MaxEB), in ETH.
pub const MAX_EFFECTIVE_BALANCE: Eth = 2048.0;

/// Stake of a standard validator, and the solver's lower bound, in ETH.
pub const MIN_VALIDATOR_STAKE: Eth = 32.0;

/// Share of the network APR attributed to the consensus layer.
pub const CL_RATIO: f64 = 0.825;

/// Share of the network APR attributed to the execution layer.
pub const EL_RATIO: f64 = 0.175;

/// One-off fee paid when a validator is activated, in ETH.
pub const ACTIVATION_FEE: Eth = 0.002;

/// Gas paid per validator per weekly reward withdrawal, in ETH.
pub const GAS_COST_PER_WITHDRAWAL: Eth = 0.0001;

/// Excess rewards needed before a new standard validator can be funded.
pub const ACTIVATION_THRESHOLD: Eth = 32.002;

/// Largest total stake a calculation accepts, in ETH. Above the circulating
/// ETH supply, so any real holding fits.
pub const MAX_TOTAL_STAKE: Eth = 200_000_000.0;

/// Reward sweeps per simulated year.
pub const WEEKS_PER_YEAR: u32 = 52;

/// Acceptable distance from [`MAX_EFFECTIVE_BALANCE`] for the stake solver.
pub const SOLVER_TOLERANCE: Eth = 1e-4;
