//! # maxeb-engine
//!
//! Simulation and search engine comparing two validator staking strategies
//! over a multi-year horizon:
//!
//! - **Standard**: fixed 32 ETH validators whose weekly rewards are swept
//!   into newly activated validators.
//! - **Optimized**: validators sized so that continuous compounding brings
//!   them up to the 2048 ETH effective balance cap by the end of the horizon.
//!
//! The whole pipeline is synchronous and runs to completion on every call to
//! [`calculate`]; results are immutable and each run builds fresh state.
//!
//! ## Modules
//!
//! - [`apr`]: Network APR split into CL and EL parts
//! - [`growth`]: Single-validator balance trajectory under the cap
//! - [`solver`]: Bisection for the optimal initial stake
//! - [`standard`]: Weekly simulation of the standard strategy
//! - [`optimized`]: Yearly simulation of the optimized strategy
//! - [`el`]: Execution layer rewards
//! - [`compare`]: Yield aggregation and the pipeline entry point
//! - [`trace`]: Opt-in stage snapshots
//! - [`session`]: Recalculation state for a view layer
//! - [`validator_set`]: Checked validator counts and ordered balances

pub mod apr;
pub mod compare;
pub mod el;
pub mod growth;
pub mod optimized;
pub mod session;
pub mod solver;
pub mod standard;
pub mod trace;
pub mod validator_set;

pub use compare::{calculate, calculate_traced};
pub use session::Calculator;
pub use trace::{NoTrace, Trace, TraceSink};
pub use validator_set::ValidatorSet;

/// Error types for engine operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// An input field is unusable (non-finite, negative or too large).
    #[error("invalid input `{field}`: {reason}")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// Splitting the stake would create more validators than can be tracked.
    #[error("{total_stake} ETH in {stake} ETH validators exceeds {max} validators")]
    TooManyValidators {
        total_stake: f64,
        /// Stake of each validator.
        stake: f64,
        max: u64,
    },
}

/// Convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
