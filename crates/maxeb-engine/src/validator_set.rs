//! Validator counts and ordered validator balances.

use serde::{Deserialize, Serialize};

use maxeb_types::Eth;

use crate::{EngineError, Result};

/// Upper bound on validators created by a single split of the stake.
pub const MAX_VALIDATORS: u64 = 1 << 32;

/// Whole validators of `stake` ETH that fit in `total_stake`.
///
/// Fails instead of saturating when the count is not finite or exceeds
/// [`MAX_VALIDATORS`].
pub fn whole_validators(total_stake: Eth, stake: Eth) -> Result<u64> {
    let count = (total_stake / stake).floor().max(0.0);
    if count.is_finite() && count <= MAX_VALIDATORS as f64 {
        // In range and integral, so the cast is exact.
        Ok(count as u64)
    } else {
        Err(EngineError::TooManyValidators {
            total_stake,
            stake,
            max: MAX_VALIDATORS,
        })
    }
}

/// Ordered sequence of validator balances, in ETH.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorSet(Vec<Eth>);

impl ValidatorSet {
    /// A set of `count` validators all holding `stake`.
    pub fn uniform(count: u64, stake: Eth) -> Result<Self> {
        let len = usize::try_from(count)
            .ok()
            .filter(|_| count <= MAX_VALIDATORS)
            .ok_or_else(|| EngineError::TooManyValidators {
                total_stake: count as f64 * stake,
                stake,
                max: MAX_VALIDATORS,
            })?;
        Ok(Self(vec![stake; len]))
    }

    /// Append a single validator.
    pub fn push(&mut self, stake: Eth) {
        self.0.push(stake);
    }

    /// Number of validators.
    pub fn len(&self) -> u64 {
        self.0.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of balances, accumulated in order.
    pub fn total(&self) -> Eth {
        self.0.iter().fold(0.0, |acc, b| acc + b)
    }

    pub fn balances(&self) -> &[Eth] {
        &self.0
    }

    /// Replace every balance with `f(balance)`.
    pub fn map(&self, f: impl Fn(Eth) -> Eth) -> Self {
        Self(self.0.iter().map(|&b| f(b)).collect())
    }
}
