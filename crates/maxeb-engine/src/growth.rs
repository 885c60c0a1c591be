//! Single-validator balance growth under the effective balance cap.
//!
//! Each step credits continuous-compounding rewards on the whole-ETH part of
//! the balance only:
//!
//! ```text
//! reward      = floor(balance) * (exp(apr / 100 / periods) - 1)
//! new_balance = min(balance + reward, 2048)
//! ```
//!
//! Fractional ETH earns nothing in the step it is held.

use maxeb_types::{Eth, MAX_EFFECTIVE_BALANCE};

/// Per-period reward rate for continuous compounding of `apr` percent
/// spread over `periods_per_year` periods.
pub fn continuous_rate(apr: f64, periods_per_year: u32) -> f64 {
    (apr / 100.0 / f64::from(periods_per_year)).exp() - 1.0
}

/// Reward earned by `balance` in one period at `rate`.
pub fn floored_reward(balance: Eth, rate: f64) -> Eth {
    balance.floor() * rate
}

/// One annual step of a validator. Balances at or above the cap stay at the cap.
pub fn compound_year(balance: Eth, annual_rate: f64) -> Eth {
    if balance >= MAX_EFFECTIVE_BALANCE {
        return MAX_EFFECTIVE_BALANCE;
    }
    (balance + floored_reward(balance, annual_rate)).min(MAX_EFFECTIVE_BALANCE)
}

/// Yearly balances of one validator, initial balance first.
///
/// The returned trajectory has `years + 1` entries. Once the cap is reached
/// every later entry is the cap.
pub fn simulate_validator_growth(initial_stake: Eth, cl_apr: f64, years: u32) -> Vec<Eth> {
    let rate = continuous_rate(cl_apr, 1);
    std::iter::successors(Some(initial_stake), |&balance| {
        Some(compound_year(balance, rate))
    })
    .take(years as usize + 1)
    .collect()
}
