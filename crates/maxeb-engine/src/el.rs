//! Execution layer rewards.
//!
//! Priority fees and tips are modelled as simple, non-compounding interest
//! on the initial capital:
//!
//! ```text
//! el_rewards = initial_stake * el_apr / 100 * years
//! ```

use maxeb_types::Eth;

/// EL rewards on `initial_stake` at `el_apr` percent over `years` years.
pub fn el_rewards(initial_stake: Eth, el_apr: f64, years: u32) -> Eth {
    let r = el_apr / 100.0;
    initial_stake * r * f64::from(years)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_interest() {
        let rewards = el_rewards(100_000.0, 0.5915, 3);
        assert!((rewards - 1774.5).abs() < 1e-9);
    }

    #[test]
    fn test_linear_in_years() {
        let one = el_rewards(3200.0, 0.6, 1);
        let five = el_rewards(3200.0, 0.6, 5);
        assert!((five - 5.0 * one).abs() < 1e-9);
    }

    #[test]
    fn test_zero_years_or_stake() {
        assert_eq!(el_rewards(100_000.0, 0.5915, 0), 0.0);
        assert_eq!(el_rewards(0.0, 0.5915, 3), 0.0);
    }
}
