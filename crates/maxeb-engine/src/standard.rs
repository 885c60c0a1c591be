//! Standard strategy: fixed 32 ETH validators with weekly reward sweeps.
//!
//! Every active validator earns a weekly reward on a fixed 32 ETH base
//! (rewards are swept out, never compounded on the validator) and pays
//! withdrawal gas for the sweep. Swept rewards pool up; each time the pool
//! covers 32 ETH plus the activation fee a new validator is funded. New
//! validators activate at the end of the week they are funded in, so they
//! first earn in the following week.
//!
//! Every standard validator holds exactly 32 ETH, so the set is tracked as a
//! count.
//!
//! ## Fees
//!
//! ```text
//! fees = initial_validators * 0.002
//!      + minted_validators  * 0.002
//!      + weekly_withdrawals * 0.0001
//! ```

use maxeb_types::{
    Eth, TraceEvent, ACTIVATION_FEE, ACTIVATION_THRESHOLD, GAS_COST_PER_WITHDRAWAL,
    MIN_VALIDATOR_STAKE, WEEKS_PER_YEAR,
};

use crate::growth::{continuous_rate, floored_reward};
use crate::trace::TraceSink;
use crate::validator_set::whole_validators;
use crate::Result;

/// Weeks between checkpoint snapshots inside a year.
const CHECKPOINT_INTERVAL: u32 = 13;

/// Outcome of the standard strategy over the whole horizon.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardRun {
    /// Rewards earned in each year.
    pub yearly_rewards: Vec<Eth>,
    pub total_rewards: Eth,
    pub total_fees: Eth,
    pub initial_validators: u64,
    /// Validators at the end of the horizon, including those funded from rewards.
    pub validators: u64,
    /// Validators funded from swept rewards.
    pub minted: u64,
    /// Per-validator weekly withdrawals paid for.
    pub withdrawals: u64,
    /// Swept rewards not yet spent on a validator.
    pub excess_rewards: Eth,
}

impl StandardRun {
    pub fn final_validators(&self) -> u64 {
        self.validators
    }

    /// Capital base used for the annualized yield: the final validator count
    /// times 32 ETH.
    pub fn capital_base(&self) -> Eth {
        self.final_validators() as f64 * MIN_VALIDATOR_STAKE
    }
}

/// What happened in one week, before the week's new validators activate.
#[derive(Clone, Copy, Debug, PartialEq)]
struct WeekRecord {
    week_rewards: Eth,
    active_validators: u64,
    pending_validators: u64,
}

/// Running state threaded through the weekly fold.
#[derive(Clone, Debug)]
struct Ledger {
    validators: u64,
    excess_rewards: Eth,
    year_rewards: Eth,
    total_rewards: Eth,
    total_fees: Eth,
    yearly_rewards: Vec<Eth>,
    minted: u64,
    withdrawals: u64,
}

impl Ledger {
    fn open(initial_validators: u64) -> Self {
        Self {
            validators: initial_validators,
            excess_rewards: 0.0,
            year_rewards: 0.0,
            total_rewards: 0.0,
            total_fees: initial_validators as f64 * ACTIVATION_FEE,
            yearly_rewards: Vec::new(),
            minted: 0,
            withdrawals: 0,
        }
    }

    /// Credit one week of rewards and gas, then fund and activate new validators.
    fn advance_week(self, weekly_reward: Eth) -> (Self, WeekRecord) {
        let active = self.validators;

        let (week_rewards, year_rewards, mut excess_rewards, mut total_fees) = (0..active).fold(
            (0.0, self.year_rewards, self.excess_rewards, self.total_fees),
            |(week, year, excess, fees), _| {
                (
                    week + weekly_reward,
                    year + weekly_reward,
                    excess + weekly_reward,
                    fees + GAS_COST_PER_WITHDRAWAL,
                )
            },
        );

        let mut pending = 0;
        while excess_rewards >= ACTIVATION_THRESHOLD {
            // At most one week of rewards, so the count is small and exact.
            let funded = (excess_rewards / ACTIVATION_THRESHOLD).floor() as u64;
            if funded == 0 {
                break;
            }
            pending += funded;
            total_fees += funded as f64 * ACTIVATION_FEE;
            excess_rewards -= funded as f64 * ACTIVATION_THRESHOLD;
        }

        let record = WeekRecord {
            week_rewards,
            active_validators: active,
            pending_validators: pending,
        };

        let next = Self {
            validators: active + pending,
            excess_rewards,
            year_rewards,
            total_fees,
            minted: self.minted + pending,
            withdrawals: self.withdrawals + active,
            ..self
        };
        (next, record)
    }

    /// Run the 52 weeks of year `year` (1-based) and close its totals.
    fn run_year<S: TraceSink>(self, year: u32, weekly_reward: Eth, sink: &mut S) -> Self {
        let opened = Self {
            year_rewards: 0.0,
            ..self
        };

        let mut ledger = (0..WEEKS_PER_YEAR).fold(opened, |ledger, week| {
            let (next, record) = ledger.advance_week(weekly_reward);
            if week % CHECKPOINT_INTERVAL == 0 && sink.enabled() {
                sink.record(TraceEvent::StandardWeek {
                    year,
                    week: week + 1,
                    week_rewards: record.week_rewards,
                    excess_rewards: next.excess_rewards,
                    active_validators: record.active_validators,
                    pending_validators: record.pending_validators,
                });
            }
            next
        });

        ledger.yearly_rewards.push(ledger.year_rewards);
        ledger.total_rewards += ledger.year_rewards;

        tracing::trace!(
            year,
            year_rewards = ledger.year_rewards,
            validators = ledger.validators,
            fees = ledger.total_fees,
            "standard: closed year"
        );
        sink.record(TraceEvent::StandardYear {
            year,
            year_rewards: ledger.year_rewards,
            active_validators: ledger.validators,
            fees_so_far: ledger.total_fees,
        });

        ledger
    }

    fn close(self, initial_validators: u64) -> StandardRun {
        StandardRun {
            yearly_rewards: self.yearly_rewards,
            total_rewards: self.total_rewards,
            total_fees: self.total_fees,
            initial_validators,
            validators: self.validators,
            minted: self.minted,
            withdrawals: self.withdrawals,
            excess_rewards: self.excess_rewards,
        }
    }
}

/// Number of 32 ETH validators `total_stake` can fund.
pub fn initial_validator_count(total_stake: Eth) -> Result<u64> {
    whole_validators(total_stake, MIN_VALIDATOR_STAKE)
}

/// Reward one standard validator earns per week at `cl_apr` percent.
pub fn weekly_reward(cl_apr: f64) -> Eth {
    floored_reward(MIN_VALIDATOR_STAKE, continuous_rate(cl_apr, WEEKS_PER_YEAR))
}

/// Simulate the standard strategy week by week over `years` years.
pub fn simulate_standard<S: TraceSink>(
    total_stake: Eth,
    cl_apr: f64,
    years: u32,
    sink: &mut S,
) -> Result<StandardRun> {
    let initial_validators = initial_validator_count(total_stake)?;
    let reward = weekly_reward(cl_apr);
    let ledger = Ledger::open(initial_validators);

    tracing::debug!(
        initial_validators,
        initial_fees = ledger.total_fees,
        weekly_reward = reward,
        "standard: starting simulation"
    );
    sink.record(TraceEvent::StandardStart {
        initial_validators,
        initial_fees: ledger.total_fees,
        weekly_reward_per_validator: reward,
    });

    Ok((1..=years)
        .fold(ledger, |ledger, year| ledger.run_year(year, reward, &mut *sink))
        .close(initial_validators))
}
