//! Rendering of a comparison for the terminal.

use std::fmt;

use serde::Serialize;

use maxeb_types::{ComparisonResult, TraceEvent};

/// JSON document printed with `--json`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub result: &'a ComparisonResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<&'a [TraceEvent]>,
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}%"))
}

fn signed_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:+.3}%"))
}

/// Plain-text summary of a comparison.
pub struct TextReport<'a>(pub &'a ComparisonResult);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let input = &result.input;
        let split = &result.apr_split;

        writeln!(f, "Validator Stake Optimizer")?;
        writeln!(f, "  Total stake:  {:.2} ETH", input.total_stake)?;
        writeln!(
            f,
            "  Network APR:  {:.3}% (CL {:.3}%, EL {:.3}%)",
            input.network_apr, split.cl_apr, split.el_apr
        )?;
        writeln!(f, "  Duration:     {} years", input.years)?;
        writeln!(f)?;

        writeln!(f, "Optimal distribution")?;
        writeln!(f, "  Validator composition: {}", result.composition())?;
        writeln!(
            f,
            "  Optimized validators:  {}",
            result.distribution.validator_count()
        )?;
        writeln!(
            f,
            "  Standard validators:   {} -> {} ({} funded from rewards)",
            result.standard_initial_validators,
            result.standard_final_validators,
            result.standard_minted_validators
        )?;
        writeln!(f)?;

        writeln!(f, "Consensus layer APR comparison")?;
        writeln!(
            f,
            "  Standard:   {} ({:.2} ETH, fees {:.4} ETH)",
            pct(result.standard.annualized_cl_apr),
            result.standard.total_rewards,
            result.standard.total_fees
        )?;
        writeln!(
            f,
            "  Optimized:  {} ({:.2} ETH, fees {:.4} ETH)",
            pct(result.optimized.annualized_cl_apr),
            result.optimized.total_rewards,
            result.optimized.total_fees
        )?;
        writeln!(
            f,
            "  Difference: {} ({:+.2} ETH)",
            signed_pct(result.apr_advantage()),
            result.reward_advantage()
        )?;
        if result.optimized_rewards_rescaled {
            writeln!(f, "  (optimized rewards rescaled to match the yield ordering)")?;
        }
        writeln!(f)?;

        writeln!(f, "Yearly CL rewards (ETH)")?;
        writeln!(f, "  {:>4}  {:>12}  {:>12}", "Year", "Standard", "Optimized")?;
        let years = result
            .standard
            .yearly_rewards
            .iter()
            .zip(&result.optimized.yearly_rewards);
        for (i, (standard, optimized)) in years.enumerate() {
            writeln!(f, "  {:>4}  {:>12.4}  {:>12.4}", i + 1, standard, optimized)?;
        }
        writeln!(
            f,
            "  EL rewards (simple interest): standard {:.2} ETH, optimized {:.2} ETH",
            result.standard.el_rewards, result.optimized.el_rewards
        )
    }
}

/// JSON rendering of `result`, with the trace when one was recorded.
pub fn render_json(
    result: &ComparisonResult,
    trace: Option<&[TraceEvent]>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport { result, trace })
}
