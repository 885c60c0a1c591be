//! Command-line flags.
//!
//! Usage:
//!   maxeb [--config <path>] [--stake <eth>] [--apr <percent>] [--years <n>] [--json] [--trace]

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};

use crate::config::CliConfig;

pub const USAGE: &str = "usage: maxeb [--config <path>] [--stake <eth>] [--apr <percent>] \
                         [--years <n>] [--json] [--trace]";

/// Flags given on the command line. Unset values fall back to the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub stake: Option<f64>,
    pub apr: Option<f64>,
    pub years: Option<u32>,
    pub json: bool,
    pub trace: bool,
    pub help: bool,
}

fn parse_value<T>(flag: &str, raw: String) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse()
        .with_context(|| format!("invalid value for {flag}: `{raw}`"))
}

impl Args {
    /// Parse flags, excluding the program name.
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();
        let mut iter = args.into_iter();
        while let Some(flag) = iter.next() {
            let mut value = |name: &str| {
                iter.next()
                    .ok_or_else(|| anyhow!("{name} requires a value"))
            };
            match flag.as_str() {
                "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
                "--stake" => parsed.stake = Some(parse_value("--stake", value("--stake")?)?),
                "--apr" => parsed.apr = Some(parse_value("--apr", value("--apr")?)?),
                "--years" => parsed.years = Some(parse_value("--years", value("--years")?)?),
                "--json" => parsed.json = true,
                "--trace" => parsed.trace = true,
                "-h" | "--help" => parsed.help = true,
                other => bail!("unknown argument `{other}`\n{USAGE}"),
            }
        }
        Ok(parsed)
    }

    /// Apply the flags on top of a loaded configuration.
    pub fn apply(&self, config: &mut CliConfig) {
        if let Some(stake) = self.stake {
            config.calculation.total_stake = stake;
        }
        if let Some(apr) = self.apr {
            config.calculation.network_apr = apr;
        }
        if let Some(years) = self.years {
            config.calculation.years = years;
        }
        if self.json {
            config.output.format = "json".to_string();
        }
        if self.trace {
            config.output.trace = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Args> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_all_flags() {
        let args = parse(&[
            "--stake", "5000", "--apr", "4.2", "--years", "5", "--json", "--trace",
        ])
        .expect("parse");
        assert_eq!(args.stake, Some(5000.0));
        assert_eq!(args.apr, Some(4.2));
        assert_eq!(args.years, Some(5));
        assert!(args.json && args.trace && !args.help);
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(parse(&["--years", "-1"]).is_err());
        assert!(parse(&["--stake"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
    }

    #[test]
    fn test_apply_overrides_config() {
        let mut config = CliConfig::default();
        parse(&["--years", "1", "--json"])
            .expect("parse")
            .apply(&mut config);
        assert_eq!(config.calculation.years, 1);
        assert_eq!(config.calculation.total_stake, 100_000.0);
        assert!(config.json_output());
    }
}
