//! maxeb: compare standard and MaxEB-optimized validator staking from the terminal.
//!
//! Inputs come from the config file (`$MAXEB_CONFIG` or
//! `~/.maxeb/config.toml`) overridden by flags. The result is printed to
//! stdout as text or JSON; logs go to stderr.

mod args;
mod config;
mod report;

use tracing::{debug, error};

use maxeb_engine::{calculate_traced, NoTrace, Trace};

use crate::args::{Args, USAGE};
use crate::config::CliConfig;

fn main() -> anyhow::Result<()> {
    let args = Args::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    // 1. Load config
    let mut config = match &args.config {
        Some(path) => CliConfig::load_from(path)?,
        None => CliConfig::load()?,
    };
    args.apply(&mut config);

    // 2. Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("maxeb={}", config.output.log_level).parse()?),
        )
        .init();

    let input = config.calculation.to_input();
    debug!(?input, "running calculation");

    // 3. Calculate
    let mut trace = Trace::new();
    let outcome = if config.output.trace {
        calculate_traced(&input, &mut trace)
    } else {
        calculate_traced(&input, &mut NoTrace)
    };
    let result = outcome.inspect_err(|e| error!("calculation failed: {}", e))?;

    // 4. Render
    let events = config.output.trace.then(|| trace.into_events());
    if config.json_output() {
        println!("{}", report::render_json(&result, events.as_deref())?);
    } else {
        print!("{}", report::TextReport(&result));
        if let Some(events) = &events {
            println!();
            for event in events {
                println!("{}", serde_json::to_string(event)?);
            }
        }
    }

    Ok(())
}
