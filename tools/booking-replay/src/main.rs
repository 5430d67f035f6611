use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod replay;
mod scenario;

use replay::Replay;
use scenario::read_scenario;

#[derive(Parser, Debug)]
#[command(
    name = "booking-replay",
    author,
    version,
    about = "Replay a seat booking scenario against an in-memory railway service",
    long_about = "Loads a JSON scenario (fare configuration, passengers, trains and a list of \
                  operations), registers the passengers and trains, then runs every operation \
                  in order.\n\n\
                  Each operation prints one JSON line to stdout with either its result or the \
                  error it ended in. Logs go to stderr."
)]
struct Args {
    /// Scenario JSON file
    #[arg(short, long)]
    scenario: PathBuf,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,

    /// Print every train with its tickets and segment load after the replay
    #[arg(long)]
    dump: bool,

    /// Stop at the first operation that fails
    #[arg(long)]
    fail_fast: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();

    if !args.scenario.exists() {
        bail!("Scenario file does not exist: {}", args.scenario.display());
    }

    let scenario = read_scenario(&args.scenario)?;
    let replay = Replay::new(&scenario).context("Failed to set up scenario")?;

    let mut failures = 0usize;
    for (step, operation) in scenario.operations.iter().enumerate() {
        let line = match replay.run(operation) {
            Ok(result) => json!({ "step": step + 1, "op": operation.name(), "ok": true, "result": result }),
            Err(e) => {
                failures += 1;
                warn!(step = step + 1, op = operation.name(), error = %e, "operation failed");
                if args.fail_fast {
                    return Err(e).with_context(|| format!("Operation #{} ({}) failed", step + 1, operation.name()));
                }
                json!({ "step": step + 1, "op": operation.name(), "ok": false, "error": e.to_string() })
            }
        };
        println!("{line}");
    }

    info!(
        operations = scenario.operations.len(),
        failures,
        "replay finished"
    );

    if args.dump {
        let dump = replay.dump().context("Failed to dump service state")?;
        println!("{}", serde_json::to_string_pretty(&dump)?);
    }

    Ok(())
}
