//! # Splitter Node
//!
//! Replays a JSON call script against an in-memory split ledger and prints
//! the resulting state.
//!
//! ```text
//! splitter-node scripts/demo.json --config ledger.json --pretty
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use splitter_node::{load_config, run_script, Script};

#[derive(Parser, Debug)]
#[command(name = "splitter-node")]
#[command(about = "Replay a call script against an in-memory split ledger")]
struct Args {
    /// JSON call script to replay
    script: PathBuf,

    /// JSON ledger configuration (defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Exit with an error if any call was rejected
    #[arg(long)]
    strict: bool,

    /// Pretty-print the JSON summary
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the summary.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let script = Script::load(&args.script)?;
    info!(
        script = %args.script.display(),
        calls = script.calls.len(),
        "Replaying call script"
    );

    let summary = run_script(&script, config).await?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&summary)
    } else {
        serde_json::to_string(&summary)
    }
    .context("Failed to render summary")?;
    println!("{rendered}");

    let failed = summary.failed_calls();
    info!(
        applied = summary.outcomes.len() - failed,
        rejected = failed,
        "Replay finished"
    );
    if args.strict && failed > 0 {
        bail!("{failed} call(s) rejected");
    }
    Ok(())
}
