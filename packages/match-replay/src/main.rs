//! Match replay CLI - inspect and edit match snapshots offline.
//!
//! Reads a JSON match snapshot, runs it through the scoring engine and
//! prints derived views, or writes a new snapshot after applying or
//! undoing a delivery.

mod commands;
mod snapshot;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser)]
#[command(name = "match-replay")]
#[command(about = "Replay, inspect and edit cricket match snapshots")]
struct Args {
    /// Match snapshot to read (JSON)
    #[arg(short, long, global = true, default_value = "match.json")]
    input: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the live match header
    Summary,
    /// Print Man of the Match, Sixer King and Best Bowler
    Awards,
    /// Rebuild the match from its delivery log and compare with the snapshot
    Verify,
    /// Apply one delivery and write the new snapshot
    Apply {
        /// Delivery event as JSON, e.g. '{"kind":{"type":"RUN"},"runs":4}'
        #[arg(long, conflicts_with = "delivery_file")]
        delivery: Option<String>,

        /// File holding the delivery event JSON
        #[arg(long)]
        delivery_file: Option<PathBuf>,

        /// Where to write the new snapshot (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove the last delivery and write the new snapshot
    Undo {
        /// Where to write the new snapshot (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    scorer::telemetry::init_tracing(if args.verbose { "debug" } else { "warn" });

    let state = snapshot::load(&args.input)?;
    debug!(input = %args.input.display(), deliveries = state.deliveries.len(), "Snapshot loaded");

    let out = std::io::stdout();
    match args.command {
        Command::Summary => commands::summary(&state, out.lock())?,
        Command::Awards => commands::awards(&state, out.lock())?,
        Command::Verify => commands::verify(&state, out.lock())?,
        Command::Apply {
            delivery,
            delivery_file,
            output,
        } => {
            let event = snapshot::read_delivery(delivery.as_deref(), delivery_file.as_deref())?;
            commands::apply(&state, &event, output.as_deref(), out.lock())?;
        }
        Command::Undo { output } => commands::undo(&state, output.as_deref(), out.lock())?,
    }
    Ok(())
}
