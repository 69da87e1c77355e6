//! Subcommand bodies. Each writes JSON to the given sink.

use std::io::Write;
use std::path::Path;

use scorer::domain::{
    apply_delivery, compute_awards, derive_match_transitions, replay_detailed, summarize, undo_last,
    DeliveryEvent, MatchState, MatchTransition, ReplayRejection,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::snapshot::{self, CliResult};

#[derive(Debug, Serialize)]
pub struct VerifyReport {
    pub deliveries: usize,
    pub equivalent: bool,
    /// 1-based sequence of the first delivery the engine refused, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn emit(mut out: impl Write, value: &impl Serialize) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn summary(state: &MatchState, out: impl Write) -> CliResult<()> {
    emit(out, &summarize(state))
}

pub fn awards(state: &MatchState, out: impl Write) -> CliResult<()> {
    emit(out, &compute_awards(state))
}

/// Replay the whole log from setup and compare with the stored state.
pub fn verify(state: &MatchState, out: impl Write) -> CliResult<()> {
    let report = verify_report(state);
    emit(out, &report)?;
    if !report.equivalent {
        return Err("replay does not reproduce the snapshot".into());
    }
    Ok(())
}

pub fn verify_report(state: &MatchState) -> VerifyReport {
    let deliveries = state.deliveries.len();
    match replay_detailed(state, deliveries) {
        Ok(rebuilt) => {
            let equivalent = rebuilt == *state;
            if !equivalent {
                warn!(deliveries, "Replayed state differs from snapshot");
            }
            VerifyReport {
                deliveries,
                equivalent,
                rejected_at: None,
                error: None,
            }
        }
        Err(ReplayRejection { seq, error }) => {
            warn!(seq, code = %error.code(), "Logged delivery rejected on replay");
            VerifyReport {
                deliveries,
                equivalent: false,
                rejected_at: Some(seq),
                error: Some(error.to_string()),
            }
        }
    }
}

/// Result of `apply` when no output file is given.
#[derive(Debug, Serialize)]
pub struct ApplyOutcome<'a> {
    pub transitions: &'a [MatchTransition],
    pub state: &'a MatchState,
}

/// Apply a delivery. With an output file the new snapshot goes there and
/// only the transitions are printed; otherwise both are printed together.
pub fn apply(
    state: &MatchState,
    event: &DeliveryEvent,
    output: Option<&Path>,
    out: impl Write,
) -> CliResult<()> {
    let next = apply_delivery(state, event).map_err(|e| format!("{}: {e}", e.code()))?;
    let transitions = derive_match_transitions(state, &next);
    info!(transitions = transitions.len(), "Delivery applied");
    match output {
        Some(path) => {
            snapshot::store(&next, path)?;
            emit(out, &transitions)
        }
        None => emit(
            out,
            &ApplyOutcome {
                transitions: &transitions,
                state: &next,
            },
        ),
    }
}

/// Drop the last delivery; the snapshot goes to `output` or is printed.
pub fn undo(state: &MatchState, output: Option<&Path>, out: impl Write) -> CliResult<()> {
    if state.deliveries.is_empty() {
        warn!("Nothing to undo");
    }
    let previous = undo_last(state).map_err(|e| format!("{}: {e}", e.code()))?;
    match output {
        Some(path) => snapshot::store(&previous, path),
        None => emit(out, &previous),
    }
}
