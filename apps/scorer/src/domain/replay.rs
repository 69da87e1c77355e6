//! Rebuilding a match from its delivery log.

use tracing::{debug, info};

use crate::domain::scoring::apply_delivery;
use crate::domain::state::MatchState;
use crate::errors::domain::DomainError;

/// A logged delivery the engine refused while replaying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayRejection {
    /// 1-based position of the delivery in the match log.
    pub seq: usize,
    pub error: DomainError,
}

/// Like [`replay`], but says which logged delivery was refused.
pub fn replay_detailed(state: &MatchState, count: usize) -> Result<MatchState, ReplayRejection> {
    let count = count.min(state.deliveries.len());
    let mut rebuilt = state.setup_only();
    for (i, event) in state.deliveries.iter().take(count).enumerate() {
        rebuilt = apply_delivery(&rebuilt, event).map_err(|error| {
            debug!(seq = i + 1, %error, "Replay rejected a logged delivery");
            ReplayRejection { seq: i + 1, error }
        })?;
    }
    Ok(rebuilt)
}

/// Rebuild `state` from its setup by applying the first `count` logged
/// deliveries. `count` past the end of the log replays all of it.
pub fn replay(state: &MatchState, count: usize) -> Result<MatchState, DomainError> {
    replay_detailed(state, count).map_err(|rejection| rejection.error)
}

/// Remove the last delivery by replaying everything before it.
///
/// An empty log returns the state unchanged. A completed match goes back
/// to LIVE with its result cleared, since the replay stops short of the
/// deciding ball.
pub fn undo_last(state: &MatchState) -> Result<MatchState, DomainError> {
    let Some(keep) = state.deliveries.len().checked_sub(1) else {
        return Ok(state.clone());
    };
    let rebuilt = replay(state, keep)?;
    info!(
        removed_seq = keep + 1,
        innings = rebuilt.innings_index,
        "Last delivery undone"
    );
    Ok(rebuilt)
}
