//! Reading and writing match snapshots and delivery events.

use std::fs;
use std::path::Path;

use scorer::domain::{DeliveryEvent, MatchState};
use tracing::info;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Load a snapshot; deserialising is the shape check.
pub fn load(path: &Path) -> CliResult<MatchState> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("cannot read snapshot {}: {e}", path.display()))?;
    let state = serde_json::from_str(&raw)
        .map_err(|e| format!("invalid snapshot {}: {e}", path.display()))?;
    Ok(state)
}

pub fn store(state: &MatchState, path: &Path) -> CliResult<()> {
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json + "\n")
        .map_err(|e| format!("cannot write snapshot {}: {e}", path.display()))?;
    info!(output = %path.display(), deliveries = state.deliveries.len(), "Snapshot written");
    Ok(())
}

pub fn read_delivery(inline: Option<&str>, file: Option<&Path>) -> CliResult<DeliveryEvent> {
    let raw = match (inline, file) {
        (Some(json), _) => json.to_string(),
        (None, Some(path)) => fs::read_to_string(path)
            .map_err(|e| format!("cannot read delivery {}: {e}", path.display()))?,
        (None, None) => return Err("apply needs --delivery or --delivery-file".into()),
    };
    let event = serde_json::from_str(&raw).map_err(|e| format!("invalid delivery: {e}"))?;
    Ok(event)
}
