//! Pre-scoring setup: toss, playing XIs and the opening setup of an innings.
//!
//! Each operation validates everything before touching the state, so a
//! failed call leaves the match exactly as it was.

use std::collections::BTreeSet;

use tracing::info;

use crate::domain::rules::PLAYING_XI_SIZE;
use crate::domain::state::{
    require_innings, require_not_completed, require_playing_xis, require_toss,
    toss_batting_order, Innings, MatchState, MatchStatus, Toss, TossDecision,
};
use crate::errors::domain::{DomainError, ValidationKind};

/// Record the toss and bind the batting order of the two main innings.
///
/// Allowed only before the first ball; the match goes back to UPCOMING.
pub fn record_toss(
    state: &mut MatchState,
    winner: &str,
    decision: TossDecision,
) -> Result<(), DomainError> {
    require_not_completed(state, "record_toss")?;
    if !state.is_team(winner) {
        return Err(DomainError::validation(
            ValidationKind::InvalidSetup,
            format!("toss winner '{winner}' is not playing this match"),
        ));
    }
    if !state.deliveries.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidSetup,
            "toss cannot change after scoring has started",
        ));
    }

    let toss = Toss {
        winner: winner.to_string(),
        decision,
    };
    let (batting, bowling) = toss_batting_order(state, &toss);
    info!(winner, ?decision, batting_first = %batting, "Toss recorded");

    state.innings = vec![
        Innings::new(batting.clone(), bowling.clone()),
        Innings::new(bowling, batting),
    ];
    state.innings_index = 0;
    state.toss = Some(toss);
    state.status = MatchStatus::Upcoming;
    Ok(())
}

/// Record a team's playing XI: exactly eleven distinct, non-empty names.
pub fn set_playing_xi(
    state: &mut MatchState,
    team: &str,
    players: &[&str],
) -> Result<(), DomainError> {
    require_not_completed(state, "set_playing_xi")?;
    if !state.is_team(team) {
        return Err(DomainError::validation(
            ValidationKind::InvalidSetup,
            format!("'{team}' is not playing this match"),
        ));
    }

    let names: Vec<String> = players
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    let distinct: BTreeSet<&str> = names.iter().map(String::as_str).collect();
    if names.len() != PLAYING_XI_SIZE || distinct.len() != PLAYING_XI_SIZE {
        return Err(DomainError::validation(
            ValidationKind::InvalidSetup,
            format!("{team} must name exactly {PLAYING_XI_SIZE} distinct players"),
        ));
    }

    info!(team, "Playing XI recorded");
    state.playing_xi.insert(team.to_string(), names);
    Ok(())
}

/// Save the two openers and the opening bowler for the active innings.
pub fn set_opening(
    state: &mut MatchState,
    striker: &str,
    non_striker: &str,
    bowler: &str,
) -> Result<(), DomainError> {
    require_not_completed(state, "set_opening")?;
    require_toss(state, "set_opening")?;
    require_playing_xis(state, "set_opening")?;
    let innings = require_innings(state, "set_opening")?;

    let (striker, non_striker, bowler) = (striker.trim(), non_striker.trim(), bowler.trim());
    if striker.is_empty() || non_striker.is_empty() || bowler.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::SetupIncomplete,
            "two openers and an opening bowler are required",
        ));
    }
    if striker == non_striker {
        return Err(DomainError::validation(
            ValidationKind::InvalidActors,
            "openers must be two different players",
        ));
    }
    let batting_xi = state.team_xi(&innings.batting);
    if !batting_xi.iter().any(|p| p == striker) || !batting_xi.iter().any(|p| p == non_striker) {
        return Err(DomainError::validation(
            ValidationKind::InvalidActors,
            format!("openers must come from the {} XI", innings.batting),
        ));
    }
    if !state.team_xi(&innings.bowling).iter().any(|p| p == bowler) {
        return Err(DomainError::validation(
            ValidationKind::InvalidActors,
            format!("bowler must come from the {} XI", innings.bowling),
        ));
    }
    if innings.balls_total > 0 {
        return Err(DomainError::validation(
            ValidationKind::InvalidSetup,
            "opening setup is only allowed before the first ball of the innings",
        ));
    }

    let index = state.innings_index;
    let Some(innings) = state.current_innings_mut() else {
        return Err(DomainError::validation_other("innings vanished during set_opening"));
    };
    innings.on_field.striker = Some(striker.to_string());
    innings.on_field.non_striker = Some(non_striker.to_string());
    innings.on_field.bowler = Some(bowler.to_string());
    innings.on_field.need_new_bowler = false;
    innings.on_field.need_next_batter = false;
    innings.on_field.vacant_slot = None;
    innings.opening_done = true;
    info!(innings = index, striker, non_striker, bowler, "Opening setup saved");
    Ok(())
}
