//! Innings transitions, results and the Super Over cascade.

use tracing::info;

use crate::config::MatchConfig;
use crate::domain::rules::{self, FIRST_SUPER_OVER_INDEX};
use crate::domain::state::{Innings, Margin, MatchResult, MatchState, MatchStatus};

/// All out, or every legal ball of the innings bowled.
pub fn innings_complete(config: &MatchConfig, innings_index: usize, innings: &Innings) -> bool {
    innings.wkts >= rules::wicket_cap(innings_index)
        || innings.balls >= rules::innings_ball_limit(config, innings_index)
}

/// Advance the match after a delivery has been scored.
pub fn evaluate(state: &mut MatchState) {
    let idx = state.innings_index;
    let Some(current) = state.innings.get(idx) else {
        return;
    };
    let done = innings_complete(&state.config, idx, current);

    if !rules::is_chase(idx) {
        if done {
            start_next_innings(state);
        }
        return;
    }

    let Some(first) = state.innings.get(idx - 1) else {
        return;
    };
    let target = first.runs + 1;
    if current.runs < target && !done {
        return;
    }

    match decide(first, current, idx, target) {
        Some(result) => complete(state, result),
        None if rules::is_super_over(idx) => start_super_over(state, state.super_over_round + 1),
        None if state.config.rules.super_over_on_tie => start_super_over(state, 1),
        None => complete(
            state,
            MatchResult {
                winner: None,
                margin: None,
                tie: true,
                super_over: false,
                target,
                text: "Match tied".to_string(),
            },
        ),
    }
}

/// Winner of a finished pair of innings; `None` on level scores.
fn decide(first: &Innings, chase: &Innings, idx: usize, target: u32) -> Option<MatchResult> {
    let super_over = rules::is_super_over(idx);
    let prefix = if super_over { "Super Over: " } else { "" };

    let (winner, margin) = if chase.runs >= target {
        let left = rules::wicket_cap(idx).saturating_sub(chase.wkts);
        (chase.batting.clone(), Margin::Wickets(left))
    } else if chase.runs < first.runs {
        (first.batting.clone(), Margin::Runs(first.runs - chase.runs))
    } else {
        return None;
    };

    let text = match margin {
        Margin::Wickets(n) => format!("{prefix}{winner} won by {n} {}", plural(n.into(), "wicket")),
        Margin::Runs(n) => format!("{prefix}{winner} won by {n} {}", plural(n, "run")),
    };
    Some(MatchResult {
        winner: Some(winner),
        margin: Some(margin),
        tie: false,
        super_over,
        target,
        text,
    })
}

fn plural(n: u32, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

fn start_next_innings(state: &mut MatchState) {
    let next = state.innings_index + 1;
    if state.innings.get(next).is_none() {
        let Some(prev) = state.innings.get(state.innings_index) else {
            return;
        };
        let swapped = Innings::new(prev.bowling.clone(), prev.batting.clone());
        state.innings.push(swapped);
    }
    state.innings_index = next;
    if let Some(innings) = state.innings.get_mut(next) {
        innings.on_field = Default::default();
    }
    info!(innings = next, "Innings started");
}

/// Allocate the innings pair for `round` and mark the match as tied pending it.
///
/// The side that batted second in the main match bats first in every round.
fn start_super_over(state: &mut MatchState, round: u32) {
    let (Some(batting_second), Some(batting_first)) = (
        state.innings.get(1).map(|i| i.batting.clone()),
        state.innings.first().map(|i| i.batting.clone()),
    ) else {
        return;
    };
    let target = state.target().unwrap_or_default();
    let base = rules::super_over_base_index(round);
    state.innings.truncate(base);
    state.innings.push(Innings::new(batting_second.clone(), batting_first.clone()));
    state.innings.push(Innings::new(batting_first, batting_second));
    state.innings_index = base;
    state.super_over_round = round;
    state.status = MatchStatus::Live;

    let text = if base == FIRST_SUPER_OVER_INDEX {
        "Match tied. Super Over.".to_string()
    } else {
        format!("Super Over tied. Super Over {round} pending.")
    };
    info!(round, innings = base, "Super Over started");
    state.result = Some(MatchResult {
        winner: None,
        margin: None,
        tie: true,
        super_over: true,
        target,
        text,
    });
}

fn complete(state: &mut MatchState, result: MatchResult) {
    info!(result = %result.text, "Match completed");
    state.status = MatchStatus::Completed;
    state.result = Some(result);
}
