//! Read-only match header for live viewers.

use serde::{Deserialize, Serialize};

use crate::domain::rules::{self, BALLS_PER_OVER};
use crate::domain::state::{MatchState, MatchStatus};

/// Chase figures, present only while the second innings of a pair is live.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChaseSummary {
    pub target: u32,
    pub runs_needed: u32,
    pub balls_left: u32,
    /// `None` once no legal balls remain.
    pub required_run_rate: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub status: MatchStatus,
    pub innings_index: usize,
    pub super_over: bool,
    pub batting: String,
    pub bowling: String,
    /// `"runs/wkts"`
    pub score_text: String,
    /// `"o.b/limit"`
    pub overs_text: String,
    pub run_rate: f64,
    pub powerplay_overs: u8,
    pub in_powerplay: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chase: Option<ChaseSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_text: Option<String>,
}

pub fn summarize(state: &MatchState) -> MatchSummary {
    let idx = state.innings_index;
    let innings = state.current_innings().cloned().unwrap_or_default();
    let limit = rules::overs_limit(&state.config, idx);

    let run_rate = if innings.balls > 0 {
        round2(f64::from(innings.runs * BALLS_PER_OVER) / f64::from(innings.balls))
    } else {
        0.0
    };
    let powerplay_overs = state.config.powerplay_overs;
    let over_no = rules::current_over_no(innings.balls);
    let in_powerplay = !rules::is_super_over(idx)
        && powerplay_overs > 0
        && over_no > 0
        && over_no <= u32::from(powerplay_overs);

    let chase = match (state.status, state.target()) {
        (MatchStatus::Completed, _) | (_, None) => None,
        (_, Some(target)) => {
            let runs_needed = target.saturating_sub(innings.runs);
            let balls_left = rules::innings_ball_limit(&state.config, idx).saturating_sub(innings.balls);
            let required_run_rate = (balls_left > 0).then(|| {
                round2(f64::from(runs_needed * BALLS_PER_OVER) / f64::from(balls_left))
            });
            Some(ChaseSummary {
                target,
                runs_needed,
                balls_left,
                required_run_rate,
            })
        }
    };

    MatchSummary {
        status: state.status,
        innings_index: idx,
        super_over: rules::is_super_over(idx),
        score_text: format!("{}/{}", innings.runs, innings.wkts),
        overs_text: format!("{}/{limit}", innings.overs()),
        batting: innings.batting,
        bowling: innings.bowling,
        run_rate,
        powerplay_overs,
        in_powerplay,
        chase,
        result_text: state.result.as_ref().map(|r| r.text.clone()),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
