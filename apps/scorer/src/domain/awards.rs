//! Match awards computed from every innings, Super Overs included.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::rules::BALLS_PER_OVER;
use crate::domain::state::MatchState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManOfMatch {
    pub name: String,
    pub team: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SixerKing {
    pub name: String,
    pub team: String,
    pub sixes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestBowler {
    pub name: String,
    pub team: String,
    pub wickets: u32,
    pub runs: u32,
    /// Runs per six legal balls; `None` when no legal ball was bowled.
    pub economy: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Awards {
    pub man_of_match: Option<ManOfMatch>,
    pub sixer_king: Option<SixerKing>,
    pub best_bowler: Option<BestBowler>,
}

/// Match totals for one player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerAggregate {
    pub team: String,
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub outs: u32,
    pub balls_bowled: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub catches: u32,
    pub run_outs: u32,
    pub stumpings: u32,
}

impl PlayerAggregate {
    pub fn economy(&self) -> Option<f64> {
        (self.balls_bowled > 0).then(|| {
            round2(f64::from(self.runs_conceded) / overs(self.balls_bowled))
        })
    }

    /// Weighted contribution used for Man of the Match.
    pub fn impact_score(&self) -> f64 {
        let batting = f64::from(self.runs + self.fours + self.sixes * 2);
        let mut bowling = f64::from(self.wickets * 25);
        if let Some(economy) = self.economy() {
            bowling += (20.0 - economy * 2.0).max(0.0);
        }
        let fielding = f64::from(self.catches * 10 + self.run_outs * 12 + self.stumpings * 12);
        round2(batting + bowling + fielding)
    }
}

fn overs(balls: u32) -> f64 {
    f64::from(balls) / f64::from(BALLS_PER_OVER)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Per-player totals keyed by name. A player's team is the first one seen.
pub fn aggregate_players(state: &MatchState) -> BTreeMap<String, PlayerAggregate> {
    let mut players: BTreeMap<String, PlayerAggregate> = BTreeMap::new();

    for innings in &state.innings {
        for (name, bat) in &innings.batters {
            let p = upsert(&mut players, name, &innings.batting);
            p.runs += bat.runs;
            p.balls_faced += bat.balls;
            p.fours += bat.fours;
            p.sixes += bat.sixes;
            p.outs += u32::from(bat.out);
        }
        for (name, bowl) in &innings.bowlers {
            let p = upsert(&mut players, name, &innings.bowling);
            p.balls_bowled += bowl.balls;
            p.runs_conceded += bowl.runs;
            p.wickets += bowl.wickets;
        }
        for (name, field) in &innings.fielding {
            let p = upsert(&mut players, name, &innings.bowling);
            p.catches += field.catches;
            p.run_outs += field.run_outs;
            p.stumpings += field.stumpings;
        }
    }
    players
}

fn upsert<'a>(
    players: &'a mut BTreeMap<String, PlayerAggregate>,
    name: &str,
    team: &str,
) -> &'a mut PlayerAggregate {
    let player = players.entry(name.to_string()).or_default();
    if player.team.is_empty() {
        player.team = team.to_string();
    }
    player
}

/// Compute all three awards. Candidates are visited alphabetically and a
/// later one replaces the leader only when strictly better.
pub fn compute_awards(state: &MatchState) -> Awards {
    let players = aggregate_players(state);

    let mut sixer_king: Option<SixerKing> = None;
    let mut best_bowler: Option<BestBowler> = None;
    let mut man_of_match: Option<ManOfMatch> = None;

    for (name, p) in &players {
        if p.sixes > 0 && sixer_king.as_ref().map_or(true, |k| p.sixes > k.sixes) {
            sixer_king = Some(SixerKing {
                name: name.clone(),
                team: p.team.clone(),
                sixes: p.sixes,
            });
        }

        if p.wickets > 0 {
            let candidate = BestBowler {
                name: name.clone(),
                team: p.team.clone(),
                wickets: p.wickets,
                runs: p.runs_conceded,
                economy: p.economy(),
            };
            if best_bowler
                .as_ref()
                .map_or(true, |best| bowls_better(&candidate, best))
            {
                best_bowler = Some(candidate);
            }
        }

        let score = p.impact_score();
        if man_of_match.as_ref().map_or(true, |m| score > m.score) {
            man_of_match = Some(ManOfMatch {
                name: name.clone(),
                team: p.team.clone(),
                score,
            });
        }
    }

    Awards {
        man_of_match,
        sixer_king,
        best_bowler,
    }
}

/// More wickets, then fewer runs, then a lower economy. No economy ranks last.
fn bowls_better(candidate: &BestBowler, best: &BestBowler) -> bool {
    if candidate.wickets != best.wickets {
        return candidate.wickets > best.wickets;
    }
    if candidate.runs != best.runs {
        return candidate.runs < best.runs;
    }
    match (candidate.economy, best.economy) {
        (Some(c), Some(b)) => c < b,
        (Some(_), None) => true,
        _ => false,
    }
}
