use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::config::MatchConfig;
use crate::domain::delivery::{DeliveryEvent, DeliveryType, DismissalKind};
use crate::domain::rules::{self, FIRST_SUPER_OVER_INDEX};
use crate::errors::domain::{DomainError, ValidationKind};

/// Overall match status as exchanged with persistence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Completed,
}

/// Lifecycle position derived from `status` and `innings_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Innings1,
    Innings2,
    /// `round` is 1-based; `chasing` is the second innings of the pair.
    SuperOver { round: u32, chasing: bool },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TossDecision {
    Bat,
    Bowl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toss {
    pub winner: String,
    pub decision: TossDecision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattingSlot {
    Striker,
    NonStriker,
}

/// Who is out there right now, plus flags that ask the scorer for input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnField {
    pub striker: Option<String>,
    pub non_striker: Option<String>,
    pub bowler: Option<String>,
    pub free_hit: bool,
    pub balls_this_over: u32,
    pub need_new_bowler: bool,
    /// Bowler of the over just completed; barred from the next over.
    pub last_bowler: Option<String>,
    pub need_next_batter: bool,
    pub vacant_slot: Option<BattingSlot>,
}

impl OnField {
    pub fn swap_strike(&mut self) {
        std::mem::swap(&mut self.striker, &mut self.non_striker);
    }

    pub fn is_opening_ready(&self) -> bool {
        self.striker.is_some() && self.non_striker.is_some() && self.bowler.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extras {
    pub wide: u32,
    pub no_ball: u32,
    pub bye: u32,
    pub leg_bye: u32,
}

impl Extras {
    pub fn total(&self) -> u32 {
        self.wide + self.no_ball + self.bye + self.leg_bye
    }
}

/// How a batter got out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dismissal {
    pub kind: DismissalKind,
    pub bowler: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fielder: Option<String>,
    pub delivery: DeliveryType,
    pub crossed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattingFigures {
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissal: Option<Dismissal>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BowlingFigures {
    /// Legal balls bowled.
    pub balls: u32,
    /// Runs conceded, including wides, no-balls and byes.
    pub runs: u32,
    pub wickets: u32,
    pub wides: u32,
    pub no_balls: u32,
    pub maidens: u32,
    /// Runs conceded in the over in progress.
    pub over_runs: u32,
    /// Legal balls in the over in progress.
    pub over_legal: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldingFigures {
    pub catches: u32,
    pub run_outs: u32,
    pub stumpings: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallOfWicket {
    pub wicket: u8,
    pub runs: u32,
    pub overs: String,
    pub batter: String,
    pub kind: DismissalKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Partnership {
    pub batter1: Option<String>,
    pub batter2: Option<String>,
    pub runs: u32,
    pub balls: u32,
}

/// Why a dismissal was not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WicketRejection {
    FreeHit,
    NoBall,
    Wide,
}

/// Resolved wicket detail in the ball log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WicketRecord {
    pub kind: DismissalKind,
    pub dismissed: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fielder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    pub crossed: bool,
    pub delivery: DeliveryType,
}

/// Full resolved outcome of one ball, in the order it was bowled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallRecord {
    /// Match-wide sequence number, strictly increasing from 1.
    pub seq: u32,
    /// Position within this innings, from 1.
    pub innings_seq: u32,
    pub innings_index: usize,
    pub overs: String,
    pub balls_legal: u32,
    pub balls_total: u32,
    /// `RUN`, `WIDE`, `NO_BALL`, `BYE`, `LEG_BYE` or `WICKET`.
    pub kind: String,
    pub legal: bool,
    pub runs_total: u32,
    pub runs_input: u32,
    /// Runs credited to the striker's own score on this ball.
    pub bat_runs: u32,
    /// Cumulative innings extras after this ball.
    pub extras: Extras,
    pub striker: Option<String>,
    pub non_striker: Option<String>,
    pub bowler: String,
    /// Free hit was armed when this ball started.
    pub free_hit: bool,
    /// `Some` only for wicket deliveries.
    pub wicket_applied: Option<bool>,
    pub wicket_rejection: Option<WicketRejection>,
    pub wicket: Option<WicketRecord>,
    pub over_completed: bool,
    pub maiden: bool,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub at: Option<OffsetDateTime>,
}

/// One batting turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Innings {
    pub batting: String,
    pub bowling: String,
    pub runs: u32,
    pub wkts: u8,
    /// Legal deliveries.
    pub balls: u32,
    /// All deliveries, legal or not.
    pub balls_total: u32,
    pub extras: Extras,
    pub batters: BTreeMap<String, BattingFigures>,
    pub bowlers: BTreeMap<String, BowlingFigures>,
    pub fielding: BTreeMap<String, FieldingFigures>,
    pub fall_of_wickets: Vec<FallOfWicket>,
    pub partnership: Partnership,
    pub partnerships: Vec<Partnership>,
    pub log: Vec<BallRecord>,
    pub on_field: OnField,
    /// Set once the openers and bowler are known for this innings.
    pub opening_done: bool,
}

impl Innings {
    pub fn new(batting: impl Into<String>, bowling: impl Into<String>) -> Self {
        Self {
            batting: batting.into(),
            bowling: bowling.into(),
            ..Self::default()
        }
    }

    pub fn overs(&self) -> String {
        rules::overs_text(self.balls)
    }

    /// A ball has been bowled or the opening setup was saved.
    pub fn started(&self) -> bool {
        self.opening_done || self.balls_total > 0
    }

    pub fn is_out(&self, batter: &str) -> bool {
        self.batters.get(batter).is_some_and(|b| b.out)
    }

    pub fn batter_runs_total(&self) -> u32 {
        self.batters.values().map(|b| b.runs).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum Margin {
    Runs(u32),
    Wickets(u8),
}

/// Outcome of the match, or the pending Super Over marker while tied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    pub tie: bool,
    /// Decided by (or waiting on) a Super Over.
    pub super_over: bool,
    pub target: u32,
    pub text: String,
}

impl MatchResult {
    /// Tie marker while a Super Over is in progress; `winner` is None.
    pub fn is_pending(&self) -> bool {
        self.tie && self.super_over && self.winner.is_none()
    }
}

/// Entire match container, sufficient for pure domain operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub team_a: String,
    pub team_b: String,
    #[serde(default)]
    pub config: MatchConfig,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub innings_index: usize,
    #[serde(default)]
    pub innings: Vec<Innings>,
    #[serde(default)]
    pub toss: Option<Toss>,
    #[serde(default)]
    pub playing_xi: BTreeMap<String, Vec<String>>,
    /// 0 until a Super Over is triggered.
    #[serde(default)]
    pub super_over_round: u32,
    #[serde(default)]
    pub result: Option<MatchResult>,
    /// Flat, resolved delivery log across the whole match.
    #[serde(default)]
    pub deliveries: Vec<DeliveryEvent>,
}

impl MatchState {
    pub fn new(team_a: impl Into<String>, team_b: impl Into<String>, config: MatchConfig) -> Self {
        Self {
            team_a: team_a.into(),
            team_b: team_b.into(),
            config,
            status: MatchStatus::Upcoming,
            innings_index: 0,
            innings: Vec::new(),
            toss: None,
            playing_xi: BTreeMap::new(),
            super_over_round: 0,
            result: None,
            deliveries: Vec::new(),
        }
    }

    pub fn phase(&self) -> MatchPhase {
        if self.status == MatchStatus::Completed {
            return MatchPhase::Completed;
        }
        match self.innings_index {
            0 => MatchPhase::Innings1,
            1 => MatchPhase::Innings2,
            idx => MatchPhase::SuperOver {
                round: ((idx - FIRST_SUPER_OVER_INDEX) / 2) as u32 + 1,
                chasing: rules::is_chase(idx),
            },
        }
    }

    pub fn is_super_over(&self) -> bool {
        rules::is_super_over(self.innings_index)
    }

    pub fn current_innings(&self) -> Option<&Innings> {
        self.innings.get(self.innings_index)
    }

    pub fn current_innings_mut(&mut self) -> Option<&mut Innings> {
        self.innings.get_mut(self.innings_index)
    }

    /// Runs needed to win while a chase is in progress.
    pub fn target(&self) -> Option<u32> {
        if !rules::is_chase(self.innings_index) {
            return None;
        }
        self.innings
            .get(self.innings_index - 1)
            .map(|first| first.runs + 1)
    }

    pub fn last_ball(&self) -> Option<&BallRecord> {
        self.innings.iter().rev().find_map(|inn| inn.log.last())
    }

    pub fn team_xi(&self, team: &str) -> &[String] {
        self.playing_xi.get(team).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_team(&self, team: &str) -> bool {
        team == self.team_a || team == self.team_b
    }

    pub fn other_team(&self, team: &str) -> &str {
        if team == self.team_a {
            &self.team_b
        } else {
            &self.team_a
        }
    }

    /// Teams, config, toss and playing XIs with everything scored removed.
    pub fn setup_only(&self) -> Self {
        let mut fresh = Self::new(self.team_a.clone(), self.team_b.clone(), self.config);
        fresh.playing_xi = self.playing_xi.clone();
        if let Some(toss) = &self.toss {
            let (batting, bowling) = toss_batting_order(self, toss);
            fresh.innings = vec![
                Innings::new(batting.clone(), bowling.clone()),
                Innings::new(bowling, batting),
            ];
            fresh.toss = Some(toss.clone());
        }
        fresh
    }
}

/// (batting first, bowling first) for a recorded toss.
pub fn toss_batting_order(state: &MatchState, toss: &Toss) -> (String, String) {
    let other = state.other_team(&toss.winner).to_string();
    match toss.decision {
        TossDecision::Bat => (toss.winner.clone(), other),
        TossDecision::Bowl => (other, toss.winner.clone()),
    }
}

pub fn require_innings<'a>(
    state: &'a MatchState,
    ctx: &'static str,
) -> Result<&'a Innings, DomainError> {
    state.current_innings().ok_or_else(|| {
        DomainError::validation(
            ValidationKind::SetupIncomplete,
            format!("no innings at index {} ({ctx})", state.innings_index),
        )
    })
}

pub fn require_toss<'a>(state: &'a MatchState, ctx: &'static str) -> Result<&'a Toss, DomainError> {
    state.toss.as_ref().ok_or_else(|| {
        DomainError::validation(
            ValidationKind::SetupIncomplete,
            format!("toss has not been recorded ({ctx})"),
        )
    })
}

pub fn require_playing_xis(state: &MatchState, ctx: &'static str) -> Result<(), DomainError> {
    for team in [&state.team_a, &state.team_b] {
        if state.team_xi(team).len() != rules::PLAYING_XI_SIZE {
            return Err(DomainError::validation(
                ValidationKind::SetupIncomplete,
                format!("playing XI for {team} is not complete ({ctx})"),
            ));
        }
    }
    Ok(())
}

pub fn require_not_completed(state: &MatchState, ctx: &'static str) -> Result<(), DomainError> {
    if state.status == MatchStatus::Completed {
        return Err(DomainError::validation(
            ValidationKind::MatchAlreadyCompleted,
            format!("match is completed ({ctx})"),
        ));
    }
    Ok(())
}
