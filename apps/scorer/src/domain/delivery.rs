//! Delivery events: the scorer's description of one ball.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// What kind of delivery was bowled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryKind {
    /// Legal ball; `runs` are batted runs.
    Run,
    /// `runs` is the total for the ball, minimum 1.
    Wide,
    /// `runs` is the total for the ball, minimum 1. `bat_runs` of the
    /// running runs are credited to the striker; the rest become byes.
    NoBall {
        #[serde(default)]
        bat_runs: u32,
    },
    Bye,
    LegBye,
    /// A dismissal attempt. `runs` are runs completed on the ball, in
    /// addition to any wide/no-ball penalty.
    Wicket(WicketEvent),
}

impl DeliveryKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Run => "RUN",
            Self::Wide => "WIDE",
            Self::NoBall { .. } => "NO_BALL",
            Self::Bye => "BYE",
            Self::LegBye => "LEG_BYE",
            Self::Wicket(_) => "WICKET",
        }
    }
}

/// How the batter was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DismissalKind {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
    Other,
}

impl DismissalKind {
    /// Every dismissal except a run-out counts for the bowler.
    pub fn credited_to_bowler(self) -> bool {
        self != Self::RunOut
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bowled => "bowled",
            Self::Caught => "caught",
            Self::Lbw => "lbw",
            Self::RunOut => "run out",
            Self::Stumped => "stumped",
            Self::HitWicket => "hit wicket",
            Self::Other => "out",
        }
    }
}

/// Legality of the ball a wicket fell on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    #[default]
    Legal,
    Wide,
    NoBall,
}

/// Wicket details carried by [`DeliveryKind::Wicket`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WicketEvent {
    pub kind: DismissalKind,
    #[serde(default)]
    pub delivery: DeliveryType,
    /// Defaults to the striker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissed: Option<String>,
    /// Incoming batter for the vacated slot, if already known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fielder: Option<String>,
    /// Batters crossed before a run-out.
    #[serde(default)]
    pub crossed: bool,
}

impl WicketEvent {
    pub fn new(kind: DismissalKind) -> Self {
        Self {
            kind,
            delivery: DeliveryType::Legal,
            dismissed: None,
            replacement: None,
            fielder: None,
            crossed: false,
        }
    }

    pub fn on(mut self, delivery: DeliveryType) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn dismissed(mut self, name: impl Into<String>) -> Self {
        self.dismissed = Some(name.into());
        self
    }

    pub fn replacement(mut self, name: impl Into<String>) -> Self {
        self.replacement = Some(name.into());
        self
    }

    pub fn fielder(mut self, name: impl Into<String>) -> Self {
        self.fielder = Some(name.into());
        self
    }

    pub fn crossed(mut self, crossed: bool) -> Self {
        self.crossed = crossed;
        self
    }
}

/// One delivery as submitted by the scorer.
///
/// Actors left as `None` default to the current on-field values. The match
/// log stores events with every actor resolved so a replay never depends on
/// on-field state that was set outside the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEvent {
    pub kind: DeliveryKind,
    #[serde(default)]
    pub runs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub striker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_striker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bowler: Option<String>,
    /// Carried into the ball log untouched.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub at: Option<OffsetDateTime>,
}

impl DeliveryEvent {
    fn of(kind: DeliveryKind, runs: u32) -> Self {
        Self {
            kind,
            runs,
            striker: None,
            non_striker: None,
            bowler: None,
            at: None,
        }
    }

    pub fn run(runs: u32) -> Self {
        Self::of(DeliveryKind::Run, runs)
    }

    pub fn wide(total: u32) -> Self {
        Self::of(DeliveryKind::Wide, total)
    }

    pub fn no_ball(total: u32, bat_runs: u32) -> Self {
        Self::of(DeliveryKind::NoBall { bat_runs }, total)
    }

    pub fn bye(runs: u32) -> Self {
        Self::of(DeliveryKind::Bye, runs)
    }

    pub fn leg_bye(runs: u32) -> Self {
        Self::of(DeliveryKind::LegBye, runs)
    }

    pub fn wicket(wicket: WicketEvent) -> Self {
        Self::of(DeliveryKind::Wicket(wicket), 0)
    }

    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs = runs;
        self
    }

    pub fn striker(mut self, name: impl Into<String>) -> Self {
        self.striker = Some(name.into());
        self
    }

    pub fn non_striker(mut self, name: impl Into<String>) -> Self {
        self.non_striker = Some(name.into());
        self
    }

    pub fn bowler(mut self, name: impl Into<String>) -> Self {
        self.bowler = Some(name.into());
        self
    }

    pub fn at(mut self, at: OffsetDateTime) -> Self {
        self.at = Some(at);
        self
    }

    pub fn wicket_event(&self) -> Option<&WicketEvent> {
        match &self.kind {
            DeliveryKind::Wicket(w) => Some(w),
            _ => None,
        }
    }

    /// Legal unless it is a wide or no-ball (including wickets on one).
    pub fn is_legal(&self) -> bool {
        match &self.kind {
            DeliveryKind::Wide | DeliveryKind::NoBall { .. } => false,
            DeliveryKind::Wicket(w) => w.delivery == DeliveryType::Legal,
            DeliveryKind::Run | DeliveryKind::Bye | DeliveryKind::LegBye => true,
        }
    }
}
