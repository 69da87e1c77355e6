//! Domain layer: pure scoring logic and match state.

pub mod awards;
pub mod delivery;
pub mod lifecycle;
pub mod replay;
pub mod rules;
pub mod scoring;
pub mod setup;
pub mod state;
pub mod summary;
pub mod transitions;

#[cfg(test)]
mod tests_scoring;

// Re-exports for ergonomics
pub use awards::{compute_awards, Awards, BestBowler, ManOfMatch, SixerKing};
pub use delivery::{DeliveryEvent, DeliveryKind, DeliveryType, DismissalKind, WicketEvent};
pub use replay::{replay, replay_detailed, undo_last, ReplayRejection};
pub use scoring::apply_delivery;
pub use setup::{record_toss, set_opening, set_playing_xi};
pub use state::{
    BallRecord, Innings, Margin, MatchPhase, MatchResult, MatchState, MatchStatus, Toss,
    TossDecision, WicketRejection,
};
pub use summary::{summarize, MatchSummary};
pub use transitions::{derive_match_transitions, MatchTransition};
