//! Error codes for the scoring engine.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings a
//! scorer UI or persistence layer receives. Add new codes here; never pass
//! ad-hoc strings as error codes.

use core::fmt;

/// Centralized error codes for the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Scoring preconditions
    /// Toss, playing XI or opening setup missing
    SetupIncomplete,
    /// Missing, duplicate or ineligible actors
    InvalidActors,
    /// Bowler quota exhausted
    BowlerOverLimitExceeded,
    /// Match already completed
    MatchAlreadyCompleted,
    /// Vacant batting slot not filled
    MissingReplacementBatter,
    /// Malformed setup input
    InvalidSetup,

    // Soft conditions
    /// Dismissal not allowed on this delivery (recorded, not raised)
    WicketRejected,

    /// General validation error
    ValidationError,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SetupIncomplete => "SETUP_INCOMPLETE",
            Self::InvalidActors => "INVALID_ACTORS",
            Self::BowlerOverLimitExceeded => "BOWLER_OVER_LIMIT_EXCEEDED",
            Self::MatchAlreadyCompleted => "MATCH_ALREADY_COMPLETED",
            Self::MissingReplacementBatter => "MISSING_REPLACEMENT_BATTER",
            Self::InvalidSetup => "INVALID_SETUP",

            Self::WicketRejected => "WICKET_REJECTED",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
