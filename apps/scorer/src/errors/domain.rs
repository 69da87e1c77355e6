//! Domain-level error type used across the engine, setup and replay layers.
//!
//! Every hard error aborts the operation before any state is touched. A
//! rejected wicket is not an error: it is recorded on the ball record as a
//! [`crate::domain::WicketRejection`] and scoring proceeds.

use thiserror::Error;

use crate::errors::error_code::ErrorCode;

/// Validation kinds for rule violations raised by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Toss, playing XIs or the opening setup have not been recorded.
    SetupIncomplete,
    /// Missing, duplicate or ineligible striker/non-striker/bowler/fielder.
    InvalidActors,
    /// Bowler has already bowled their quota of legal balls.
    BowlerOverLimitExceeded,
    /// Match is completed; no further deliveries are accepted.
    MatchAlreadyCompleted,
    /// A batting slot is vacant and the delivery does not fill it.
    MissingReplacementBatter,
    /// Setup input (toss winner, playing XI) is malformed.
    InvalidSetup,
    Other(String),
}

impl ValidationKind {
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::SetupIncomplete => ErrorCode::SetupIncomplete,
            Self::InvalidActors => ErrorCode::InvalidActors,
            Self::BowlerOverLimitExceeded => ErrorCode::BowlerOverLimitExceeded,
            Self::MatchAlreadyCompleted => ErrorCode::MatchAlreadyCompleted,
            Self::MissingReplacementBatter => ErrorCode::MissingReplacementBatter,
            Self::InvalidSetup => ErrorCode::InvalidSetup,
            Self::Other(_) => ErrorCode::ValidationError,
        }
    }
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Input validation or scoring rule violation
    #[error("validation error {kind:?}: {detail}")]
    Validation { kind: ValidationKind, detail: String },
    /// Invalid match configuration
    #[error("config error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation {
            kind,
            detail: detail.into(),
        }
    }

    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation {
            kind: ValidationKind::Other(detail.clone()),
            detail,
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config(detail.into())
    }

    /// Validation kind, if this is a validation error.
    pub fn kind(&self) -> Option<&ValidationKind> {
        match self {
            Self::Validation { kind, .. } => Some(kind),
            Self::Config(_) => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { kind, .. } => kind.code(),
            Self::Config(_) => ErrorCode::ConfigError,
        }
    }
}
