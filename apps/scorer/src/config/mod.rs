//! Match configuration: innings length, bowler quotas and rule toggles.
//!
//! Configuration travels inside the match snapshot, so every field has a
//! serde default and older snapshots without a field still load.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::domain::DomainError;

/// Rule toggles that change scoring behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// A tie at the end of the second innings starts a Super Over.
    pub super_over_on_tie: bool,
    /// Wides rotate strike on the parity of the total instead of the runs
    /// taken beyond the 1-run penalty.
    pub wide_strike_on_total: bool,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            super_over_on_tie: true,
            wide_strike_on_total: false,
        }
    }
}

/// Per-match configuration.
///
/// # Example JSON Config
///
/// ```json
/// {
///   "overs_per_innings": 10,
///   "powerplay_overs": 3,
///   "max_overs_per_bowler": 2,
///   "super_over_overs": 1,
///   "rules": { "super_over_on_tie": true, "wide_strike_on_total": false }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub overs_per_innings: u8,
    pub powerplay_overs: u8,
    /// Quota for normal innings. Super Over innings use `super_over_overs`.
    pub max_overs_per_bowler: u8,
    pub super_over_overs: u8,
    pub rules: MatchRules,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            overs_per_innings: 10,
            powerplay_overs: 3,
            max_overs_per_bowler: 2,
            super_over_overs: 1,
            rules: MatchRules::default(),
        }
    }
}

impl MatchConfig {
    /// Build a configuration from `SCORER_*` environment variables, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Result<Self, DomainError> {
        let defaults = Self::default();
        let config = Self {
            overs_per_innings: var_or("SCORER_OVERS_PER_INNINGS", defaults.overs_per_innings)?,
            powerplay_overs: var_or("SCORER_POWERPLAY_OVERS", defaults.powerplay_overs)?,
            max_overs_per_bowler: var_or(
                "SCORER_MAX_OVERS_PER_BOWLER",
                defaults.max_overs_per_bowler,
            )?,
            super_over_overs: var_or("SCORER_SUPER_OVER_OVERS", defaults.super_over_overs)?,
            rules: MatchRules {
                super_over_on_tie: var_or(
                    "SCORER_SUPER_OVER_ON_TIE",
                    defaults.rules.super_over_on_tie,
                )?,
                wide_strike_on_total: var_or(
                    "SCORER_WIDE_STRIKE_ON_TOTAL",
                    defaults.rules.wide_strike_on_total,
                )?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.overs_per_innings == 0 {
            return Err(DomainError::config("overs_per_innings must be at least 1"));
        }
        if self.super_over_overs == 0 {
            return Err(DomainError::config("super_over_overs must be at least 1"));
        }
        if self.max_overs_per_bowler == 0 {
            return Err(DomainError::config("max_overs_per_bowler must be at least 1"));
        }
        if self.powerplay_overs > self.overs_per_innings {
            return Err(DomainError::config(format!(
                "powerplay_overs ({}) cannot exceed overs_per_innings ({})",
                self.powerplay_overs, self.overs_per_innings
            )));
        }
        Ok(())
    }
}

/// Read and parse an environment variable, using `default` when unset.
fn var_or<T: FromStr>(key: &str, default: T) -> Result<T, DomainError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| DomainError::config(format!("{key} has an invalid value: '{raw}'"))),
        Err(_) => Ok(default),
    }
}
