use crate::config::MatchConfig;

pub const BALLS_PER_OVER: u32 = 6;
pub const PLAYING_XI_SIZE: usize = 11;
pub const MAX_WICKETS: u8 = 10;
pub const SUPER_OVER_MAX_WICKETS: u8 = 2;

/// Index of the first Super Over innings. Indices 0 and 1 are the main innings.
pub const FIRST_SUPER_OVER_INDEX: usize = 2;

#[inline]
pub fn is_super_over(innings_index: usize) -> bool {
    innings_index >= FIRST_SUPER_OVER_INDEX
}

/// True for the second innings of a pair (main chase or Super Over chase).
#[inline]
pub fn is_chase(innings_index: usize) -> bool {
    innings_index % 2 == 1
}

/// Wickets that end an innings.
#[inline]
pub fn wicket_cap(innings_index: usize) -> u8 {
    if is_super_over(innings_index) {
        SUPER_OVER_MAX_WICKETS
    } else {
        MAX_WICKETS
    }
}

#[inline]
pub fn overs_limit(config: &MatchConfig, innings_index: usize) -> u8 {
    if is_super_over(innings_index) {
        config.super_over_overs
    } else {
        config.overs_per_innings
    }
}

/// Legal balls that end an innings.
#[inline]
pub fn innings_ball_limit(config: &MatchConfig, innings_index: usize) -> u32 {
    u32::from(overs_limit(config, innings_index)) * BALLS_PER_OVER
}

/// Legal balls a single bowler may deliver in one innings.
#[inline]
pub fn bowler_ball_quota(config: &MatchConfig, innings_index: usize) -> u32 {
    let overs = if is_super_over(innings_index) {
        config.super_over_overs
    } else {
        config.max_overs_per_bowler
    };
    u32::from(overs) * BALLS_PER_OVER
}

/// First innings index of a 1-based Super Over round.
#[inline]
pub fn super_over_base_index(round: u32) -> usize {
    debug_assert!(round >= 1, "super over rounds are 1-based");
    FIRST_SUPER_OVER_INDEX + 2 * (round.saturating_sub(1) as usize)
}

/// Cricket overs notation: 14 legal balls -> "2.2".
pub fn overs_text(balls: u32) -> String {
    format!("{}.{}", balls / BALLS_PER_OVER, balls % BALLS_PER_OVER)
}

/// 1-based over number the next (or current) ball belongs to; 0 before the first ball.
pub fn current_over_no(balls: u32) -> u32 {
    balls / BALLS_PER_OVER + u32::from(balls % BALLS_PER_OVER > 0)
}
