//! Edge-triggered match events derived from a before/after pair of states.

use serde::{Deserialize, Serialize};

use crate::domain::delivery::DismissalKind;
use crate::domain::state::{BallRecord, Innings, MatchState, MatchStatus, WicketRejection};

/// Batter scores that raise a milestone when crossed.
pub const MILESTONES: [u32; 2] = [50, 100];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchTransition {
    OverCompleted { bowler: String, maiden: bool },
    WicketFell { batter: String, kind: DismissalKind },
    WicketRejected { reason: WicketRejection },
    BatterMilestone { batter: String, runs: u32 },
    /// Three wickets on the bowler's own consecutive deliveries.
    HatTrick { bowler: String },
    InningsCompleted { index: usize },
    SuperOverStarted { round: u32 },
    MatchCompleted,
}

/// Everything that happened between `before` and `after`.
///
/// Only moving forward produces ball-level events; an undo yields none.
pub fn derive_match_transitions(before: &MatchState, after: &MatchState) -> Vec<MatchTransition> {
    let mut transitions = Vec::new();
    let seen = before.deliveries.len() as u32;

    // 1. Ball-level events, in bowling order
    for (innings, record) in new_records(after, seen) {
        if let Some(wicket) = &record.wicket {
            match (record.wicket_applied, record.wicket_rejection) {
                (Some(true), _) => {
                    transitions.push(MatchTransition::WicketFell {
                        batter: wicket.dismissed.clone(),
                        kind: wicket.kind,
                    });
                    if wicket.kind.credited_to_bowler() && completes_hat_trick(innings, record) {
                        transitions.push(MatchTransition::HatTrick {
                            bowler: record.bowler.clone(),
                        });
                    }
                }
                (_, Some(reason)) => transitions.push(MatchTransition::WicketRejected { reason }),
                _ => {}
            }
        }
        if record.over_completed {
            transitions.push(MatchTransition::OverCompleted {
                bowler: record.bowler.clone(),
                maiden: record.maiden,
            });
        }
    }

    // 2. Milestones
    if after.deliveries.len() > before.deliveries.len() {
        for (index, innings) in after.innings.iter().enumerate() {
            let previous = before.innings.get(index);
            for (batter, figures) in &innings.batters {
                let had = previous
                    .and_then(|p| p.batters.get(batter))
                    .map_or(0, |b| b.runs);
                for mark in MILESTONES {
                    if had < mark && figures.runs >= mark {
                        transitions.push(MatchTransition::BatterMilestone {
                            batter: batter.clone(),
                            runs: mark,
                        });
                    }
                }
            }
        }
    }

    // 3. Lifecycle edges
    if after.innings_index > before.innings_index {
        for index in before.innings_index..after.innings_index {
            transitions.push(MatchTransition::InningsCompleted { index });
        }
    }
    if after.super_over_round > before.super_over_round {
        for round in before.super_over_round + 1..=after.super_over_round {
            transitions.push(MatchTransition::SuperOverStarted { round });
        }
    }
    if before.status != MatchStatus::Completed && after.status == MatchStatus::Completed {
        transitions.push(MatchTransition::InningsCompleted {
            index: after.innings_index,
        });
        transitions.push(MatchTransition::MatchCompleted);
    }

    transitions
}

fn new_records(after: &MatchState, seen: u32) -> Vec<(&Innings, &BallRecord)> {
    let mut records: Vec<(&Innings, &BallRecord)> = after
        .innings
        .iter()
        .flat_map(|inn| inn.log.iter().map(move |rec| (inn, rec)))
        .filter(|(_, rec)| rec.seq > seen)
        .collect();
    records.sort_by_key(|(_, rec)| rec.seq);
    records
}

/// `record` and the bowler's two previous deliveries in this innings all took
/// a wicket credited to the bowler. Wides and no-balls that took no wicket
/// do not break the sequence.
fn completes_hat_trick(innings: &Innings, record: &BallRecord) -> bool {
    let credited = |rec: &BallRecord| {
        rec.wicket_applied == Some(true)
            && rec
                .wicket
                .as_ref()
                .is_some_and(|w| w.kind.credited_to_bowler())
    };
    let last_three: Vec<&BallRecord> = innings
        .log
        .iter()
        .filter(|rec| rec.bowler == record.bowler && rec.innings_seq <= record.innings_seq)
        .filter(|rec| rec.legal || rec.wicket_applied == Some(true))
        .rev()
        .take(3)
        .collect();
    last_three.len() == 3 && last_three.iter().all(|rec| credited(*rec))
}
