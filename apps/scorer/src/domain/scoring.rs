use tracing::{debug, info};

use crate::config::MatchRules;
use crate::domain::delivery::{DeliveryEvent, DeliveryKind, DeliveryType, DismissalKind};
use crate::domain::lifecycle;
use crate::domain::rules::{self, BALLS_PER_OVER};
use crate::domain::state::{
    require_innings, require_not_completed, require_playing_xis, require_toss, BallRecord,
    BattingSlot, Dismissal, FallOfWicket, Innings, MatchState, MatchStatus, OnField,
    WicketRecord, WicketRejection,
};
use crate::errors::domain::{DomainError, ValidationKind};

/// Apply one delivery and return the next match state.
///
/// The input is never mutated. Every precondition is checked before the
/// copy is touched, so an `Err` means nothing happened and the scorer can
/// retry with corrected input.
pub fn apply_delivery(
    state: &MatchState,
    event: &DeliveryEvent,
) -> Result<MatchState, DomainError> {
    let resolved = resolve_delivery(state, event)?;
    let mut next = state.clone();
    score_delivery(&mut next, resolved)?;
    lifecycle::evaluate(&mut next);
    Ok(next)
}

/// Validate a delivery against the current state and fill in every actor.
fn resolve_delivery(
    state: &MatchState,
    event: &DeliveryEvent,
) -> Result<DeliveryEvent, DomainError> {
    require_not_completed(state, "apply_delivery")?;
    require_toss(state, "apply_delivery")?;
    require_playing_xis(state, "apply_delivery")?;
    let innings = require_innings(state, "apply_delivery")?;
    let on_field = &innings.on_field;

    if on_field.need_next_batter {
        let supplied = match on_field.vacant_slot {
            Some(BattingSlot::NonStriker) => event.non_striker.as_deref(),
            _ => event.striker.as_deref(),
        };
        if supplied.map_or(true, |name| name.trim().is_empty()) {
            return Err(DomainError::validation(
                ValidationKind::MissingReplacementBatter,
                "a wicket has fallen; name the incoming batter",
            ));
        }
    }

    let striker = resolve_actor(innings, event.striker.as_deref(), &on_field.striker, "striker")?;
    let non_striker = resolve_actor(
        innings,
        event.non_striker.as_deref(),
        &on_field.non_striker,
        "non-striker",
    )?;
    let bowler = resolve_actor(innings, event.bowler.as_deref(), &on_field.bowler, "bowler")?;

    if striker == non_striker {
        return Err(DomainError::validation(
            ValidationKind::InvalidActors,
            format!("{striker} cannot be both striker and non-striker"),
        ));
    }
    let batting_xi = state.team_xi(&innings.batting);
    for batter in [&striker, &non_striker] {
        if !batting_xi.contains(batter) {
            return Err(DomainError::validation(
                ValidationKind::InvalidActors,
                format!("{batter} is not in the {} XI", innings.batting),
            ));
        }
        if innings.is_out(batter) {
            return Err(DomainError::validation(
                ValidationKind::InvalidActors,
                format!("{batter} is already out"),
            ));
        }
    }
    if !state.team_xi(&innings.bowling).contains(&bowler) {
        return Err(DomainError::validation(
            ValidationKind::InvalidActors,
            format!("{bowler} is not in the {} XI", innings.bowling),
        ));
    }
    if on_field.need_new_bowler && on_field.last_bowler.as_deref() == Some(bowler.as_str()) {
        return Err(DomainError::validation(
            ValidationKind::InvalidActors,
            format!("{bowler} bowled the previous over"),
        ));
    }

    let quota = rules::bowler_ball_quota(&state.config, state.innings_index);
    let bowled = innings.bowlers.get(&bowler).map_or(0, |b| b.balls);
    if bowled >= quota {
        return Err(DomainError::validation(
            ValidationKind::BowlerOverLimitExceeded,
            format!(
                "{bowler} has already bowled {} overs",
                quota / BALLS_PER_OVER
            ),
        ));
    }

    let mut resolved = event.clone();
    if let DeliveryKind::Wicket(wicket) = &mut resolved.kind {
        let dismissed = match wicket.dismissed.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => striker.clone(),
        };
        if dismissed != striker && dismissed != non_striker {
            return Err(DomainError::validation(
                ValidationKind::InvalidActors,
                format!("{dismissed} is not at the crease"),
            ));
        }
        let fielder = trimmed(&wicket.fielder);
        if let Some(fielder) = &fielder {
            if !state.team_xi(&innings.bowling).contains(fielder) {
                return Err(DomainError::validation(
                    ValidationKind::InvalidActors,
                    format!("fielder {fielder} is not in the {} XI", innings.bowling),
                ));
            }
        }
        let replacement = trimmed(&wicket.replacement);
        if let Some(incoming) = &replacement {
            if !batting_xi.contains(incoming)
                || innings.is_out(incoming)
                || *incoming == striker
                || *incoming == non_striker
            {
                return Err(DomainError::validation(
                    ValidationKind::InvalidActors,
                    format!("{incoming} cannot come in to bat"),
                ));
            }
        }
        wicket.fielder = fielder;
        wicket.replacement = replacement;
        wicket.dismissed = Some(dismissed);
    }
    resolved.striker = Some(striker);
    resolved.non_striker = Some(non_striker);
    resolved.bowler = Some(bowler);
    Ok(resolved)
}

fn trimmed(name: &Option<String>) -> Option<String> {
    name.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Event value first, then the on-field value.
fn resolve_actor(
    innings: &Innings,
    supplied: Option<&str>,
    on_field: &Option<String>,
    role: &str,
) -> Result<String, DomainError> {
    let name = supplied
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| on_field.as_deref());
    match name {
        Some(name) => Ok(name.to_string()),
        None if !innings.started() => Err(DomainError::validation(
            ValidationKind::SetupIncomplete,
            format!("opening setup pending: no {role} selected"),
        )),
        None => Err(DomainError::validation(
            ValidationKind::InvalidActors,
            format!("no {role} selected"),
        )),
    }
}

/// How a ball's runs break down.
#[derive(Debug, Clone, Copy, Default)]
struct BallRuns {
    legal: bool,
    total: u32,
    bat_runs: u32,
    /// Runs that decide strike rotation, if this ball can rotate strike.
    parity_runs: Option<u32>,
    arms_free_hit: bool,
}

fn classify(event: &DeliveryEvent, rules: &MatchRules, rejected: bool) -> BallRuns {
    let runs = event.runs;
    let wide = |total: u32| BallRuns {
        legal: false,
        total,
        bat_runs: 0,
        parity_runs: Some(if rules.wide_strike_on_total {
            total
        } else {
            total - 1
        }),
        arms_free_hit: false,
    };
    let no_ball = |total: u32, bat_runs: u32| BallRuns {
        legal: false,
        total,
        bat_runs: bat_runs.min(total - 1),
        parity_runs: Some(total - 1),
        arms_free_hit: true,
    };

    match &event.kind {
        DeliveryKind::Run => BallRuns {
            legal: true,
            total: runs,
            bat_runs: runs,
            parity_runs: Some(runs),
            arms_free_hit: false,
        },
        DeliveryKind::Bye | DeliveryKind::LegBye => BallRuns {
            legal: true,
            total: runs,
            bat_runs: 0,
            parity_runs: Some(runs),
            arms_free_hit: false,
        },
        DeliveryKind::Wide => wide(runs.max(1)),
        DeliveryKind::NoBall { bat_runs } => no_ball(runs.max(1), *bat_runs),
        DeliveryKind::Wicket(w) => match w.delivery {
            DeliveryType::Wide => wide(1 + runs),
            DeliveryType::NoBall => no_ball(1 + runs, 0),
            DeliveryType::Legal => BallRuns {
                legal: true,
                total: runs,
                bat_runs: runs,
                // A dismissal settles the ends; a rejected one scores like a run.
                parity_runs: rejected.then_some(runs),
                arms_free_hit: false,
            },
        },
    }
}

fn wicket_gate(event: &DeliveryEvent, free_hit: bool) -> Option<WicketRejection> {
    let wicket = event.wicket_event()?;
    let run_out = wicket.kind == DismissalKind::RunOut;
    match wicket.delivery {
        DeliveryType::NoBall if !run_out => Some(WicketRejection::NoBall),
        DeliveryType::Wide if !run_out && wicket.kind != DismissalKind::Stumped => {
            Some(WicketRejection::Wide)
        }
        DeliveryType::Legal if free_hit && !run_out => Some(WicketRejection::FreeHit),
        _ => None,
    }
}

/// Score a resolved delivery into the active innings.
fn score_delivery(state: &mut MatchState, event: DeliveryEvent) -> Result<(), DomainError> {
    let rules = state.config.rules;
    let innings_index = state.innings_index;
    let wicket_cap = rules::wicket_cap(innings_index);

    let (Some(striker), Some(non_striker), Some(bowler)) = (
        event.striker.clone(),
        event.non_striker.clone(),
        event.bowler.clone(),
    ) else {
        return Err(DomainError::validation_other(
            "score_delivery requires resolved actors",
        ));
    };

    if state.status == MatchStatus::Upcoming {
        state.status = MatchStatus::Live;
    }
    state.deliveries.push(event.clone());
    let seq = state.deliveries.len() as u32;

    let Some(inn) = state.innings.get_mut(innings_index) else {
        return Err(DomainError::validation_other("active innings missing"));
    };

    let free_hit_at_start = inn.on_field.free_hit;
    let rejection = wicket_gate(&event, free_hit_at_start);
    let ball = classify(&event, &rules, rejection.is_some());

    inn.balls_total += 1;
    inn.opening_done = true;
    inn.on_field.striker = Some(striker.clone());
    inn.on_field.non_striker = Some(non_striker.clone());
    inn.on_field.bowler = Some(bowler.clone());
    inn.on_field.need_new_bowler = false;
    inn.on_field.need_next_batter = false;
    inn.on_field.vacant_slot = None;
    inn.batters.entry(striker.clone()).or_default();
    inn.batters.entry(non_striker.clone()).or_default();

    // Extras
    match &event.kind {
        DeliveryKind::Bye => inn.extras.bye += ball.total,
        DeliveryKind::LegBye => inn.extras.leg_bye += ball.total,
        DeliveryKind::Run => {}
        DeliveryKind::Wide => inn.extras.wide += ball.total,
        DeliveryKind::NoBall { .. } => {
            inn.extras.no_ball += 1;
            inn.extras.bye += ball.total - 1 - ball.bat_runs;
        }
        DeliveryKind::Wicket(w) => match w.delivery {
            DeliveryType::Legal => {}
            DeliveryType::Wide => inn.extras.wide += ball.total,
            DeliveryType::NoBall => {
                inn.extras.no_ball += 1;
                inn.extras.bye += ball.total - 1;
            }
        },
    }

    // Runs: innings, bowler, striker
    inn.runs += ball.total;
    {
        let figures = inn.bowlers.entry(bowler.clone()).or_default();
        figures.runs += ball.total;
        figures.over_runs += ball.total;
        if !ball.legal {
            match &event.kind {
                DeliveryKind::Wide => figures.wides += ball.total,
                DeliveryKind::NoBall { .. } => figures.no_balls += 1,
                DeliveryKind::Wicket(w) if w.delivery == DeliveryType::Wide => {
                    figures.wides += ball.total
                }
                DeliveryKind::Wicket(_) => figures.no_balls += 1,
                _ => {}
            }
        }
    }
    if ball.bat_runs > 0 {
        let batter = inn.batters.entry(striker.clone()).or_default();
        batter.runs += ball.bat_runs;
        match ball.bat_runs {
            4 => batter.fours += 1,
            6 => batter.sixes += 1,
            _ => {}
        }
    }

    // Partnership
    if inn.partnership.batter1.is_none() || inn.partnership.batter2.is_none() {
        inn.partnership.batter1 = Some(striker.clone());
        inn.partnership.batter2 = Some(non_striker.clone());
    }
    inn.partnership.runs += ball.total;

    let mut over_completed = false;
    let mut maiden = false;
    if ball.legal {
        inn.balls += 1;
        inn.partnership.balls += 1;
        inn.on_field.balls_this_over += 1;
        inn.batters.entry(striker.clone()).or_default().balls += 1;
        {
            let figures = inn.bowlers.entry(bowler.clone()).or_default();
            figures.balls += 1;
            figures.over_legal += 1;
        }
        if ball.parity_runs.is_some_and(|r| r % 2 == 1) {
            inn.on_field.swap_strike();
        }

        if inn.on_field.balls_this_over >= BALLS_PER_OVER {
            over_completed = true;
            if let Some(figures) = inn.bowlers.get_mut(&bowler) {
                if figures.over_legal >= BALLS_PER_OVER && figures.over_runs == 0 {
                    figures.maidens += 1;
                    maiden = true;
                }
            }
            for figures in inn.bowlers.values_mut() {
                figures.over_runs = 0;
                figures.over_legal = 0;
            }
            inn.on_field.balls_this_over = 0;
            inn.on_field.swap_strike();
            inn.on_field.need_new_bowler = true;
            inn.on_field.last_bowler = Some(bowler.clone());
            inn.on_field.bowler = None;
            debug!(bowler = %bowler, maiden, overs = %inn.overs(), "Over completed");
        }
    } else if ball.parity_runs.is_some_and(|r| r % 2 == 1) {
        inn.on_field.swap_strike();
    }

    // Wicket
    let mut wicket_record = None;
    if let Some(wicket) = event.wicket_event() {
        let dismissed = wicket.dismissed.clone().unwrap_or_else(|| striker.clone());
        wicket_record = Some(WicketRecord {
            kind: wicket.kind,
            dismissed: dismissed.clone(),
            fielder: wicket.fielder.clone(),
            replacement: wicket.replacement.clone(),
            crossed: wicket.crossed,
            delivery: wicket.delivery,
        });

        if let Some(reason) = rejection {
            info!(batter = %dismissed, kind = ?wicket.kind, ?reason, "Wicket rejected");
        } else {
            let archived = std::mem::take(&mut inn.partnership);
            inn.partnerships.push(archived);

            let batter = inn.batters.entry(dismissed.clone()).or_default();
            batter.out = true;
            batter.dismissal = Some(Dismissal {
                kind: wicket.kind,
                bowler: bowler.clone(),
                fielder: wicket.fielder.clone(),
                delivery: wicket.delivery,
                crossed: wicket.crossed,
            });
            inn.wkts += 1;

            if wicket.kind.credited_to_bowler() {
                inn.bowlers.entry(bowler.clone()).or_default().wickets += 1;
            }
            if let Some(fielder) = &wicket.fielder {
                let credit = inn.fielding.entry(fielder.clone()).or_default();
                match wicket.kind {
                    DismissalKind::Caught => credit.catches += 1,
                    DismissalKind::RunOut => credit.run_outs += 1,
                    DismissalKind::Stumped => credit.stumpings += 1,
                    _ => {}
                }
            }
            let fow = FallOfWicket {
                wicket: inn.wkts,
                runs: inn.runs,
                overs: inn.overs(),
                batter: dismissed.clone(),
                kind: wicket.kind,
            };
            inn.fall_of_wickets.push(fow);

            if wicket.kind == DismissalKind::RunOut && wicket.crossed {
                inn.on_field.swap_strike();
            }
            vacate_and_replace(
                &mut inn.on_field,
                &dismissed,
                wicket.replacement.as_deref(),
                inn.wkts >= wicket_cap,
            );
            info!(
                batter = %dismissed,
                kind = ?wicket.kind,
                bowler = %bowler,
                wkts = inn.wkts,
                runs = inn.runs,
                "Wicket"
            );
        }
    }

    // Free hit: consumed by a legal ball, re-armed by any no-ball.
    if ball.legal && free_hit_at_start {
        inn.on_field.free_hit = false;
    }
    if ball.arms_free_hit {
        inn.on_field.free_hit = true;
    }

    let record = BallRecord {
        seq,
        innings_seq: inn.log.len() as u32 + 1,
        innings_index,
        overs: inn.overs(),
        balls_legal: inn.balls,
        balls_total: inn.balls_total,
        kind: event.kind.label().to_string(),
        legal: ball.legal,
        runs_total: ball.total,
        runs_input: event.runs,
        bat_runs: ball.bat_runs,
        extras: inn.extras,
        striker: inn.on_field.striker.clone(),
        non_striker: inn.on_field.non_striker.clone(),
        bowler,
        free_hit: free_hit_at_start,
        wicket_applied: wicket_record.as_ref().map(|_| rejection.is_none()),
        wicket_rejection: rejection,
        wicket: wicket_record,
        over_completed,
        maiden,
        at: event.at,
    };
    debug!(
        seq,
        innings = innings_index,
        kind = %record.kind,
        runs = record.runs_total,
        score = %format!("{}/{}", inn.runs, inn.wkts),
        overs = %record.overs,
        "Delivery applied"
    );
    inn.log.push(record);
    Ok(())
}

/// Clear the dismissed batter's end and fill it when the replacement is known.
fn vacate_and_replace(
    on_field: &mut OnField,
    dismissed: &str,
    replacement: Option<&str>,
    all_out: bool,
) {
    let slot = if on_field.striker.as_deref() == Some(dismissed) {
        on_field.striker = None;
        BattingSlot::Striker
    } else if on_field.non_striker.as_deref() == Some(dismissed) {
        on_field.non_striker = None;
        BattingSlot::NonStriker
    } else {
        return;
    };
    if all_out {
        return;
    }
    match replacement {
        Some(incoming) => {
            let incoming = Some(incoming.to_string());
            match slot {
                BattingSlot::Striker => on_field.striker = incoming,
                BattingSlot::NonStriker => on_field.non_striker = incoming,
            }
        }
        None => {
            on_field.need_next_batter = true;
            on_field.vacant_slot = Some(slot);
        }
    }
}
