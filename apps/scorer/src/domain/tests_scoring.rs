use crate::config::{MatchConfig, MatchRules};
use crate::domain::delivery::{DeliveryEvent, DeliveryType, DismissalKind, WicketEvent};
use crate::domain::scoring::apply_delivery;
use crate::domain::state::{BattingSlot, MatchState, MatchStatus, WicketRejection};
use crate::domain::test_state_helpers::{
    apply, apply_all, dot_balls, innings, ready_match, ready_match_with, setup_match,
};
use crate::errors::domain::{DomainError, ValidationKind};

fn kind_of(err: DomainError) -> ValidationKind {
    err.kind().cloned().expect("validation error")
}

fn assert_conserved(state: &MatchState) {
    let inn = innings(state);
    assert_eq!(
        inn.runs,
        inn.extras.total() + inn.batter_runs_total(),
        "runs must equal extras plus batter runs"
    );
}

#[test]
fn single_rotates_strike_two_does_not() {
    let state = ready_match();

    let state = apply(&state, DeliveryEvent::run(1));
    let inn = innings(&state);
    assert_eq!(inn.on_field.striker.as_deref(), Some("A2"));
    assert_eq!(inn.on_field.non_striker.as_deref(), Some("A1"));
    assert_eq!(inn.batters["A1"].runs, 1);
    assert_eq!(inn.batters["A1"].balls, 1);

    let state = apply(&state, DeliveryEvent::run(2));
    let inn = innings(&state);
    assert_eq!(inn.on_field.striker.as_deref(), Some("A2"));
    assert_eq!(inn.batters["A2"].runs, 2);
    assert_eq!(inn.runs, 3);
    assert_eq!(inn.balls, 2);
    assert_eq!(inn.partnership.runs, 3);
    assert_eq!(inn.partnership.balls, 2);
    assert_conserved(&state);
}

#[test]
fn first_delivery_makes_match_live() {
    let state = ready_match();
    assert_eq!(state.status, MatchStatus::Upcoming);
    let state = apply(&state, DeliveryEvent::run(0));
    assert_eq!(state.status, MatchStatus::Live);
}

#[test]
fn no_ball_with_bat_runs_credits_striker_and_arms_free_hit() {
    let state = apply(&ready_match(), DeliveryEvent::no_ball(5, 4));
    let inn = innings(&state);

    assert_eq!(inn.runs, 5);
    assert_eq!(inn.extras.no_ball, 1);
    assert_eq!(inn.extras.bye, 0);
    assert_eq!(inn.batters["A1"].runs, 4);
    assert_eq!(inn.batters["A1"].fours, 1);
    assert_eq!(inn.batters["A1"].balls, 0);
    assert_eq!(inn.balls, 0);
    assert_eq!(inn.balls_total, 1);
    assert!(inn.on_field.free_hit);
    assert_eq!(inn.on_field.striker.as_deref(), Some("A1"));
    assert_eq!(inn.bowlers["B1"].runs, 5);
    assert_eq!(inn.bowlers["B1"].no_balls, 1);
    assert_eq!(inn.bowlers["B1"].balls, 0);
    assert_conserved(&state);
}

#[test]
fn no_ball_bat_runs_are_clamped_and_remainder_is_byes() {
    let state = apply(&ready_match(), DeliveryEvent::no_ball(3, 6));
    let inn = innings(&state);
    assert_eq!(inn.batters["A1"].runs, 2);
    assert_eq!(inn.batters["A1"].sixes, 0);
    assert_eq!(inn.extras.bye, 0);

    let state = apply(&ready_match(), DeliveryEvent::no_ball(4, 1));
    let inn = innings(&state);
    assert_eq!(inn.batters["A1"].runs, 1);
    assert_eq!(inn.extras.bye, 2);
    assert_eq!(inn.extras.no_ball, 1);
    // three running runs: batters crossed
    assert_eq!(inn.on_field.striker.as_deref(), Some("A2"));
    assert_conserved(&state);
}

#[test]
fn wide_strike_follows_running_runs_by_default() {
    let state = apply(&ready_match(), DeliveryEvent::wide(1));
    let inn = innings(&state);
    assert_eq!(inn.extras.wide, 1);
    assert_eq!(inn.balls, 0);
    assert_eq!(inn.balls_total, 1);
    assert_eq!(inn.on_field.striker.as_deref(), Some("A1"));

    let state = apply(&state, DeliveryEvent::wide(2));
    let inn = innings(&state);
    assert_eq!(inn.extras.wide, 3);
    assert_eq!(inn.bowlers["B1"].wides, 3);
    assert_eq!(inn.on_field.striker.as_deref(), Some("A2"));
    assert_conserved(&state);
}

#[test]
fn wide_strike_on_total_rule() {
    let config = MatchConfig {
        rules: MatchRules {
            wide_strike_on_total: true,
            ..MatchRules::default()
        },
        ..MatchConfig::default()
    };
    let state = apply(&ready_match_with(config), DeliveryEvent::wide(1));
    assert_eq!(innings(&state).on_field.striker.as_deref(), Some("A2"));
    let state = apply(&state, DeliveryEvent::wide(2));
    assert_eq!(innings(&state).on_field.striker.as_deref(), Some("A2"));
}

#[test]
fn zero_run_wide_still_costs_one() {
    let state = apply(&ready_match(), DeliveryEvent::wide(0));
    assert_eq!(innings(&state).runs, 1);
    assert_eq!(innings(&state).extras.wide, 1);
}

#[test]
fn byes_and_leg_byes_are_extras_on_a_legal_ball() {
    let state = apply_all(
        &ready_match(),
        [DeliveryEvent::bye(1), DeliveryEvent::leg_bye(2)],
    );
    let inn = innings(&state);
    assert_eq!(inn.extras.bye, 1);
    assert_eq!(inn.extras.leg_bye, 2);
    assert_eq!(inn.balls, 2);
    assert_eq!(inn.batters["A1"].runs, 0);
    assert_eq!(inn.batters["A1"].balls, 1);
    assert_eq!(inn.batters["A2"].balls, 1);
    assert_eq!(inn.bowlers["B1"].runs, 3);
    // bye of 1 crossed them, leg-bye of 2 did not
    assert_eq!(inn.on_field.striker.as_deref(), Some("A2"));
    assert_conserved(&state);
}

#[test]
fn free_hit_rejects_bowled_and_is_consumed_by_legal_ball() {
    let state = apply(&ready_match(), DeliveryEvent::no_ball(1, 0));
    let state = apply(&state, DeliveryEvent::wicket(WicketEvent::new(DismissalKind::Bowled)));
    let inn = innings(&state);

    assert_eq!(inn.wkts, 0);
    assert!(!inn.is_out("A1"));
    assert_eq!(inn.balls, 1);
    assert!(!inn.on_field.free_hit);
    let record = inn.log.last().expect("ball logged");
    assert!(record.free_hit);
    assert_eq!(record.wicket_applied, Some(false));
    assert_eq!(record.wicket_rejection, Some(WicketRejection::FreeHit));
    assert_eq!(inn.bowlers["B1"].wickets, 0);
}

#[test]
fn free_hit_survives_illegal_balls_and_is_rearmed_by_no_ball() {
    let state = apply_all(
        &ready_match(),
        [DeliveryEvent::no_ball(1, 0), DeliveryEvent::wide(1)],
    );
    assert!(innings(&state).on_field.free_hit);

    let state = apply(&state, DeliveryEvent::run(0));
    assert!(!innings(&state).on_field.free_hit);

    let state = apply_all(&state, [DeliveryEvent::no_ball(1, 0), DeliveryEvent::no_ball(1, 0)]);
    assert!(innings(&state).on_field.free_hit);
}

#[test]
fn run_out_stands_on_a_free_hit() {
    let state = apply(&ready_match(), DeliveryEvent::no_ball(1, 0));
    let state = apply(
        &state,
        DeliveryEvent::wicket(
            WicketEvent::new(DismissalKind::RunOut)
                .dismissed("A2")
                .fielder("B4"),
        ),
    );
    let inn = innings(&state);
    assert_eq!(inn.wkts, 1);
    assert!(inn.is_out("A2"));
    assert_eq!(inn.fielding["B4"].run_outs, 1);
    assert_eq!(inn.bowlers["B1"].wickets, 0);
    assert_eq!(inn.on_field.vacant_slot, Some(BattingSlot::NonStriker));
}

#[test]
fn maiden_over_completes_and_asks_for_new_bowler() {
    let state = dot_balls(&ready_match(), 6);
    let inn = innings(&state);

    assert_eq!(inn.bowlers["B1"].maidens, 1);
    assert_eq!(inn.bowlers["B1"].over_runs, 0);
    assert_eq!(inn.bowlers["B1"].over_legal, 0);
    assert_eq!(inn.on_field.bowler, None);
    assert!(inn.on_field.need_new_bowler);
    assert_eq!(inn.on_field.last_bowler.as_deref(), Some("B1"));
    assert_eq!(inn.on_field.balls_this_over, 0);
    assert_eq!(inn.on_field.striker.as_deref(), Some("A2"));
    let record = inn.log.last().expect("ball logged");
    assert!(record.over_completed);
    assert!(record.maiden);
    assert_eq!(record.overs, "1.0");
}

#[test]
fn over_with_a_wide_is_not_a_maiden() {
    let state = apply(&ready_match(), DeliveryEvent::wide(1));
    let state = dot_balls(&state, 6);
    let inn = innings(&state);
    assert_eq!(inn.bowlers["B1"].maidens, 0);
    assert_eq!(inn.balls_total, 7);
    assert!(inn.on_field.need_new_bowler);
}

#[test]
fn same_bowler_cannot_bowl_consecutive_overs() {
    let state = dot_balls(&ready_match(), 6);

    let err = apply_delivery(&state, &DeliveryEvent::run(0).bowler("B1")).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::InvalidActors);

    let err = apply_delivery(&state, &DeliveryEvent::run(0)).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::InvalidActors);

    let next = apply_delivery(&state, &DeliveryEvent::run(0).bowler("B2")).expect("new bowler");
    assert!(!innings(&next).on_field.need_new_bowler);
    assert_eq!(innings(&next).on_field.bowler.as_deref(), Some("B2"));
}

#[test]
fn bowler_over_cap_rejects_legal_and_illegal_deliveries() {
    let mut state = ready_match();
    for bowler in ["B1", "B2", "B1", "B2"] {
        state = apply_all(&state, (0..6).map(|_| DeliveryEvent::run(0).bowler(bowler)));
    }
    assert_eq!(innings(&state).bowlers["B1"].balls, 12);

    let err = apply_delivery(&state, &DeliveryEvent::run(0).bowler("B1")).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::BowlerOverLimitExceeded);
    let err = apply_delivery(&state, &DeliveryEvent::wide(1).bowler("B1")).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::BowlerOverLimitExceeded);

    let next = apply_delivery(&state, &DeliveryEvent::run(0).bowler("B3")).expect("fresh bowler");
    assert_eq!(innings(&next).balls, 25);
}

#[test]
fn bowled_wicket_updates_figures_and_waits_for_next_batter() {
    let state = apply(&ready_match(), DeliveryEvent::run(2));
    let state = apply(&state, DeliveryEvent::wicket(WicketEvent::new(DismissalKind::Bowled)));
    let inn = innings(&state);

    assert_eq!(inn.wkts, 1);
    assert!(inn.is_out("A1"));
    let dismissal = inn.batters["A1"].dismissal.as_ref().expect("dismissal");
    assert_eq!(dismissal.kind, DismissalKind::Bowled);
    assert_eq!(dismissal.bowler, "B1");
    assert_eq!(inn.bowlers["B1"].wickets, 1);
    assert_eq!(inn.batters["A1"].balls, 2);

    let fow = &inn.fall_of_wickets[0];
    assert_eq!(fow.wicket, 1);
    assert_eq!(fow.runs, 2);
    assert_eq!(fow.overs, "0.2");
    assert_eq!(fow.batter, "A1");

    assert_eq!(inn.partnerships.len(), 1);
    assert_eq!(inn.partnerships[0].runs, 2);
    assert_eq!(inn.partnership.runs, 0);

    assert_eq!(inn.on_field.striker, None);
    assert!(inn.on_field.need_next_batter);
    assert_eq!(inn.on_field.vacant_slot, Some(BattingSlot::Striker));

    let err = apply_delivery(&state, &DeliveryEvent::run(0)).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::MissingReplacementBatter);

    let next = apply_delivery(&state, &DeliveryEvent::run(1).striker("A3")).expect("new batter");
    let inn = innings(&next);
    assert!(!inn.on_field.need_next_batter);
    assert_eq!(inn.on_field.non_striker.as_deref(), Some("A3"));
    assert_eq!(inn.partnership.batter1.as_deref(), Some("A3"));
    assert_eq!(inn.partnership.batter2.as_deref(), Some("A2"));
}

#[test]
fn caught_credits_fielder_and_replacement_walks_in() {
    let state = apply(
        &ready_match(),
        DeliveryEvent::wicket(
            WicketEvent::new(DismissalKind::Caught)
                .fielder("B5")
                .replacement("A3"),
        ),
    );
    let inn = innings(&state);
    assert_eq!(inn.fielding["B5"].catches, 1);
    assert_eq!(inn.bowlers["B1"].wickets, 1);
    assert_eq!(inn.on_field.striker.as_deref(), Some("A3"));
    assert!(!inn.on_field.need_next_batter);
}

#[test]
fn crossed_run_out_rotates_before_vacating() {
    let state = apply(
        &ready_match(),
        DeliveryEvent::wicket(
            WicketEvent::new(DismissalKind::RunOut)
                .dismissed("A2")
                .fielder("B3")
                .crossed(true),
        )
        .with_runs(1),
    );
    let inn = innings(&state);
    assert_eq!(inn.runs, 1);
    assert_eq!(inn.batters["A1"].runs, 1);
    assert!(inn.is_out("A2"));
    assert_eq!(inn.on_field.non_striker.as_deref(), Some("A1"));
    assert_eq!(inn.on_field.striker, None);
    assert_eq!(inn.on_field.vacant_slot, Some(BattingSlot::Striker));
    assert_eq!(inn.fielding["B3"].run_outs, 1);
    assert_eq!(inn.bowlers["B1"].wickets, 0);
    assert_conserved(&state);
}

#[test]
fn wickets_on_illegal_deliveries() {
    // Bowled off a no-ball does not stand and arms a free hit.
    let state = apply(
        &ready_match(),
        DeliveryEvent::wicket(WicketEvent::new(DismissalKind::Bowled).on(DeliveryType::NoBall)),
    );
    let inn = innings(&state);
    assert_eq!(inn.wkts, 0);
    assert_eq!(inn.runs, 1);
    assert_eq!(inn.extras.no_ball, 1);
    assert!(inn.on_field.free_hit);
    assert_eq!(
        inn.log.last().and_then(|r| r.wicket_rejection),
        Some(WicketRejection::NoBall)
    );

    // Stumped off a wide stands.
    let state = apply(
        &ready_match(),
        DeliveryEvent::wicket(WicketEvent::new(DismissalKind::Stumped).on(DeliveryType::Wide)),
    );
    let inn = innings(&state);
    assert_eq!(inn.wkts, 1);
    assert_eq!(inn.balls, 0);
    assert_eq!(inn.extras.wide, 1);
    assert_eq!(inn.bowlers["B1"].wickets, 1);

    // Caught off a wide does not.
    let state = apply(
        &ready_match(),
        DeliveryEvent::wicket(WicketEvent::new(DismissalKind::Caught).on(DeliveryType::Wide)),
    );
    assert_eq!(innings(&state).wkts, 0);
    assert_eq!(
        innings(&state).log.last().and_then(|r| r.wicket_rejection),
        Some(WicketRejection::Wide)
    );

    // Run out off a no-ball stands; extra run becomes a bye.
    let state = apply(
        &ready_match(),
        DeliveryEvent::wicket(
            WicketEvent::new(DismissalKind::RunOut)
                .on(DeliveryType::NoBall)
                .dismissed("A2"),
        )
        .with_runs(1),
    );
    let inn = innings(&state);
    assert_eq!(inn.wkts, 1);
    assert_eq!(inn.runs, 2);
    assert_eq!(inn.extras.no_ball, 1);
    assert_eq!(inn.extras.bye, 1);
    assert!(inn.on_field.free_hit);
    assert_conserved(&state);
}

#[test]
fn actor_validation_errors() {
    let state = ready_match();
    let cases = [
        DeliveryEvent::run(0).striker("A2"),
        DeliveryEvent::run(0).striker("B3"),
        DeliveryEvent::run(0).bowler("A5"),
        DeliveryEvent::wicket(WicketEvent::new(DismissalKind::RunOut).dismissed("A5")),
        DeliveryEvent::wicket(WicketEvent::new(DismissalKind::Caught).fielder("A7")),
        DeliveryEvent::wicket(WicketEvent::new(DismissalKind::Bowled).replacement("A2")),
    ];
    for event in cases {
        let err = apply_delivery(&state, &event).unwrap_err();
        assert_eq!(kind_of(err), ValidationKind::InvalidActors, "{event:?}");
    }
}

#[test]
fn dismissed_batter_cannot_return() {
    let state = apply(
        &ready_match(),
        DeliveryEvent::wicket(WicketEvent::new(DismissalKind::Lbw).replacement("A3")),
    );
    let err = apply_delivery(
        &state,
        &DeliveryEvent::wicket(WicketEvent::new(DismissalKind::Bowled).replacement("A1")),
    )
    .unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::InvalidActors);

    let err = apply_delivery(&state, &DeliveryEvent::run(0).non_striker("A1")).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::InvalidActors);
}

#[test]
fn setup_preconditions() {
    let bare = MatchState::new("A", "B", MatchConfig::default());
    let err = apply_delivery(&bare, &DeliveryEvent::run(0)).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::SetupIncomplete);

    let no_opening = setup_match(MatchConfig::default());
    let err = apply_delivery(&no_opening, &DeliveryEvent::run(0)).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::SetupIncomplete);

    let opened_by_event = apply_delivery(
        &no_opening,
        &DeliveryEvent::run(1)
            .striker("A4")
            .non_striker("A5")
            .bowler("B6"),
    )
    .expect("actors on the event open the innings");
    let inn = innings(&opened_by_event);
    assert!(inn.opening_done);
    assert_eq!(inn.on_field.striker.as_deref(), Some("A5"));
    assert_eq!(inn.on_field.bowler.as_deref(), Some("B6"));
}

#[test]
fn completed_match_rejects_deliveries() {
    let mut state = ready_match();
    state.status = MatchStatus::Completed;
    let err = apply_delivery(&state, &DeliveryEvent::run(1)).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::MatchAlreadyCompleted);
}

#[test]
fn rejected_delivery_leaves_state_usable() {
    let state = apply(&ready_match(), DeliveryEvent::run(1));
    let snapshot = state.clone();
    assert!(apply_delivery(&state, &DeliveryEvent::run(0).bowler("A1")).is_err());
    assert_eq!(state, snapshot);

    let next = apply(&state, DeliveryEvent::run(0));
    assert_eq!(innings(&next).balls, 2);
}

#[test]
fn ball_log_and_resolved_match_log() {
    let state = apply_all(
        &ready_match(),
        [DeliveryEvent::run(1), DeliveryEvent::wide(1), DeliveryEvent::no_ball(2, 1)],
    );
    let inn = innings(&state);
    let seqs: Vec<u32> = inn.log.iter().map(|r| r.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3]);
    let kinds: Vec<&str> = inn.log.iter().map(|r| r.kind.as_str()).collect();
    assert_eq!(kinds, vec!["RUN", "WIDE", "NO_BALL"]);
    assert!(inn.log[0].legal);
    assert!(!inn.log[1].legal);
    assert_eq!(inn.log[2].runs_total, 2);
    assert_eq!(inn.log[2].bat_runs, 1);
    assert_eq!(inn.log[2].extras.no_ball, 1);
    assert_eq!(inn.log[0].striker.as_deref(), Some("A2"));

    assert_eq!(state.deliveries.len(), 3);
    for event in &state.deliveries {
        assert!(event.striker.is_some());
        assert!(event.non_striker.is_some());
        assert_eq!(event.bowler.as_deref(), Some("B1"));
    }
}
