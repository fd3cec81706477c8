//! End-to-end scenarios through the public decision API.

use super::bidding::start_game;
use super::decision::{apply_decision, legal_decisions, Decision};
use super::game_transition::Transition;
use super::player_view::{CurrentRoundInfo, Role};
use super::snapshot::{snapshot, PhaseSnapshot};
use super::state::{next_seat, nth_from, Phase, RoundState, Seat};

fn actor(s: &RoundState) -> Seat {
    s.current_actor().expect("a seat is to act")
}

/// Play out the rest of the game, always choosing the first legal option.
fn autoplay(s: &mut RoundState) -> Vec<Transition> {
    let mut log = Vec::new();
    for _ in 0..400 {
        if s.phase == Phase::Ended {
            break;
        }
        let seat = actor(s);
        let first = legal_decisions(s, seat)
            .into_iter()
            .next()
            .expect("a legal decision exists");
        log.extend(apply_decision(s, seat, first).unwrap());
    }
    log
}

#[test]
fn grabbed_and_doubled_game_scores_fourfold() {
    let mut s = RoundState::new(2024);
    start_game(&mut s).unwrap();
    let caller = actor(&s);
    let grabber = next_seat(caller);
    apply_decision(&mut s, caller, Decision::Call).unwrap();
    apply_decision(&mut s, grabber, Decision::Grab).unwrap();
    let t = apply_decision(&mut s, nth_from(caller, 2), Decision::Pass).unwrap();
    assert!(t.iter().any(|t| matches!(t, Transition::LandlordConfirmed { landlord, .. } if *landlord == grabber)));

    assert_eq!(actor(&s), grabber);
    apply_decision(&mut s, grabber, Decision::Double).unwrap();
    apply_decision(&mut s, next_seat(grabber), Decision::Pass).unwrap();
    apply_decision(&mut s, nth_from(grabber, 2), Decision::Pass).unwrap();
    assert_eq!(s.phase, Phase::Playing);
    assert_eq!(actor(&s), grabber);

    let log = autoplay(&mut s);
    assert_eq!(s.phase, Phase::Ended);
    let Some(Transition::GameEnded { result }) = log.last() else {
        panic!("last transition should end the game");
    };
    assert!(result.grabbed);
    assert_eq!(result.base_stake, 2);
    assert_eq!(result.multiplier, 2);
    let landlord_score = result.scores[grabber as usize];
    assert_eq!(landlord_score.abs(), 8);
    for seat in 0..3u8 {
        if seat != grabber {
            assert_eq!(result.scores[seat as usize], -landlord_score / 2);
        }
    }
}

#[test]
fn views_track_roles_through_the_game() {
    let mut s = RoundState::new(77);
    start_game(&mut s).unwrap();
    let caller = actor(&s);
    apply_decision(&mut s, caller, Decision::Call).unwrap();
    apply_decision(&mut s, next_seat(caller), Decision::Pass).unwrap();
    apply_decision(&mut s, nth_from(caller, 2), Decision::Pass).unwrap();

    let landlord_view = CurrentRoundInfo::for_seat(&s, caller);
    assert_eq!(landlord_view.role, Role::Landlord);
    assert_eq!(landlord_view.hand.len(), 20);
    assert_eq!(landlord_view.bottom.len(), 3);
    assert!(landlord_view.is_my_turn);

    let farmer_view = CurrentRoundInfo::for_seat(&s, next_seat(caller));
    assert_eq!(farmer_view.role, Role::Farmer);
    assert_eq!(farmer_view.min_opponent_cards(), 20);
    assert!(!farmer_view.is_my_turn);
}

#[test]
fn state_survives_json_mid_game() {
    let mut s = RoundState::new(5);
    start_game(&mut s).unwrap();
    let caller = actor(&s);
    apply_decision(&mut s, caller, Decision::Call).unwrap();
    let json = serde_json::to_string(&s).unwrap();
    let back: RoundState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
}

#[test]
fn ended_snapshot_reports_result() {
    let mut s = RoundState::new(31);
    start_game(&mut s).unwrap();
    let caller = actor(&s);
    apply_decision(&mut s, caller, Decision::Call).unwrap();
    apply_decision(&mut s, next_seat(caller), Decision::Pass).unwrap();
    apply_decision(&mut s, nth_from(caller, 2), Decision::Pass).unwrap();
    autoplay(&mut s);

    let snap = snapshot(&s);
    let PhaseSnapshot::Ended(result) = &snap.phase else {
        panic!("expected ended snapshot, got {:?}", snap.phase);
    };
    assert_eq!(result.landlord, caller);
    assert_eq!(snap.game.current_actor, None);
    assert!(legal_decisions(&s, caller).is_empty());
}
