//! Property tests for complete games driven by random legal decisions.
//!
//! Properties tested:
//! - every game ends with one empty hand and zero-sum scores
//! - no card is lost or duplicated while playing
//! - a trick closes exactly when both other seats pass in a row

use proptest::prelude::*;

use super::bidding::start_game;
use super::decision::{apply_decision, legal_decisions, Decision};
use super::game_transition::Transition;
use super::state::{PlayAction, Phase, RoundState};
use super::test_prelude;

/// Bound on decisions in one game: bidding, multiplier and at most one
/// play or pass per card per seat.
const MAX_DECISIONS: usize = 400;

fn played_cards(state: &RoundState) -> usize {
    state.play.as_ref().map_or(0, |p| {
        p.history
            .iter()
            .map(|r| match &r.action {
                PlayAction::Play { pattern } => pattern.len(),
                PlayAction::Pass => 0,
            })
            .sum()
    })
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: random legal play always finishes the game with
    /// conserved cards and zero-sum scores.
    #[test]
    fn prop_random_games_finish(
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<usize>(), MAX_DECISIONS),
    ) {
        let mut state = RoundState::new(seed);
        start_game(&mut state).unwrap();
        let mut steps = 0;
        while state.phase != Phase::Ended {
            prop_assert!(steps < MAX_DECISIONS, "game did not finish");
            let seat = state.current_actor().expect("actor while in progress");
            let options = legal_decisions(&state, seat);
            prop_assert!(!options.is_empty());
            let choice = options[picks[steps] % options.len()].clone();
            let passes_before = state
                .play
                .as_ref()
                .map_or(0, |p| p.passed_since_play.len());
            let was_pass = choice == Decision::PassTurn;
            let transitions = apply_decision(&mut state, seat, choice).unwrap();

            if state.phase == Phase::Playing || state.phase == Phase::Ended {
                prop_assert_eq!(state.cards_in_play() + played_cards(&state), 54);
            }
            let reset = transitions
                .iter()
                .any(|t| matches!(t, Transition::TrickReset { .. }));
            prop_assert_eq!(reset, was_pass && passes_before == 1);
            steps += 1;
        }

        let result = state.result.as_ref().expect("result when ended");
        prop_assert!(state.hand(result.winner).is_empty());
        prop_assert_eq!(result.scores.iter().sum::<i64>(), 0);
        prop_assert!(state.hands.iter().filter(|h| h.is_empty()).count() == 1);
    }
}
