//! Property tests for the bidding state machine.
//!
//! Properties tested:
//! - random bidding always reaches the multiplier phase with one landlord
//! - always passing ends in a forced landlord on the deal after the last reshuffle
//! - rejected submissions leave the state untouched

use proptest::prelude::*;

use super::bidding::{legal_bids, submit_bid};
use super::rules::{DEFAULT_MAX_RESHUFFLES, HAND_SIZE, LANDLORD_HAND_SIZE};
use super::state::{next_seat, BidDecision, Phase, RoundState};
use super::test_gens::started_game;
use super::test_prelude;

/// Upper bound on bids before some deal must settle a landlord.
const MAX_BIDS: usize = 5 * (DEFAULT_MAX_RESHUFFLES as usize + 1);

fn run_bidding(state: &mut RoundState, choices: &[bool]) -> usize {
    let mut steps = 0;
    while state.phase == Phase::Bidding && steps < MAX_BIDS {
        let seat = state.current_actor().expect("bidding has an actor");
        let bids = legal_bids(state, seat);
        let pick = if choices.get(steps).copied().unwrap_or(false) {
            bids[0]
        } else {
            BidDecision::Pass
        };
        submit_bid(state, seat, pick).expect("legal bid accepted");
        steps += 1;
    }
    steps
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: any sequence of legal bids confirms exactly one landlord
    /// holding 20 cards.
    #[test]
    fn prop_bidding_terminates_with_landlord(
        mut state in started_game(),
        choices in prop::collection::vec(any::<bool>(), MAX_BIDS),
    ) {
        run_bidding(&mut state, &choices);
        prop_assert_eq!(state.phase, Phase::Multiplier);
        let landlord = state.landlord.expect("landlord set");
        prop_assert!(state.deal_no <= DEFAULT_MAX_RESHUFFLES as u32 + 1);
        for seat in 0..3u8 {
            let expected = if seat == landlord { LANDLORD_HAND_SIZE } else { HAND_SIZE };
            prop_assert_eq!(state.hand(seat).len(), expected);
        }
        prop_assert!(state.bottom.is_empty());
        prop_assert_eq!(state.revealed_bottom.len(), 3);
        prop_assert_eq!(state.cards_in_play(), 54);
    }

    /// Property: passing every time exhausts the reshuffles and the next
    /// deal forces a landlord.
    #[test]
    fn prop_all_pass_forces_landlord(mut state in started_game()) {
        let steps = run_bidding(&mut state, &[]);
        prop_assert_eq!(steps, 3 * DEFAULT_MAX_RESHUFFLES as usize);
        prop_assert!(state.forced_landlord);
        prop_assert_eq!(state.reshuffles, DEFAULT_MAX_RESHUFFLES);
        prop_assert_eq!(state.deal_no, DEFAULT_MAX_RESHUFFLES as u32 + 1);
        prop_assert_eq!(state.phase, Phase::Multiplier);
    }

    /// Property: an out-of-turn or repeated bid is rejected without
    /// changing anything.
    #[test]
    fn prop_rejected_bids_are_noops(
        mut state in started_game(),
        choices in prop::collection::vec(any::<bool>(), 0..4),
        grab in any::<bool>(),
    ) {
        for pick in choices {
            if state.phase != Phase::Bidding {
                break;
            }
            let seat = state.current_actor().expect("bidding has an actor");
            let bid = if pick { legal_bids(&state, seat)[0] } else { BidDecision::Pass };
            submit_bid(&mut state, seat, bid).expect("legal bid accepted");
        }
        prop_assume!(state.phase == Phase::Bidding);
        let seat = state.current_actor().expect("bidding has an actor");
        let other = next_seat(seat);
        let before = state.clone();
        let decision = if grab { BidDecision::Grab } else { BidDecision::Pass };
        prop_assert!(submit_bid(&mut state, other, decision).is_err());
        prop_assert_eq!(&state, &before);
    }
}
