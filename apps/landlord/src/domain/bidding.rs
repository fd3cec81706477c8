//! Dealing and bidding: calling, grabbing, reshuffle and forced assignment.
//!
//! Calling: starting at a random first bidder, each seat calls or passes
//! once. The first call opens grabbing at the caller's successor. Three
//! passes trigger a re-deal; once `max_reshuffles` re-deals have happened
//! the next deal assigns a random landlord without bidding.
//!
//! Grabbing: every seat except the caller grabs or passes once, clockwise
//! from the caller. Each grab moves the candidate. When the last non-caller
//! has decided the candidate is confirmed and absorbs the bottom cards.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::domain::dealing::deal;
use crate::domain::game_transition::Transition;
use crate::domain::rules::SEATS;
use crate::domain::seed_derivation::{
    derive_deal_seed, derive_first_bidder_seed, derive_forced_landlord_seed,
};
use crate::domain::state::{
    next_seat, nth_from, require_phase, require_seat, require_turn, BidDecision, BidRecord,
    BiddingPhase, BiddingState, MultiplierState, Phase, RoundState, Seat,
};
use crate::errors::domain::{DomainError, ValidationKind};

fn random_seat(seed: u64) -> Seat {
    ChaCha20Rng::seed_from_u64(seed).random_range(0..SEATS as Seat)
}

/// Deal the first hand and open calling. Only valid while waiting.
pub fn start_game(state: &mut RoundState) -> Result<Vec<Transition>, DomainError> {
    require_phase(state, Phase::Waiting)?;
    let mut out = Vec::new();
    begin_deal(state, &mut out)?;
    Ok(out)
}

/// Shuffle and deal the next deal, then either open calling or, once
/// reshuffles are exhausted, force a landlord.
fn begin_deal(state: &mut RoundState, out: &mut Vec<Transition>) -> Result<(), DomainError> {
    state.deal_no += 1;
    let dealt = deal(derive_deal_seed(state.seed, state.deal_no))?;
    state.hands = dealt.hands;
    state.bottom = dealt.bottom;
    state.revealed_bottom.clear();
    state.landlord = None;
    state.multiplier = None;
    state.play = None;

    if state.reshuffles > 0 && state.reshuffles >= state.max_reshuffles {
        out.push(Transition::DealStarted {
            deal_no: state.deal_no,
            first_bidder: None,
        });
        return force_landlord(state, out);
    }

    let first = random_seat(derive_first_bidder_seed(state.seed, state.deal_no));
    state.bidding = Some(BiddingState::new(first));
    state.phase = Phase::Bidding;
    info!(deal_no = state.deal_no, first_bidder = first, "Deal started");
    out.push(Transition::DealStarted {
        deal_no: state.deal_no,
        first_bidder: Some(first),
    });
    Ok(())
}

fn force_landlord(state: &mut RoundState, out: &mut Vec<Transition>) -> Result<(), DomainError> {
    let seat = random_seat(derive_forced_landlord_seed(state.seed, state.deal_no));
    let mut bidding = BiddingState::new(seat);
    bidding.phase = BiddingPhase::Finished;
    bidding.candidate = Some(seat);
    bidding.current = None;
    state.bidding = Some(bidding);
    state.forced_landlord = true;
    info!(
        deal_no = state.deal_no,
        reshuffles = state.reshuffles,
        seat,
        "Reshuffles exhausted; forcing landlord"
    );
    out.push(Transition::ForcedLandlord {
        seat,
        deal_no: state.deal_no,
    });
    confirm_landlord(state, seat, out)
}

/// Hand the bottom cards to `seat` and open the multiplier phase.
fn confirm_landlord(
    state: &mut RoundState,
    seat: Seat,
    out: &mut Vec<Transition>,
) -> Result<(), DomainError> {
    require_seat(seat)?;
    let bottom = std::mem::take(&mut state.bottom);
    let hand = &mut state.hands[seat as usize];
    hand.extend(bottom.iter().copied());
    hand.sort();
    state.revealed_bottom = bottom.clone();
    state.landlord = Some(seat);
    if let Some(b) = state.bidding.as_mut() {
        b.phase = BiddingPhase::Finished;
        b.current = None;
        b.candidate = Some(seat);
    }
    state.multiplier = Some(MultiplierState::new(seat));
    state.phase = Phase::Multiplier;
    info!(landlord = seat, deal_no = state.deal_no, "Landlord confirmed");
    out.push(Transition::LandlordConfirmed {
        landlord: seat,
        bottom,
    });
    Ok(())
}

/// Decisions `seat` may submit right now, empty if it is not their turn.
pub fn legal_bids(state: &RoundState, seat: Seat) -> Vec<BidDecision> {
    let Some(b) = state.bidding.as_ref() else {
        return Vec::new();
    };
    if state.phase != Phase::Bidding || b.current != Some(seat) {
        return Vec::new();
    }
    match b.phase {
        BiddingPhase::Calling => vec![BidDecision::Call, BidDecision::Pass],
        BiddingPhase::Grabbing => vec![BidDecision::Grab, BidDecision::Pass],
        BiddingPhase::Finished => Vec::new(),
    }
}

/// Record a calling/grabbing decision.
///
/// Guards, in order: phase, decision fits the sub-phase, caller never
/// re-decides while grabbing, one decision per seat per sub-phase, turn.
/// Any rejection leaves `state` untouched.
pub fn submit_bid(
    state: &mut RoundState,
    seat: Seat,
    decision: BidDecision,
) -> Result<Vec<Transition>, DomainError> {
    require_seat(seat)?;
    require_phase(state, Phase::Bidding)?;
    let bidding = state.bidding.as_ref().ok_or_else(|| {
        DomainError::validation_other("Invariant violated: bidding state must be set (submit_bid)")
    })?;
    let sub_phase = bidding.phase;

    match (sub_phase, decision) {
        (BiddingPhase::Calling, BidDecision::Call | BidDecision::Pass) => {}
        (BiddingPhase::Grabbing, BidDecision::Grab | BidDecision::Pass) => {}
        (BiddingPhase::Finished, _) => {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "Bidding already finished",
            ))
        }
        (phase, decision) => {
            return Err(DomainError::validation(
                ValidationKind::InvalidDecision,
                format!("{decision:?} is not allowed while {phase:?}"),
            ))
        }
    }
    if sub_phase == BiddingPhase::Grabbing && bidding.caller == Some(seat) {
        return Err(DomainError::validation(
            ValidationKind::CallerCannotGrab,
            format!("Seat {seat} called and cannot grab"),
        ));
    }
    if bidding.has_decided(seat, sub_phase) {
        return Err(DomainError::validation(
            ValidationKind::DuplicateDecision,
            format!("Seat {seat} already decided during {sub_phase:?}"),
        ));
    }
    require_turn(bidding.current, seat, "submit_bid")?;

    let mut out = Vec::new();
    let bidding = state.bidding.as_mut().ok_or_else(|| {
        DomainError::validation_other("Invariant violated: bidding state must be set (submit_bid)")
    })?;
    let seq = bidding.records.len() as u16;
    bidding.records.push(BidRecord {
        seat,
        decision,
        phase: sub_phase,
        seq,
    });
    debug!(seat, decision = ?decision, phase = ?sub_phase, "Bid recorded");
    out.push(Transition::BidPlaced {
        seat,
        decision,
        phase: sub_phase,
    });

    match (sub_phase, decision) {
        (BiddingPhase::Calling, BidDecision::Call) => {
            bidding.phase = BiddingPhase::Grabbing;
            bidding.caller = Some(seat);
            bidding.candidate = Some(seat);
            bidding.current = Some(next_seat(seat));
            info!(caller = seat, "Grabbing started");
            out.push(Transition::GrabbingStarted { caller: seat });
        }
        (BiddingPhase::Calling, _) => {
            if bidding.decided_count(BiddingPhase::Calling) >= SEATS {
                handle_all_pass(state, &mut out)?;
            } else {
                bidding.current = Some(next_seat(seat));
            }
        }
        (BiddingPhase::Grabbing, _) => {
            if decision == BidDecision::Grab {
                bidding.candidate = Some(seat);
            }
            let caller = bidding.caller;
            let next = (1..SEATS as u8)
                .map(|i| nth_from(seat, i))
                .find(|s| Some(*s) != caller && !bidding.has_decided(*s, BiddingPhase::Grabbing));
            match next {
                Some(s) => bidding.current = Some(s),
                None => {
                    let landlord = bidding.candidate.ok_or_else(|| {
                        DomainError::validation_other(
                            "Invariant violated: candidate must be set after grabbing",
                        )
                    })?;
                    confirm_landlord(state, landlord, &mut out)?;
                }
            }
        }
        (BiddingPhase::Finished, _) => {}
    }
    Ok(out)
}

fn handle_all_pass(state: &mut RoundState, out: &mut Vec<Transition>) -> Result<(), DomainError> {
    state.reshuffles = state.reshuffles.saturating_add(1);
    info!(
        deal_no = state.deal_no,
        reshuffles = state.reshuffles,
        "Everyone passed; reshuffling"
    );
    out.push(Transition::Reshuffled {
        reshuffles: state.reshuffles,
    });
    begin_deal(state, out)
}
