//! The closed set of decisions a seat can submit, and the single entry
//! point that routes a decision to the matching phase transition.

use serde::{Deserialize, Serialize};

use crate::domain::bidding::{legal_bids, submit_bid};
use crate::domain::game_transition::Transition;
use crate::domain::multiplier::submit_multiplier;
use crate::domain::state::{BidDecision, BiddingPhase, Phase, RoundState, Seat};
use crate::domain::tricks::{can_pass, legal_moves, pass_turn, play_cards};
use crate::domain::Card;
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "cards", rename_all = "snake_case")]
pub enum Decision {
    /// Claim the landlord role while calling.
    Call,
    /// Take over the landlord candidacy while grabbing.
    Grab,
    /// Decline while calling, grabbing or at the multiplier.
    Pass,
    /// Double the stake.
    Double,
    PlayCards(Vec<Card>),
    /// Decline to beat the current trick.
    PassTurn,
}

impl Decision {
    pub fn kind_str(&self) -> &'static str {
        match self {
            Decision::Call => "call",
            Decision::Grab => "grab",
            Decision::Pass => "pass",
            Decision::Double => "double",
            Decision::PlayCards(_) => "play_cards",
            Decision::PassTurn => "pass_turn",
        }
    }
}

fn mismatch(decision: &Decision, phase: Phase) -> DomainError {
    DomainError::validation(
        ValidationKind::InvalidDecision,
        format!("{} is not a valid decision during {phase:?}", decision.kind_str()),
    )
}

/// Route `decision` to the transition for the current phase.
pub fn apply_decision(
    state: &mut RoundState,
    seat: Seat,
    decision: Decision,
) -> Result<Vec<Transition>, DomainError> {
    match state.phase {
        Phase::Bidding => {
            let bid = match decision {
                Decision::Call => BidDecision::Call,
                Decision::Grab => BidDecision::Grab,
                Decision::Pass => BidDecision::Pass,
                other => return Err(mismatch(&other, state.phase)),
            };
            submit_bid(state, seat, bid)
        }
        Phase::Multiplier => match decision {
            Decision::Double => submit_multiplier(state, seat, true),
            Decision::Pass => submit_multiplier(state, seat, false),
            other => Err(mismatch(&other, state.phase)),
        },
        Phase::Playing => match decision {
            Decision::PlayCards(cards) => play_cards(state, seat, &cards),
            Decision::PassTurn => pass_turn(state, seat),
            other => Err(mismatch(&other, state.phase)),
        },
        Phase::Waiting | Phase::Ended => Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("No decisions accepted during {:?}", state.phase),
        )),
    }
}

/// Every decision `seat` could legally submit now. Empty when it is not
/// their turn.
pub fn legal_decisions(state: &RoundState, seat: Seat) -> Vec<Decision> {
    if state.current_actor() != Some(seat) {
        return Vec::new();
    }
    match state.phase {
        Phase::Bidding => legal_bids(state, seat)
            .into_iter()
            .map(|b| match b {
                BidDecision::Call => Decision::Call,
                BidDecision::Grab => Decision::Grab,
                BidDecision::Pass => Decision::Pass,
            })
            .collect(),
        Phase::Multiplier => vec![Decision::Double, Decision::Pass],
        Phase::Playing => {
            let mut out: Vec<Decision> = legal_moves(state, seat)
                .into_iter()
                .map(|p| Decision::PlayCards(p.cards))
                .collect();
            if can_pass(state) {
                out.push(Decision::PassTurn);
            }
            out
        }
        Phase::Waiting | Phase::Ended => Vec::new(),
    }
}

/// Bidding sub-phase, if bidding is underway.
pub fn bidding_phase(state: &RoundState) -> Option<BiddingPhase> {
    (state.phase == Phase::Bidding)
        .then(|| state.bidding.as_ref().map(|b| b.phase))
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bidding::start_game;

    #[test]
    fn decisions_serialize_with_type_tag() {
        let json = serde_json::to_string(&Decision::Call).unwrap();
        assert_eq!(json, r#"{"type":"call"}"#);
        let play = Decision::PlayCards(vec![Card::small_joker(), Card::big_joker()]);
        let json = serde_json::to_string(&play).unwrap();
        assert_eq!(json, r#"{"type":"play_cards","cards":["SJ","BJ"]}"#);
        assert_eq!(serde_json::from_str::<Decision>(&json).unwrap(), play);
    }

    #[test]
    fn wrong_phase_decision_is_rejected() {
        let mut s = RoundState::new(3);
        let err = apply_decision(&mut s, 0, Decision::Call).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::PhaseMismatch));

        start_game(&mut s).unwrap();
        let seat = s.current_actor().unwrap();
        let err = apply_decision(&mut s, seat, Decision::Double).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::InvalidDecision));
        assert_eq!(bidding_phase(&s), Some(BiddingPhase::Calling));
    }

    #[test]
    fn legal_decisions_only_for_current_actor() {
        let mut s = RoundState::new(3);
        start_game(&mut s).unwrap();
        let seat = s.current_actor().unwrap();
        assert_eq!(legal_decisions(&s, seat), vec![Decision::Call, Decision::Pass]);
        assert!(legal_decisions(&s, (seat + 1) % 3).is_empty());
    }
}
