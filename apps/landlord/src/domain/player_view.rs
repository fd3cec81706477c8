//! Player view of game state - what information is visible to one seat.

use serde::{Deserialize, Serialize};

use crate::domain::decision::{legal_decisions, Decision};
use crate::domain::patterns::Pattern;
use crate::domain::rules::SEATS;
use crate::domain::state::{
    BidDecision, BidRecord, BiddingPhase, MultiplierRecord, Phase, PlayRecord, RoundState, Seat,
};
use crate::domain::hints::legal_plays;
use crate::domain::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Landlord,
    Farmer,
    /// Landlord not decided yet.
    Undecided,
}

/// Information visible to a seat at a decision point.
///
/// This is the interface between the engine and AI players: it carries the
/// seat's own hand and everything public (counts, history, the trick to
/// beat), never other seats' cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentRoundInfo {
    pub seat: Seat,
    pub phase: Phase,
    pub bidding_phase: Option<BiddingPhase>,
    pub role: Role,
    pub landlord: Option<Seat>,
    pub hand: Vec<Card>,
    pub hand_counts: [usize; SEATS],
    pub bid_history: Vec<BidRecord>,
    pub multiplier_history: Vec<MultiplierRecord>,
    pub multiplier: u32,
    pub last_pattern: Option<Pattern>,
    pub last_player: Option<Seat>,
    pub play_history: Vec<PlayRecord>,
    /// Bottom cards once revealed.
    pub bottom: Vec<Card>,
    pub deal_no: u32,
    pub is_my_turn: bool,
}

impl CurrentRoundInfo {
    pub fn for_seat(state: &RoundState, seat: Seat) -> Self {
        let role = match state.landlord {
            Some(l) if l == seat => Role::Landlord,
            Some(_) => Role::Farmer,
            None => Role::Undecided,
        };
        let bidding = state.bidding.as_ref();
        let play = state.play.as_ref();
        Self {
            seat,
            phase: state.phase,
            bidding_phase: bidding
                .map(|b| b.phase)
                .filter(|_| state.phase == Phase::Bidding),
            role,
            landlord: state.landlord,
            hand: state.hand(seat).to_vec(),
            hand_counts: state.hand_counts(),
            bid_history: bidding.map(|b| b.records.clone()).unwrap_or_default(),
            multiplier_history: state
                .multiplier
                .as_ref()
                .map(|m| m.records.clone())
                .unwrap_or_default(),
            multiplier: state.multiplier.as_ref().map_or(1, |m| m.multiplier),
            last_pattern: play.and_then(|p| p.last_pattern.clone()),
            last_player: play.and_then(|p| p.last_player),
            play_history: play.map(|p| p.history.clone()).unwrap_or_default(),
            bottom: state.revealed_bottom.clone(),
            deal_no: state.deal_no,
            is_my_turn: state.current_actor() == Some(seat),
        }
    }

    /// Legal plays against the current trick, ascending by weight. Empty
    /// outside the playing phase.
    pub fn legal_plays(&self) -> Vec<Pattern> {
        if self.phase != Phase::Playing {
            return Vec::new();
        }
        legal_plays(&self.hand, self.last_pattern.as_ref())
    }

    /// Bids open to this seat, empty unless it is its turn to bid.
    pub fn legal_bids(&self) -> Vec<BidDecision> {
        if !self.is_my_turn {
            return Vec::new();
        }
        match self.bidding_phase {
            Some(BiddingPhase::Calling) => vec![BidDecision::Call, BidDecision::Pass],
            Some(BiddingPhase::Grabbing) => vec![BidDecision::Grab, BidDecision::Pass],
            _ => Vec::new(),
        }
    }

    /// A pass is only open when there is a play to beat.
    pub fn can_pass(&self) -> bool {
        self.phase == Phase::Playing && self.last_pattern.is_some()
    }

    pub fn legal_decisions(&self, state: &RoundState) -> Vec<Decision> {
        legal_decisions(state, self.seat)
    }

    /// Whether the seat that made the last play is on this seat's side.
    pub fn last_play_by_partner(&self) -> bool {
        match (self.last_player, self.landlord) {
            (Some(last), Some(landlord)) if last != self.seat => {
                last != landlord && self.seat != landlord
            }
            _ => false,
        }
    }

    /// Smallest hand among opponents.
    pub fn min_opponent_cards(&self) -> usize {
        (0..SEATS as Seat)
            .filter(|s| *s != self.seat)
            .filter(|s| match (self.role, self.landlord) {
                // Farmers only fear the landlord.
                (Role::Farmer, Some(l)) => *s == l,
                _ => true,
            })
            .map(|s| self.hand_counts[s as usize])
            .min()
            .unwrap_or(0)
    }

    /// Passes recorded so far in the calling sub-phase.
    pub fn calling_passes(&self) -> usize {
        self.bid_history
            .iter()
            .filter(|r| r.phase == BiddingPhase::Calling && r.decision == BidDecision::Pass)
            .count()
    }
}
