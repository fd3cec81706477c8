//! Observable state changes produced by the round state machine.
//!
//! Every transition function returns the ordered list of what it changed so
//! callers (session, simulator, tests) never need to diff states.

use serde::{Deserialize, Serialize};

use crate::domain::patterns::Pattern;
use crate::domain::scoring::GameResult;
use crate::domain::state::{BidDecision, BiddingPhase, Seat};
use crate::domain::Card;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transition {
    DealStarted {
        deal_no: u32,
        /// `None` when the deal skips bidding (forced landlord).
        first_bidder: Option<Seat>,
    },
    BidPlaced {
        seat: Seat,
        decision: BidDecision,
        phase: BiddingPhase,
    },
    GrabbingStarted {
        caller: Seat,
    },
    Reshuffled {
        reshuffles: u8,
    },
    ForcedLandlord {
        seat: Seat,
        deal_no: u32,
    },
    LandlordConfirmed {
        landlord: Seat,
        bottom: Vec<Card>,
    },
    MultiplierDecided {
        seat: Seat,
        doubled: bool,
        multiplier: u32,
    },
    PlayingStarted {
        leader: Seat,
    },
    CardsPlayed {
        seat: Seat,
        pattern: Pattern,
        remaining: usize,
    },
    Passed {
        seat: Seat,
    },
    TrickReset {
        leader: Seat,
    },
    GameEnded {
        result: GameResult,
    },
}

impl Transition {
    /// Short name for structured logs.
    pub fn name(&self) -> &'static str {
        match self {
            Transition::DealStarted { .. } => "deal_started",
            Transition::BidPlaced { .. } => "bid_placed",
            Transition::GrabbingStarted { .. } => "grabbing_started",
            Transition::Reshuffled { .. } => "reshuffled",
            Transition::ForcedLandlord { .. } => "forced_landlord",
            Transition::LandlordConfirmed { .. } => "landlord_confirmed",
            Transition::MultiplierDecided { .. } => "multiplier_decided",
            Transition::PlayingStarted { .. } => "playing_started",
            Transition::CardsPlayed { .. } => "cards_played",
            Transition::Passed { .. } => "passed",
            Transition::TrickReset { .. } => "trick_reset",
            Transition::GameEnded { .. } => "game_ended",
        }
    }
}
