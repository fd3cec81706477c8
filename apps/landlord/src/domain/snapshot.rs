//! Public snapshot API for observing game state without exposing internals.

use serde::{Deserialize, Serialize};

use crate::domain::rules::SEATS;
use crate::domain::scoring::GameResult;
use crate::domain::state::{BiddingState, MultiplierState, Phase, PlayState, RoundState, Seat};
use crate::domain::Card;

/// Game-level header present in all snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameHeader {
    pub deal_no: u32,
    pub reshuffles: u8,
    pub landlord: Option<Seat>,
    pub forced_landlord: bool,
    pub hand_counts: [usize; SEATS],
    pub current_actor: Option<Seat>,
    /// Bottom cards once the landlord has taken them.
    pub bottom: Vec<Card>,
}

/// Top-level snapshot combining header and phase-specific data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game: GameHeader,
    pub phase: PhaseSnapshot,
}

/// Adjacently tagged union of phase-specific snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "data", rename_all = "snake_case")]
pub enum PhaseSnapshot {
    Waiting,
    Bidding(BiddingState),
    Multiplier(MultiplierState),
    Playing {
        multiplier: u32,
        play: PlayState,
    },
    Ended(GameResult),
}

pub fn snapshot(state: &RoundState) -> GameSnapshot {
    let game = GameHeader {
        deal_no: state.deal_no,
        reshuffles: state.reshuffles,
        landlord: state.landlord,
        forced_landlord: state.forced_landlord,
        hand_counts: state.hand_counts(),
        current_actor: state.current_actor(),
        bottom: state.revealed_bottom.clone(),
    };
    let phase = match state.phase {
        Phase::Waiting => PhaseSnapshot::Waiting,
        Phase::Bidding => state
            .bidding
            .clone()
            .map_or(PhaseSnapshot::Waiting, PhaseSnapshot::Bidding),
        Phase::Multiplier => state
            .multiplier
            .clone()
            .map_or(PhaseSnapshot::Waiting, PhaseSnapshot::Multiplier),
        Phase::Playing => match state.play.clone() {
            Some(play) => PhaseSnapshot::Playing {
                multiplier: state.multiplier.as_ref().map_or(1, |m| m.multiplier),
                play,
            },
            None => PhaseSnapshot::Waiting,
        },
        Phase::Ended => state
            .result
            .clone()
            .map_or(PhaseSnapshot::Waiting, PhaseSnapshot::Ended),
    };
    GameSnapshot { game, phase }
}
