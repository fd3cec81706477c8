use serde::{Deserialize, Serialize};

use crate::domain::patterns::Pattern;
use crate::domain::rules::{DEFAULT_MAX_RESHUFFLES, SEATS};
use crate::domain::scoring::GameResult;
use crate::domain::Card;
use crate::errors::domain::{DomainError, ValidationKind};

pub type Seat = u8; // 0..=2

/// Overall game progression phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Session created, nothing dealt yet.
    Waiting,
    /// Calling or grabbing for the landlord role; see `BiddingState::phase`.
    Bidding,
    /// Each seat, starting at the landlord, doubles or passes once.
    Multiplier,
    /// Trick play; landlord leads the first trick.
    Playing,
    /// A hand emptied; `RoundState::result` is set.
    Ended,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiddingPhase {
    Calling,
    Grabbing,
    Finished,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidDecision {
    Call,
    Grab,
    Pass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    pub seat: Seat,
    pub decision: BidDecision,
    /// Sub-phase the decision was made in.
    pub phase: BiddingPhase,
    /// Position in the deal's decision sequence (0-based).
    pub seq: u16,
}

/// Bidding for one deal. Replaced wholesale on every re-deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiddingState {
    pub phase: BiddingPhase,
    pub first_bidder: Seat,
    /// Seat that opened grabbing with `call`.
    pub caller: Option<Seat>,
    /// Current landlord candidate (caller, then the latest grabber).
    pub candidate: Option<Seat>,
    /// Seat whose decision is pending.
    pub current: Option<Seat>,
    pub records: Vec<BidRecord>,
}

impl BiddingState {
    pub fn new(first_bidder: Seat) -> Self {
        Self {
            phase: BiddingPhase::Calling,
            first_bidder,
            caller: None,
            candidate: None,
            current: Some(first_bidder),
            records: Vec::new(),
        }
    }

    pub fn has_decided(&self, seat: Seat, phase: BiddingPhase) -> bool {
        self.records
            .iter()
            .any(|r| r.seat == seat && r.phase == phase)
    }

    pub fn decided_count(&self, phase: BiddingPhase) -> usize {
        self.records.iter().filter(|r| r.phase == phase).count()
    }

    /// Whether anyone grabbed during this deal.
    pub fn grabbed(&self) -> bool {
        self.records.iter().any(|r| r.decision == BidDecision::Grab)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierRecord {
    pub seat: Seat,
    pub doubled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierState {
    pub multiplier: u32,
    pub records: Vec<MultiplierRecord>,
    pub decided: [bool; SEATS],
    pub current: Option<Seat>,
}

impl MultiplierState {
    pub fn new(start: Seat) -> Self {
        Self {
            multiplier: 1,
            records: Vec::new(),
            decided: [false; SEATS],
            current: Some(start),
        }
    }

    pub fn all_decided(&self) -> bool {
        self.decided.iter().all(|d| *d)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayAction {
    Play { pattern: Pattern },
    Pass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub seat: Seat,
    pub action: PlayAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayState {
    /// Pattern to beat; `None` when the current seat leads freely.
    pub last_pattern: Option<Pattern>,
    /// Seat that made `last_pattern`.
    pub last_player: Option<Seat>,
    /// Every play and pass of the game, in order.
    pub history: Vec<PlayRecord>,
    pub current: Seat,
    /// Seats that passed since the last actual play.
    pub passed_since_play: Vec<Seat>,
    pub tricks_completed: u16,
}

impl PlayState {
    pub fn new(leader: Seat) -> Self {
        Self {
            last_pattern: None,
            last_player: None,
            history: Vec::new(),
            current: leader,
            passed_since_play: Vec::new(),
            tricks_completed: 0,
        }
    }
}

/// Entire game container, sufficient for pure domain operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: Phase,
    /// Base seed; every random choice derives from it.
    pub seed: u64,
    /// 1-based deal counter, 0 before the first deal.
    pub deal_no: u32,
    /// Automatic reshuffles performed so far in this game.
    pub reshuffles: u8,
    /// Reshuffles allowed before the landlord is assigned at random.
    pub max_reshuffles: u8,
    pub hands: [Vec<Card>; SEATS],
    /// Face-down cards; empty once the landlord absorbs them.
    pub bottom: Vec<Card>,
    /// Bottom cards as revealed to everyone on landlord confirmation.
    pub revealed_bottom: Vec<Card>,
    pub landlord: Option<Seat>,
    /// Landlord was assigned at random after reshuffles ran out.
    pub forced_landlord: bool,
    pub bidding: Option<BiddingState>,
    pub multiplier: Option<MultiplierState>,
    pub play: Option<PlayState>,
    pub result: Option<GameResult>,
}

impl RoundState {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: Phase::Waiting,
            seed,
            deal_no: 0,
            reshuffles: 0,
            max_reshuffles: DEFAULT_MAX_RESHUFFLES,
            hands: Default::default(),
            bottom: Vec::new(),
            revealed_bottom: Vec::new(),
            landlord: None,
            forced_landlord: false,
            bidding: None,
            multiplier: None,
            play: None,
            result: None,
        }
    }

    pub fn with_max_reshuffles(mut self, max_reshuffles: u8) -> Self {
        self.max_reshuffles = max_reshuffles;
        self
    }

    /// Seat whose decision is outstanding, if any.
    pub fn current_actor(&self) -> Option<Seat> {
        match self.phase {
            Phase::Bidding => self.bidding.as_ref().and_then(|b| b.current),
            Phase::Multiplier => self.multiplier.as_ref().and_then(|m| m.current),
            Phase::Playing => self.play.as_ref().map(|p| p.current),
            Phase::Waiting | Phase::Ended => None,
        }
    }

    pub fn hand(&self, seat: Seat) -> &[Card] {
        &self.hands[seat as usize % SEATS]
    }

    pub fn hand_counts(&self) -> [usize; SEATS] {
        [self.hands[0].len(), self.hands[1].len(), self.hands[2].len()]
    }

    pub fn is_landlord(&self, seat: Seat) -> bool {
        self.landlord == Some(seat)
    }

    /// Number of cards across hands and bottom.
    pub fn cards_in_play(&self) -> usize {
        self.hands.iter().map(Vec::len).sum::<usize>() + self.bottom.len()
    }
}

/// Seat / turn math helpers (3 fixed seats: 0..=2).
///
/// Clockwise direction is positive (+1).
#[inline]
pub fn seat_offset(seat: Seat, delta: i8) -> Seat {
    ((seat as i16 + delta as i16).rem_euclid(SEATS as i16)) as Seat
}

/// Returns the next seat clockwise (0 → 1 → 2 → 0).
#[inline]
pub fn next_seat(seat: Seat) -> Seat {
    seat_offset(seat, 1)
}

#[inline]
pub fn prev_seat(seat: Seat) -> Seat {
    seat_offset(seat, -1)
}

/// Returns the seat `n` steps clockwise from `start`.
#[inline]
pub fn nth_from(start: Seat, n: u8) -> Seat {
    seat_offset(start, (n as usize % SEATS) as i8)
}

#[inline]
pub fn is_valid_seat(seat: Seat) -> bool {
    (seat as usize) < SEATS
}

pub fn require_phase(state: &RoundState, expected: Phase) -> Result<(), DomainError> {
    if state.phase == expected {
        Ok(())
    } else {
        Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("Phase mismatch: expected {expected:?}, in {:?}", state.phase),
        ))
    }
}

pub fn require_seat(seat: Seat) -> Result<(), DomainError> {
    if is_valid_seat(seat) {
        Ok(())
    } else {
        Err(DomainError::validation_other(format!("No such seat: {seat}")))
    }
}

/// Reject unless `seat` is the pending decider.
pub fn require_turn(current: Option<Seat>, seat: Seat, ctx: &'static str) -> Result<(), DomainError> {
    let Some(current) = current else {
        return Err(DomainError::validation_other(format!(
            "Invariant violated: current decider must be set ({ctx})"
        )));
    };
    if current != seat {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            format!("Out of turn: seat {seat} acted while seat {current} decides ({ctx})"),
        ));
    }
    Ok(())
}

pub fn require_landlord(state: &RoundState, ctx: &'static str) -> Result<Seat, DomainError> {
    state.landlord.ok_or_else(|| {
        DomainError::validation_other(format!("Invariant violated: landlord must be set ({ctx})"))
    })
}
