//! AI player trait definition.

use std::fmt;

use crate::domain::player_view::CurrentRoundInfo;
use crate::domain::state::BidDecision;
use crate::domain::Card;

/// Errors that can occur during AI decision-making.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    /// AI failed to make a decision within timeout
    Timeout,
    /// AI encountered an internal error
    Internal(String),
    /// AI produced an invalid move
    InvalidMove(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::Timeout => write!(f, "AI decision timeout"),
            AiError::Internal(msg) => write!(f, "AI internal error: {msg}"),
            AiError::InvalidMove(msg) => write!(f, "AI invalid move: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

/// Trait for AI players.
///
/// Implementations receive the round as visible to their seat and must pick
/// a legal action. Legal options come from the view helpers
/// (`legal_bids()`, `legal_plays()`, `can_pass()`), never from raw state.
pub trait AiPlayer: Send + Sync {
    /// Call, grab or pass, depending on the bidding sub-phase.
    fn choose_bid(&self, state: &CurrentRoundInfo) -> Result<BidDecision, AiError>;

    /// Whether to double the stake.
    fn choose_multiplier(&self, state: &CurrentRoundInfo) -> Result<bool, AiError>;

    /// Cards to play, or `None` to pass. Passing is only legal when
    /// `state.can_pass()`.
    fn choose_play(&self, state: &CurrentRoundInfo) -> Result<Option<Vec<Card>>, AiError>;
}
