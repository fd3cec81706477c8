//! Random AI player - makes random legal moves.
//!
//! [`RandomPlayer`] is the baseline [`AiPlayer`](super::AiPlayer): it picks
//! uniformly among legal options in every phase. Seeded instances are fully
//! reproducible, which the simulator and tests rely on.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use super::trait_def::{AiError, AiPlayer};
use crate::domain::player_view::CurrentRoundInfo;
use crate::domain::state::BidDecision;
use crate::domain::Card;

/// AI that makes random legal moves.
pub struct RandomPlayer {
    /// `AiPlayer` methods take `&self`; the RNG needs interior mutability.
    rng: Mutex<StdRng>,
}

impl RandomPlayer {
    pub const NAME: &'static str = "RandomPlayer";
    pub const VERSION: &'static str = "1.0.0";

    /// `Some(seed)` for reproducible play, `None` to seed from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> Result<T, AiError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AiError::Internal(format!("RNG lock poisoned: {e}")))?;
        Ok(f(&mut rng))
    }
}

impl AiPlayer for RandomPlayer {
    fn choose_bid(&self, state: &CurrentRoundInfo) -> Result<BidDecision, AiError> {
        let legal_bids = state.legal_bids();
        if legal_bids.is_empty() {
            return Err(AiError::InvalidMove("No legal bids available".into()));
        }
        self.with_rng(|rng| legal_bids.choose(rng).copied())?
            .ok_or_else(|| AiError::Internal("Failed to choose random bid".into()))
    }

    fn choose_multiplier(&self, _state: &CurrentRoundInfo) -> Result<bool, AiError> {
        self.with_rng(|rng| rng.random_bool(0.5))
    }

    fn choose_play(&self, state: &CurrentRoundInfo) -> Result<Option<Vec<Card>>, AiError> {
        let plays = state.legal_plays();
        let can_pass = state.can_pass();
        if plays.is_empty() {
            return if can_pass {
                Ok(None)
            } else {
                Err(AiError::InvalidMove("No legal plays available".into()))
            };
        }
        // Passing counts as one more option when it is allowed.
        let options = plays.len() + usize::from(can_pass);
        let pick = self.with_rng(|rng| rng.random_range(0..options))?;
        Ok(plays.get(pick).map(|p| p.cards.clone()))
    }
}
