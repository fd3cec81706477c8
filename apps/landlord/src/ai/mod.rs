//! AI player module - handles automated game decisions.
//!
//! This module provides:
//! - `AiPlayer` trait and the built-in players (`Heuristic`, `RandomPlayer`)
//! - the decision oracle boundary (`oracle`) and its HTTP client
//! - `decide`, which turns a player's choice into a typed `Decision`

pub mod config;
mod heuristic;
pub mod http_oracle;
pub mod oracle;
mod random;
pub mod registry;
mod trait_def;

pub use config::{AiConfig, Difficulty, Personality};
pub use heuristic::{BidStrength, Heuristic};
pub use random::RandomPlayer;
use serde_json::Value as JsonValue;
pub use trait_def::{AiError, AiPlayer};

use crate::domain::decision::Decision;
use crate::domain::player_view::CurrentRoundInfo;
use crate::domain::state::{BidDecision, Phase};

/// Create an AI player from an ai_type name and optional JSON config.
///
/// Returns None if ai_type is unrecognized.
pub fn create_ai(ai_type: &str, config: Option<&JsonValue>) -> Option<Box<dyn AiPlayer + Send + Sync>> {
    let config = AiConfig::from_json(config);
    if ai_type.eq_ignore_ascii_case(Heuristic::NAME) {
        return Some(Box::new(Heuristic::seeded(config.seed(), config.personality())));
    }
    registry::by_name(ai_type).map(|factory| (factory.make)(config.seed()))
}

/// Ask `ai` for the decision the current phase needs.
pub fn decide(ai: &dyn AiPlayer, view: &CurrentRoundInfo) -> Result<Decision, AiError> {
    match view.phase {
        Phase::Bidding => Ok(match ai.choose_bid(view)? {
            BidDecision::Call => Decision::Call,
            BidDecision::Grab => Decision::Grab,
            BidDecision::Pass => Decision::Pass,
        }),
        Phase::Multiplier => Ok(if ai.choose_multiplier(view)? {
            Decision::Double
        } else {
            Decision::Pass
        }),
        Phase::Playing => Ok(match ai.choose_play(view)? {
            Some(cards) => Decision::PlayCards(cards),
            None => Decision::PassTurn,
        }),
        Phase::Waiting | Phase::Ended => Err(AiError::InvalidMove(format!(
            "No decision expected during {:?}",
            view.phase
        ))),
    }
}
