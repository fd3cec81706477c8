//! Domain layer: pure game logic types and helpers.

pub mod bidding;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod compare;
pub mod dealing;
pub mod decision;
pub mod game_transition;
pub mod hints;
pub mod multiplier;
pub mod patterns;
pub mod player_view;
pub mod rules;
pub mod scoring;
pub mod seed_derivation;
pub mod snapshot;
pub mod state;
pub mod tricks;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_props_bidding;
#[cfg(test)]
mod tests_props_dealing;
#[cfg(test)]
mod tests_props_hints;
#[cfg(test)]
mod tests_props_patterns;
#[cfg(test)]
mod tests_props_tricks;
#[cfg(test)]
mod tests_scenarios;

// Re-exports for ergonomics
pub use cards_types::{Card, Rank, Suit};
pub use compare::{beats, compare, PatternOrdering};
pub use dealing::{deal, full_deck, Deal};
pub use decision::{apply_decision, legal_decisions, Decision};
pub use game_transition::Transition;
pub use hints::{hints, legal_plays};
pub use patterns::{classify, hand_strength, Pattern, PatternKind};
pub use player_view::{CurrentRoundInfo, Role};
pub use scoring::GameResult;
pub use state::{Phase, RoundState, Seat};
