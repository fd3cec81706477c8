// Proptest generators for domain types.
// Card sets are drawn from a shuffled deck so they never contain duplicates.

use proptest::prelude::*;

use crate::domain::bidding::start_game;
use crate::domain::dealing::full_deck;
use crate::domain::state::RoundState;
use crate::domain::Card;

/// A full 54-card deck in random order.
pub fn shuffled_deck() -> impl Strategy<Value = Vec<Card>> {
    Just(full_deck()).prop_shuffle()
}

/// `min..=max` distinct cards.
pub fn card_set(min: usize, max: usize) -> impl Strategy<Value = Vec<Card>> {
    (shuffled_deck(), min..=max).prop_map(|(deck, n)| {
        let mut cards: Vec<Card> = deck.into_iter().take(n).collect();
        cards.sort();
        cards
    })
}

/// Small hands biased towards repeated ranks, so pairs, triples and bombs
/// show up often. Draws from a reduced rank range.
pub fn dense_hand(max: usize) -> impl Strategy<Value = Vec<Card>> {
    let pool: Vec<Card> = full_deck()
        .into_iter()
        .filter(|c| c.value() <= 8 || c.rank.is_joker())
        .collect();
    (Just(pool).prop_shuffle(), 1..=max).prop_map(|(pool, n)| {
        let mut cards: Vec<Card> = pool.into_iter().take(n).collect();
        cards.sort();
        cards
    })
}

/// A game that has been dealt and is waiting on the first bidder.
pub fn started_game() -> impl Strategy<Value = RoundState> {
    any::<u64>().prop_map(|seed| {
        let mut s = RoundState::new(seed);
        start_game(&mut s).expect("fresh state starts");
        s
    })
}
