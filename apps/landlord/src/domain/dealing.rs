//! Deterministic deck construction, shuffling and dealing.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use super::rules::{BOTTOM_SIZE, DECK_SIZE, HAND_SIZE, SEATS};
use crate::domain::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

/// The 54-card deck in standard order: 3..2 in every suit, then the jokers.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::STANDARD {
        for rank in Rank::ALL.iter().copied().filter(|r| !r.is_joker()) {
            deck.push(Card { suit, rank });
        }
    }
    deck.push(Card::small_joker());
    deck.push(Card::big_joker());
    deck
}

/// Fisher-Yates shuffle of a fresh deck, driven by ChaCha20 for a stable
/// sequence across platforms and rand versions.
pub fn shuffled_deck(seed: u64) -> Vec<Card> {
    let mut deck = full_deck();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    deck.shuffle(&mut rng);
    deck
}

/// Result of one deal: three sorted hands plus the face-down bottom cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub hands: [Vec<Card>; SEATS],
    pub bottom: Vec<Card>,
}

/// Deal a full deck round-robin, one card to each seat in turn, until every
/// seat holds 17; the last three cards become the bottom.
pub fn deal_from_deck(deck: &[Card]) -> Result<Deal, DomainError> {
    if deck.len() != DECK_SIZE {
        return Err(DomainError::validation(
            ValidationKind::InvalidCard,
            format!("Deck must hold {DECK_SIZE} cards, got {}", deck.len()),
        ));
    }
    let mut seen = deck.to_vec();
    seen.sort();
    seen.dedup();
    if seen.len() != DECK_SIZE {
        return Err(DomainError::validation(
            ValidationKind::InvalidCard,
            "Deck contains duplicate cards",
        ));
    }

    let mut hands: [Vec<Card>; SEATS] = Default::default();
    let dealt = SEATS * HAND_SIZE;
    for (i, card) in deck[..dealt].iter().enumerate() {
        hands[i % SEATS].push(*card);
    }
    for hand in hands.iter_mut() {
        hand.sort();
    }
    let mut bottom = deck[dealt..dealt + BOTTOM_SIZE].to_vec();
    bottom.sort();

    Ok(Deal { hands, bottom })
}

/// Shuffle with `seed` and deal.
pub fn deal(seed: u64) -> Result<Deal, DomainError> {
    deal_from_deck(&shuffled_deck(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_deck_has_54_unique_cards() {
        let mut deck = full_deck();
        assert_eq!(deck.len(), 54);
        deck.sort();
        deck.dedup();
        assert_eq!(deck.len(), 54);
    }

    #[test]
    fn deal_is_deterministic() {
        assert_eq!(deal(12345).unwrap(), deal(12345).unwrap());
    }

    #[test]
    fn different_seeds_differ() {
        assert_ne!(deal(12345).unwrap(), deal(54321).unwrap());
    }

    #[test]
    fn deal_layout_is_three_by_seventeen_plus_three() {
        let d = deal(99).unwrap();
        for hand in &d.hands {
            assert_eq!(hand.len(), 17);
            let mut sorted = hand.clone();
            sorted.sort();
            assert_eq!(hand, &sorted);
        }
        assert_eq!(d.bottom.len(), 3);
    }

    #[test]
    fn deal_is_round_robin() {
        let deck = full_deck();
        let d = deal_from_deck(&deck).unwrap();
        // Unshuffled deck: seat 0 receives indices 0, 3, 6, ...
        assert!(d.hands[0].contains(&deck[0]));
        assert!(d.hands[1].contains(&deck[1]));
        assert!(d.hands[2].contains(&deck[2]));
        assert!(d.hands[0].contains(&deck[48]));
        assert_eq!(d.bottom, {
            let mut b = deck[51..].to_vec();
            b.sort();
            b
        });
    }

    #[test]
    fn rejects_short_or_duplicated_deck() {
        let deck = full_deck();
        assert!(deal_from_deck(&deck[..53]).is_err());
        let mut dup = deck.clone();
        dup[0] = dup[1];
        assert!(deal_from_deck(&dup).is_err());
    }
}
