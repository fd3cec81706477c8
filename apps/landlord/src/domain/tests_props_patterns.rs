//! Property tests for pattern classification and comparison.
//!
//! Properties tested:
//! - classify is total and invalid patterns carry weight 0
//! - classified cards are the input cards, sorted
//! - compare is antisymmetric and reflexive on valid patterns
//! - bombs and the rocket beat every ordinary pattern

use proptest::prelude::*;

use super::compare::{beats, compare, PatternOrdering};
use super::patterns::{classify, PatternKind};
use super::test_gens::{card_set, dense_hand};
use super::test_prelude;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: any card set classifies without panicking, and invalid
    /// results never carry weight.
    #[test]
    fn prop_classify_is_total(cards in card_set(0, 20)) {
        let p = classify(&cards);
        prop_assert_eq!(p.len(), cards.len());
        if p.is_valid() {
            prop_assert!(p.weight > 0);
        } else {
            prop_assert_eq!(p.kind, PatternKind::Invalid);
            prop_assert_eq!(p.weight, 0);
        }
        let mut sorted = cards.clone();
        sorted.sort();
        prop_assert_eq!(&p.cards, &sorted);
    }

    /// Property: swapping the arguments reverses the ordering.
    #[test]
    fn prop_compare_antisymmetric(a in dense_hand(8), b in dense_hand(8)) {
        let pa = classify(&a);
        let pb = classify(&b);
        prop_assert_eq!(compare(&pa, &pb), compare(&pb, &pa).reverse());
    }

    /// Property: a valid pattern equals itself and never beats itself.
    #[test]
    fn prop_compare_reflexive(cards in dense_hand(8)) {
        let p = classify(&cards);
        if p.is_valid() {
            prop_assert_eq!(compare(&p, &p), PatternOrdering::Equal);
            prop_assert!(!beats(&p, &p));
        } else {
            prop_assert_eq!(compare(&p, &p), PatternOrdering::Incomparable);
        }
    }

    /// Property: classification ignores input order.
    #[test]
    fn prop_classify_order_independent(cards in card_set(1, 12)) {
        let mut reversed = cards.clone();
        reversed.reverse();
        prop_assert_eq!(classify(&cards), classify(&reversed));
    }

    /// Property: a bomb or rocket beats any valid ordinary pattern.
    #[test]
    fn prop_bombs_beat_ordinary_patterns(cards in dense_hand(8), quad in 3u8..=15) {
        let p = classify(&cards);
        prop_assume!(p.is_valid() && !p.kind.is_bomb_or_rocket());
        let bomb_cards: Vec<_> = crate::domain::dealing::full_deck()
            .into_iter()
            .filter(|c| c.value() == quad)
            .collect();
        let bomb = classify(&bomb_cards);
        prop_assert_eq!(bomb.kind, PatternKind::Bomb);
        prop_assert!(beats(&bomb, &p));
        prop_assert!(!beats(&p, &bomb));
    }
}
