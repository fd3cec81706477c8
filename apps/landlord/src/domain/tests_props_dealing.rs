//! Property tests for dealing.
//!
//! Properties tested:
//! - every deal partitions the deck into 17/17/17 + 3
//! - dealing is deterministic in the seed
//! - shuffled decks always deal

use proptest::prelude::*;

use super::dealing::{deal, deal_from_deck, full_deck};
use super::rules::{BOTTOM_SIZE, HAND_SIZE};
use super::test_gens::shuffled_deck;
use super::test_prelude;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: hands and bottom together are exactly the deck.
    #[test]
    fn prop_deal_partitions_deck(seed in any::<u64>()) {
        let d = deal(seed).unwrap();
        let mut all = Vec::new();
        for hand in &d.hands {
            prop_assert_eq!(hand.len(), HAND_SIZE);
            prop_assert!(hand.windows(2).all(|w| w[0] < w[1]));
            all.extend(hand.iter().copied());
        }
        prop_assert_eq!(d.bottom.len(), BOTTOM_SIZE);
        all.extend(d.bottom.iter().copied());
        all.sort();
        let mut deck = full_deck();
        deck.sort();
        prop_assert_eq!(all, deck);
    }

    /// Property: the same seed deals the same cards.
    #[test]
    fn prop_deal_is_deterministic(seed in any::<u64>()) {
        prop_assert_eq!(deal(seed).unwrap(), deal(seed).unwrap());
    }

    /// Property: any permutation of the deck is dealable, round-robin.
    #[test]
    fn prop_any_permutation_deals(deck in shuffled_deck()) {
        let d = deal_from_deck(&deck).unwrap();
        prop_assert!(d.hands[0].contains(&deck[0]));
        prop_assert!(d.hands[1].contains(&deck[1]));
        prop_assert!(d.hands[2].contains(&deck[2]));
        prop_assert!(d.bottom.contains(&deck[53]));
    }
}
