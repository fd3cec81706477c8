//! Property tests for legal play enumeration.
//!
//! Properties tested:
//! - structural enumeration matches exhaustive subset search on small hands
//! - every suggestion is drawn from the hand, valid, and beats the last play
//! - results are ordered by ascending weight

use proptest::prelude::*;

use super::compare::beats;
use super::hints::{brute_force_legal_plays, hints, legal_plays};
use super::patterns::{classify, Pattern, PatternKind};
use super::test_gens::{card_set, dense_hand};
use super::test_prelude;

fn shapes(plays: &[Pattern]) -> Vec<(PatternKind, Vec<u8>)> {
    let mut out: Vec<_> = plays.iter().map(|p| (p.kind, p.rank_signature())).collect();
    out.sort();
    out
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: leading, the enumerator finds exactly the rank
    /// combinations an exhaustive search finds.
    #[test]
    fn prop_leading_matches_brute_force(hand in dense_hand(8)) {
        let fast = legal_plays(&hand, None);
        let slow = brute_force_legal_plays(&hand, None);
        prop_assert_eq!(shapes(&fast), shapes(&slow));
    }

    /// Property: following, the enumerator agrees with exhaustive search.
    #[test]
    fn prop_following_matches_brute_force(hand in dense_hand(8), last in dense_hand(6)) {
        let last = classify(&last);
        prop_assume!(last.is_valid());
        let fast = legal_plays(&hand, Some(&last));
        let slow = brute_force_legal_plays(&hand, Some(&last));
        prop_assert_eq!(shapes(&fast), shapes(&slow));
    }

    /// Property: suggestions on full-size hands are sound and sorted.
    #[test]
    fn prop_suggestions_are_sound(hand in card_set(1, 20), last in dense_hand(5)) {
        let last = classify(&last);
        let last = last.is_valid().then_some(last);
        let plays = legal_plays(&hand, last.as_ref());
        for p in &plays {
            prop_assert!(p.is_valid());
            prop_assert!(p.cards.iter().all(|c| hand.contains(c)));
            prop_assert_eq!(classify(&p.cards).kind, p.kind);
            if let Some(last) = last.as_ref() {
                prop_assert!(beats(p, last));
            }
        }
        prop_assert!(plays.windows(2).all(|w| w[0].weight <= w[1].weight));
        if last.is_none() {
            // A lead always has at least a single.
            prop_assert!(!plays.is_empty());
        }
    }

    /// Property: hints are a prefix of the legal plays.
    #[test]
    fn prop_hints_are_prefix(hand in card_set(1, 17), limit in 0usize..6) {
        let all = legal_plays(&hand, None);
        let some = hints(&hand, None, limit);
        prop_assert_eq!(some.len(), limit.min(all.len()));
        prop_assert_eq!(&all[..some.len()], &some[..]);
    }
}
