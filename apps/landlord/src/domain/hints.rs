//! Legal play enumeration.
//!
//! Enumeration works on rank structure, not on card subsets: the hand is
//! grouped by rank and each pattern category is scanned as a template over
//! the rank counts. Every candidate is re-checked through [`classify`] and
//! [`beats`], so templates only need to be complete, not exact.
//!
//! Results hold one pattern per distinct rank combination (suits are picked
//! lowest-first) and are ordered by ascending weight.

use std::collections::BTreeSet;

use super::cards_types::{Card, Rank};
use super::compare::beats;
use super::patterns::{
    classify, Pattern, PatternKind, RankCounts, MIN_AIRPLANE_LEN, MIN_PAIR_STRAIGHT_LEN,
    MIN_STRAIGHT_LEN,
};

/// Cards taken per rank value (index 3..=17).
type Takes = [u8; 18];

/// All plays from `hand` that may follow `last`, or every recognised
/// pattern when leading (`last == None`). Ascending by weight.
pub fn legal_plays(hand: &[Card], last: Option<&Pattern>) -> Vec<Pattern> {
    let counts = RankCounts::of(hand);
    let mut takes: Vec<Takes> = Vec::new();

    match last.map(|p| p.kind) {
        None => {
            for kind in TEMPLATE_KINDS {
                takes.extend(templates_for(kind, &counts));
            }
        }
        Some(kind) => {
            takes.extend(templates_for(kind, &counts));
            if kind != PatternKind::Bomb {
                takes.extend(templates_for(PatternKind::Bomb, &counts));
            }
            if kind != PatternKind::Rocket {
                takes.extend(templates_for(PatternKind::Rocket, &counts));
            }
        }
    }

    let mut seen: BTreeSet<Takes> = BTreeSet::new();
    let mut plays: Vec<Pattern> = Vec::new();
    for take in takes {
        if !seen.insert(take) {
            continue;
        }
        let cards = materialize(hand, &take);
        let pattern = classify(&cards);
        if !pattern.is_valid() {
            continue;
        }
        if let Some(last) = last {
            if !beats(&pattern, last) {
                continue;
            }
        }
        plays.push(pattern);
    }
    sort_plays(&mut plays);
    plays
}

/// Up to `limit` suggestions, weakest first.
pub fn hints(hand: &[Card], last: Option<&Pattern>, limit: usize) -> Vec<Pattern> {
    let mut plays = legal_plays(hand, last);
    plays.truncate(limit);
    plays
}

pub(crate) fn sort_plays(plays: &mut [Pattern]) {
    plays.sort_by(|a, b| {
        a.weight
            .cmp(&b.weight)
            .then(a.kind.cmp(&b.kind))
            .then(a.len().cmp(&b.len()))
            .then_with(|| a.rank_signature().cmp(&b.rank_signature()))
    });
}

const TEMPLATE_KINDS: [PatternKind; 12] = [
    PatternKind::Single,
    PatternKind::Pair,
    PatternKind::Triple,
    PatternKind::TripleWithSingle,
    PatternKind::TripleWithPair,
    PatternKind::Straight,
    PatternKind::PairStraight,
    PatternKind::Airplane,
    PatternKind::AirplaneWithWings,
    PatternKind::FourWithTwo,
    PatternKind::Bomb,
    PatternKind::Rocket,
];

fn templates_for(kind: PatternKind, counts: &RankCounts) -> Vec<Takes> {
    match kind {
        PatternKind::Single => groups_of(counts, 1),
        PatternKind::Pair => groups_of(counts, 2),
        PatternKind::Triple => groups_of(counts, 3),
        PatternKind::Bomb => groups_of(counts, 4),
        PatternKind::Rocket => rocket(counts),
        PatternKind::TripleWithSingle => triple_with(counts, 1),
        PatternKind::TripleWithPair => triple_with(counts, 2),
        PatternKind::Straight => chains(counts, 1, MIN_STRAIGHT_LEN),
        PatternKind::PairStraight => chains(counts, 2, MIN_PAIR_STRAIGHT_LEN),
        PatternKind::Airplane => chains(counts, 3, MIN_AIRPLANE_LEN),
        PatternKind::AirplaneWithWings => airplane_with_wings(counts),
        PatternKind::FourWithTwo => four_with_two(counts),
        PatternKind::Invalid => Vec::new(),
    }
}

fn single_take(value: u8, n: u8) -> Takes {
    let mut t = [0u8; 18];
    t[value as usize] = n;
    t
}

fn groups_of(counts: &RankCounts, size: u8) -> Vec<Takes> {
    counts
        .present()
        .filter(|(_, c)| *c >= size)
        .map(|(v, _)| single_take(v, size))
        .collect()
}

fn rocket(counts: &RankCounts) -> Vec<Takes> {
    let small = Rank::SmallJoker.value();
    let big = Rank::BigJoker.value();
    if counts.get(small) == 1 && counts.get(big) == 1 {
        let mut t = single_take(small, 1);
        t[big as usize] = 1;
        vec![t]
    } else {
        Vec::new()
    }
}

fn triple_with(counts: &RankCounts, kicker: u8) -> Vec<Takes> {
    let mut out = Vec::new();
    for (t, tc) in counts.present() {
        if tc < 3 {
            continue;
        }
        for (k, kc) in counts.present() {
            if k != t && kc >= kicker {
                let mut take = single_take(t, 3);
                take[k as usize] = kicker;
                out.push(take);
            }
        }
    }
    out
}

/// Every consecutive run of chainable ranks, each holding at least
/// `per_rank` cards, with at least `min_len` ranks.
fn chains(counts: &RankCounts, per_rank: u8, min_len: usize) -> Vec<Takes> {
    let top = Rank::Ace.value();
    let mut out = Vec::new();
    for low in 3..=top {
        let mut take = [0u8; 18];
        let mut len = 0usize;
        for v in low..=top {
            if counts.get(v) < per_rank {
                break;
            }
            take[v as usize] = per_rank;
            len += 1;
            if len >= min_len {
                out.push(take);
            }
        }
    }
    out
}

fn remaining(counts: &RankCounts, take: &Takes) -> Vec<(u8, u8)> {
    counts
        .present()
        .map(|(v, c)| (v, c - take[v as usize]))
        .filter(|(_, c)| *c > 0)
        .collect()
}

/// All ways to pick `k` units from `avail` (value, max units), as
/// (value, units) lists.
fn choose_multisets(avail: &[(u8, u8)], k: usize) -> Vec<Vec<(u8, u8)>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    let Some((&(value, max), rest)) = avail.split_first() else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for units in 0..=(max as usize).min(k) {
        for mut tail in choose_multisets(rest, k - units) {
            if units > 0 {
                tail.push((value, units as u8));
            }
            out.push(tail);
        }
    }
    out
}

fn with_kickers(base: &Takes, counts: &RankCounts, units: usize, unit_size: u8) -> Vec<Takes> {
    let avail: Vec<(u8, u8)> = remaining(counts, base)
        .into_iter()
        .map(|(v, c)| (v, c / unit_size))
        .filter(|(_, c)| *c > 0)
        .collect();
    choose_multisets(&avail, units)
        .into_iter()
        .map(|picks| {
            let mut t = *base;
            for (v, n) in picks {
                t[v as usize] += n * unit_size;
            }
            t
        })
        .collect()
}

fn airplane_with_wings(counts: &RankCounts) -> Vec<Takes> {
    let mut out = Vec::new();
    for chain in chains(counts, 3, MIN_AIRPLANE_LEN) {
        let len = chain.iter().filter(|n| **n > 0).count();
        out.extend(with_kickers(&chain, counts, len, 1));
        out.extend(with_kickers(&chain, counts, len, 2));
    }
    out
}

fn four_with_two(counts: &RankCounts) -> Vec<Takes> {
    let mut out = Vec::new();
    for quad in groups_of(counts, 4) {
        out.extend(with_kickers(&quad, counts, 2, 1));
        out.extend(with_kickers(&quad, counts, 2, 2));
    }
    out
}

/// Turn take counts into concrete cards, lowest suits first.
fn materialize(hand: &[Card], take: &Takes) -> Vec<Card> {
    let mut left = *take;
    let mut sorted = hand.to_vec();
    sorted.sort();
    sorted
        .into_iter()
        .filter(|c| {
            let slot = &mut left[c.value() as usize];
            if *slot > 0 {
                *slot -= 1;
                true
            } else {
                false
            }
        })
        .collect()
}

/// Reference enumeration over every subset. Exponential; only usable on
/// small hands.
#[cfg(test)]
pub(crate) fn brute_force_legal_plays(hand: &[Card], last: Option<&Pattern>) -> Vec<Pattern> {
    assert!(hand.len() <= 12, "brute force only for small hands");
    let mut seen: BTreeSet<Vec<u8>> = BTreeSet::new();
    let mut plays = Vec::new();
    for mask in 1u32..(1u32 << hand.len()) {
        let subset: Vec<Card> = hand
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, c)| *c)
            .collect();
        let pattern = classify(&subset);
        if !pattern.is_valid() {
            continue;
        }
        if let Some(last) = last {
            if !beats(&pattern, last) {
                continue;
            }
        }
        if seen.insert(pattern.rank_signature()) {
            plays.push(pattern);
        }
    }
    sort_plays(&mut plays);
    plays
}
