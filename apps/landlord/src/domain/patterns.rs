//! Card pattern classification.
//!
//! `classify` maps any set of cards to exactly one [`PatternKind`] together
//! with a comparison weight. It never fails: shapes the rules do not
//! recognise come back as [`PatternKind::Invalid`] with weight 0.
//!
//! Weights:
//! - runs (straight, pair straight, airplane) weigh their lowest chain rank;
//! - combos with kickers (triple with single/pair, four with two, airplane
//!   with wings) weigh their main rank, never a kicker;
//! - bombs weigh `BOMB_OFFSET + rank`, above every non-bomb weight;
//! - the rocket weighs `ROCKET_WEIGHT`, the absolute maximum.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cards_types::{Card, Rank};

/// Added to a bomb's rank so every bomb outweighs every ordinary pattern.
pub const BOMB_OFFSET: u32 = 100;
/// Rocket sentinel weight.
pub const ROCKET_WEIGHT: u32 = 1000;

/// Minimum distinct ranks in a plain straight.
pub const MIN_STRAIGHT_LEN: usize = 5;
/// Minimum distinct ranks in a pair straight.
pub const MIN_PAIR_STRAIGHT_LEN: usize = 3;
/// Minimum consecutive triples in an airplane.
pub const MIN_AIRPLANE_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Single,
    Pair,
    Triple,
    TripleWithSingle,
    TripleWithPair,
    Straight,
    PairStraight,
    Airplane,
    /// Airplane carrying one single or one pair per triple.
    AirplaneWithWings,
    FourWithTwo,
    Bomb,
    Rocket,
    Invalid,
}

impl PatternKind {
    pub fn is_bomb_or_rocket(self) -> bool {
        matches!(self, PatternKind::Bomb | PatternKind::Rocket)
    }
}

/// A classified card set. Recomputed from cards on demand; never stored on
/// its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub kind: PatternKind,
    /// The cards, sorted.
    pub cards: Vec<Card>,
    pub weight: u32,
    /// Rank the weight derives from: the lowest chain rank for runs, the
    /// triple/quad rank for kicker combos. `None` for invalid sets.
    pub main_rank: Option<Rank>,
    /// Distinct ranks in the chain for runs and airplanes, 1 otherwise,
    /// 0 for invalid sets.
    pub chain_len: u8,
}

impl Pattern {
    pub fn invalid(cards: &[Card]) -> Pattern {
        let mut cards = cards.to_vec();
        cards.sort();
        Pattern {
            kind: PatternKind::Invalid,
            cards,
            weight: 0,
            main_rank: None,
            chain_len: 0,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.kind != PatternKind::Invalid
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Rank values of the cards, sorted ascending. Two patterns with the
    /// same signature differ only in suits.
    pub fn rank_signature(&self) -> Vec<u8> {
        let mut v: Vec<u8> = self.cards.iter().map(Card::value).collect();
        v.sort_unstable();
        v
    }

    /// Human readable label, e.g. "pair of 7", "straight 3-7", "rocket".
    pub fn describe(&self) -> String {
        let main = self.main_rank.map(Rank::label).unwrap_or("?");
        let top = self
            .main_rank
            .and_then(|r| Rank::from_value(r.value() + self.chain_len.saturating_sub(1)))
            .map(Rank::label)
            .unwrap_or("?");
        match self.kind {
            PatternKind::Single => format!("single {main}"),
            PatternKind::Pair => format!("pair of {main}"),
            PatternKind::Triple => format!("triple of {main}"),
            PatternKind::TripleWithSingle => format!("triple {main} with single"),
            PatternKind::TripleWithPair => format!("triple {main} with pair"),
            PatternKind::Straight => format!("straight {main}-{top}"),
            PatternKind::PairStraight => format!("pair straight {main}-{top}"),
            PatternKind::Airplane => format!("airplane {main}-{top}"),
            PatternKind::AirplaneWithWings => {
                let wing = if self.cards.len() == self.chain_len as usize * 5 {
                    "pairs"
                } else {
                    "singles"
                };
                format!("airplane {main}-{top} with {wing}")
            }
            PatternKind::FourWithTwo => format!("four {main} with two"),
            PatternKind::Bomb => format!("bomb of {main}"),
            PatternKind::Rocket => "rocket".to_string(),
            PatternKind::Invalid => "invalid".to_string(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Multiplicity of each rank value (index 3..=17) in a card set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RankCounts([u8; 18]);

impl RankCounts {
    pub(crate) fn of(cards: &[Card]) -> RankCounts {
        let mut counts = [0u8; 18];
        for c in cards {
            counts[c.value() as usize] += 1;
        }
        RankCounts(counts)
    }

    #[inline]
    pub(crate) fn get(&self, value: u8) -> u8 {
        self.0.get(value as usize).copied().unwrap_or(0)
    }

    /// (value, count) for every rank present, ascending.
    pub(crate) fn present(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        (3u8..=17).filter_map(move |v| {
            let c = self.get(v);
            (c > 0).then_some((v, c))
        })
    }

    fn distinct(&self) -> usize {
        self.present().count()
    }

    fn all_have(&self, count: u8) -> bool {
        self.present().all(|(_, c)| c == count)
    }

    /// Ranks present form one consecutive chain inside 3..=A.
    fn present_form_chain(&self) -> Option<(u8, usize)> {
        let values: Vec<u8> = self.present().map(|(v, _)| v).collect();
        let first = *values.first()?;
        let last = *values.last()?;
        let chainable = last < Rank::Two.value();
        let consecutive = (last - first) as usize + 1 == values.len();
        (chainable && consecutive).then_some((first, values.len()))
    }
}

fn rank(value: u8) -> Option<Rank> {
    Rank::from_value(value)
}

fn make(kind: PatternKind, cards: &[Card], weight: u32, main_value: u8, chain_len: usize) -> Pattern {
    let mut sorted = cards.to_vec();
    sorted.sort();
    Pattern {
        kind,
        cards: sorted,
        weight,
        main_rank: rank(main_value),
        chain_len: chain_len as u8,
    }
}

/// Classify a card set. Total: never panics, invalid shapes get weight 0.
pub fn classify(cards: &[Card]) -> Pattern {
    let n = cards.len();
    if n == 0 {
        return Pattern::invalid(cards);
    }
    let mut unique = cards.to_vec();
    unique.sort();
    unique.dedup();
    if unique.len() != n {
        return Pattern::invalid(cards);
    }

    let counts = RankCounts::of(cards);
    let classified = match n {
        1 => classify_single(cards),
        2 => classify_two(cards, &counts),
        3 => classify_three(cards, &counts),
        4 => classify_four(cards, &counts),
        5 => classify_five(cards, &counts),
        _ => classify_long(cards, &counts),
    };
    classified.unwrap_or_else(|| Pattern::invalid(cards))
}

fn classify_single(cards: &[Card]) -> Option<Pattern> {
    let v = cards[0].value();
    Some(make(PatternKind::Single, cards, v as u32, v, 1))
}

fn classify_two(cards: &[Card], counts: &RankCounts) -> Option<Pattern> {
    if counts.get(Rank::SmallJoker.value()) == 1 && counts.get(Rank::BigJoker.value()) == 1 {
        return Some(make(
            PatternKind::Rocket,
            cards,
            ROCKET_WEIGHT,
            Rank::BigJoker.value(),
            1,
        ));
    }
    let (v, c) = counts.present().next()?;
    (c == 2).then(|| make(PatternKind::Pair, cards, v as u32, v, 1))
}

fn classify_three(cards: &[Card], counts: &RankCounts) -> Option<Pattern> {
    let (v, c) = counts.present().next()?;
    (c == 3).then(|| make(PatternKind::Triple, cards, v as u32, v, 1))
}

fn classify_four(cards: &[Card], counts: &RankCounts) -> Option<Pattern> {
    let mut groups: Vec<(u8, u8)> = counts.present().collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    match groups.as_slice() {
        [(v, 4)] => Some(make(PatternKind::Bomb, cards, BOMB_OFFSET + *v as u32, *v, 1)),
        [(v, 3), (_, 1)] => Some(make(PatternKind::TripleWithSingle, cards, *v as u32, *v, 1)),
        _ => None,
    }
}

fn classify_five(cards: &[Card], counts: &RankCounts) -> Option<Pattern> {
    if let Some(p) = straight(cards, counts) {
        return Some(p);
    }
    let mut groups: Vec<(u8, u8)> = counts.present().collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    match groups.as_slice() {
        [(v, 3), (_, 2)] => Some(make(PatternKind::TripleWithPair, cards, *v as u32, *v, 1)),
        _ => None,
    }
}

fn classify_long(cards: &[Card], counts: &RankCounts) -> Option<Pattern> {
    pair_straight(cards, counts)
        .or_else(|| airplane(cards, counts))
        .or_else(|| straight(cards, counts))
        .or_else(|| four_with_two(cards, counts))
}

fn straight(cards: &[Card], counts: &RankCounts) -> Option<Pattern> {
    if cards.len() < MIN_STRAIGHT_LEN || !counts.all_have(1) {
        return None;
    }
    let (low, len) = counts.present_form_chain()?;
    Some(make(PatternKind::Straight, cards, low as u32, low, len))
}

fn pair_straight(cards: &[Card], counts: &RankCounts) -> Option<Pattern> {
    if !counts.all_have(2) || counts.distinct() < MIN_PAIR_STRAIGHT_LEN {
        return None;
    }
    let (low, len) = counts.present_form_chain()?;
    Some(make(PatternKind::PairStraight, cards, low as u32, low, len))
}

/// Airplane detection. Chains are tried longest first, then highest base,
/// and the first chain whose leftover cards form a legal wing set wins.
fn airplane(cards: &[Card], counts: &RankCounts) -> Option<Pattern> {
    let n = cards.len();
    let max_len = n / 3;
    for len in (MIN_AIRPLANE_LEN..=max_len).rev() {
        let Some(highest_low) = Rank::Ace.value().checked_sub(len as u8 - 1) else {
            continue;
        };
        for low in (3..=highest_low).rev() {
            let chain = low..low + len as u8;
            if !chain.clone().all(|v| counts.get(v) >= 3) {
                continue;
            }
            let leftover = n - 3 * len;
            if leftover == 0 {
                return Some(make(PatternKind::Airplane, cards, low as u32, low, len));
            }
            if leftover == len {
                return Some(make(PatternKind::AirplaneWithWings, cards, low as u32, low, len));
            }
            if leftover == 2 * len {
                let wings_are_pairs = (3u8..=17).all(|v| {
                    let in_chain = if chain.contains(&v) { 3 } else { 0 };
                    (counts.get(v) - in_chain) % 2 == 0
                });
                if wings_are_pairs {
                    return Some(make(PatternKind::AirplaneWithWings, cards, low as u32, low, len));
                }
            }
        }
    }
    None
}

fn four_with_two(cards: &[Card], counts: &RankCounts) -> Option<Pattern> {
    let quads: Vec<u8> = counts.present().filter(|(_, c)| *c == 4).map(|(v, _)| v).collect();
    let [quad] = quads.as_slice() else {
        return None;
    };
    let rest: Vec<(u8, u8)> = counts.present().filter(|(v, _)| v != quad).collect();
    let ok = match cards.len() {
        6 => rest.iter().all(|(_, c)| *c == 1),
        8 => rest.iter().all(|(_, c)| *c == 2),
        _ => false,
    };
    ok.then(|| make(PatternKind::FourWithTwo, cards, *quad as u32, *quad, 1))
}

/// Heuristic strength of a hand for bidding and doubling decisions.
///
/// Each card contributes its rank value (jokers doubled, 2s at 1.5x), plus
/// bonuses: rocket 100, each bomb 50, each triple 15, each pair 5.
pub fn hand_strength(hand: &[Card]) -> f64 {
    let base: f64 = hand
        .iter()
        .map(|c| {
            let v = c.value() as f64;
            match c.rank {
                Rank::SmallJoker | Rank::BigJoker => v * 2.0,
                Rank::Two => v * 1.5,
                _ => v,
            }
        })
        .sum();

    let counts = RankCounts::of(hand);
    let mut bonus = 0.0;
    if counts.get(Rank::SmallJoker.value()) == 1 && counts.get(Rank::BigJoker.value()) == 1 {
        bonus += 100.0;
    }
    for (_, c) in counts.present() {
        bonus += match c {
            4 => 50.0,
            3 => 15.0,
            2 => 5.0,
            _ => 0.0,
        };
    }
    base + bonus
}
