//! Pattern comparison with bomb/rocket overrides.

use serde::{Deserialize, Serialize};

use super::patterns::{Pattern, PatternKind};

/// Outcome of comparing two patterns.
///
/// `Incomparable` covers every pairing the rules do not order (different
/// kind or size, or either side invalid); callers treat it as "cannot play".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternOrdering {
    Greater,
    Equal,
    Less,
    Incomparable,
}

impl PatternOrdering {
    pub fn reverse(self) -> PatternOrdering {
        match self {
            PatternOrdering::Greater => PatternOrdering::Less,
            PatternOrdering::Less => PatternOrdering::Greater,
            other => other,
        }
    }

    fn from_weights(a: u32, b: u32) -> PatternOrdering {
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => PatternOrdering::Greater,
            std::cmp::Ordering::Equal => PatternOrdering::Equal,
            std::cmp::Ordering::Less => PatternOrdering::Less,
        }
    }
}

pub fn compare(a: &Pattern, b: &Pattern) -> PatternOrdering {
    use PatternKind::{Bomb, Invalid, Rocket};

    match (a.kind, b.kind) {
        (Invalid, _) | (_, Invalid) => PatternOrdering::Incomparable,
        (Rocket, Rocket) => PatternOrdering::Equal,
        (Rocket, _) => PatternOrdering::Greater,
        (_, Rocket) => PatternOrdering::Less,
        (Bomb, Bomb) => PatternOrdering::from_weights(a.weight, b.weight),
        (Bomb, _) => PatternOrdering::Greater,
        (_, Bomb) => PatternOrdering::Less,
        (ka, kb) if ka == kb && a.len() == b.len() && a.chain_len == b.chain_len => {
            PatternOrdering::from_weights(a.weight, b.weight)
        }
        _ => PatternOrdering::Incomparable,
    }
}

/// True when `candidate` may be played on top of `last`.
#[inline]
pub fn beats(candidate: &Pattern, last: &Pattern) -> bool {
    compare(candidate, last) == PatternOrdering::Greater
}
