//! Static table of the bundled AI players.
//!
//! New players get an entry here with a stable `name` and `version`; the
//! conformance suite plays every entry through complete games.

use crate::ai::{AiPlayer, Heuristic, RandomPlayer};

pub struct AiFactory {
    pub name: &'static str,
    pub version: &'static str,
    /// Build a player; `seed` makes its choices reproducible.
    pub make: fn(seed: Option<u64>) -> Box<dyn AiPlayer + Send + Sync>,
}

static BUNDLED: [AiFactory; 2] = [
    AiFactory {
        name: Heuristic::NAME,
        version: Heuristic::VERSION,
        make: |seed| Box::new(Heuristic::new(seed)),
    },
    AiFactory {
        name: RandomPlayer::NAME,
        version: RandomPlayer::VERSION,
        make: |seed| Box::new(RandomPlayer::new(seed)),
    },
];

pub fn registered_ais() -> &'static [AiFactory] {
    &BUNDLED
}

/// Case-insensitive lookup, so `"heuristic"` and `"Heuristic"` both resolve.
pub fn by_name(name: &str) -> Option<&'static AiFactory> {
    BUNDLED.iter().find(|f| f.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = registered_ais().iter().map(|f| f.name.to_lowercase()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), registered_ais().len());
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(by_name("randomplayer").map(|f| f.name), Some(RandomPlayer::NAME));
        assert_eq!(by_name("HEURISTIC").map(|f| f.name), Some(Heuristic::NAME));
        assert!(by_name("minimax").is_none());
    }

    #[test]
    fn factories_build_players() {
        for factory in registered_ais() {
            let _player = (factory.make)(Some(7));
        }
    }
}
