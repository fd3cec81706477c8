//! In-memory game simulator for AI evaluation.
//!
//! Drives the round state machine directly, without a session or scheduler,
//! so thousands of games run in seconds. Every AI decision still goes
//! through the domain transition functions; an illegal one is counted and
//! replaced by the first legal decision.

use landlord::ai::{decide, AiError, AiPlayer};
use landlord::domain::bidding::start_game;
use landlord::domain::decision::{apply_decision, legal_decisions};
use landlord::domain::game_transition::Transition;
use landlord::domain::player_view::CurrentRoundInfo;
use landlord::domain::rules::SEATS;
use landlord::domain::state::{RoundState, Seat};
use landlord::{DomainError, GameResult, PatternKind};

/// Decisions allowed in one game before the simulator gives up.
const MAX_DECISIONS: u32 = 1_000;

/// Tallies gathered while a game runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayCounts {
    pub decisions: u32,
    pub plays: u32,
    pub passes: u32,
    pub tricks: u32,
    pub bombs: u32,
    pub rockets: u32,
    /// AI decisions the state machine rejected.
    pub illegal_decisions: u32,
    pub plays_by_seat: [u32; SEATS],
}

/// Result of simulating a complete game.
#[derive(Debug, Clone)]
pub struct SimulatedGame {
    pub result: GameResult,
    pub reshuffles: u8,
    pub counts: PlayCounts,
    /// Cards each seat still held at the end.
    pub cards_left: [usize; SEATS],
}

pub struct Simulator {
    state: RoundState,
    counts: PlayCounts,
}

impl Simulator {
    pub fn new(seed: u64, max_reshuffles: u8) -> Self {
        Self {
            state: RoundState::new(seed).with_max_reshuffles(max_reshuffles),
            counts: PlayCounts::default(),
        }
    }

    /// Play one game to the end with `ais[seat]` deciding for each seat.
    pub fn simulate_game(
        mut self,
        ais: &[Box<dyn AiPlayer + Send + Sync>; SEATS],
    ) -> Result<SimulatedGame, SimulatorError> {
        let transitions = start_game(&mut self.state).map_err(SimulatorError::Domain)?;
        self.tally(&transitions);

        while let Some(seat) = self.state.current_actor() {
            if self.counts.decisions >= MAX_DECISIONS {
                return Err(SimulatorError::TooManyDecisions(MAX_DECISIONS));
            }
            self.counts.decisions += 1;
            self.step(seat, ais[seat as usize].as_ref())?;
        }

        let result = self
            .state
            .result
            .clone()
            .ok_or_else(|| SimulatorError::InvalidState("game ended without a result".into()))?;
        Ok(SimulatedGame {
            result,
            reshuffles: self.state.reshuffles,
            cards_left: self.state.hand_counts(),
            counts: self.counts,
        })
    }

    fn step(&mut self, seat: Seat, ai: &dyn AiPlayer) -> Result<(), SimulatorError> {
        let view = CurrentRoundInfo::for_seat(&self.state, seat);
        let decision = decide(ai, &view).map_err(|e| SimulatorError::Ai(seat, e))?;
        match apply_decision(&mut self.state, seat, decision) {
            Ok(transitions) => {
                self.tally(&transitions);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(seat, error = %e, "AI decision rejected; using first legal decision");
                self.counts.illegal_decisions += 1;
                let fallback = legal_decisions(&self.state, seat)
                    .into_iter()
                    .next()
                    .ok_or_else(|| SimulatorError::InvalidState(format!("seat {seat} has no legal decision")))?;
                let transitions =
                    apply_decision(&mut self.state, seat, fallback).map_err(SimulatorError::Domain)?;
                self.tally(&transitions);
                Ok(())
            }
        }
    }

    fn tally(&mut self, transitions: &[Transition]) {
        for t in transitions {
            match t {
                Transition::CardsPlayed { seat, pattern, .. } => {
                    self.counts.plays += 1;
                    self.counts.plays_by_seat[*seat as usize] += 1;
                    match pattern.kind {
                        PatternKind::Bomb => self.counts.bombs += 1,
                        PatternKind::Rocket => self.counts.rockets += 1,
                        _ => {}
                    }
                }
                Transition::Passed { .. } => self.counts.passes += 1,
                Transition::TrickReset { .. } => self.counts.tricks += 1,
                _ => {}
            }
        }
    }
}

#[derive(Debug)]
pub enum SimulatorError {
    /// AI returned an error
    Ai(Seat, AiError),
    /// Domain transition failed outside an AI decision
    Domain(DomainError),
    TooManyDecisions(u32),
    InvalidState(String),
}

impl std::fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulatorError::Ai(seat, err) => write!(f, "AI error (seat {seat}): {err}"),
            SimulatorError::Domain(err) => write!(f, "Domain error: {err}"),
            SimulatorError::TooManyDecisions(n) => write!(f, "Game did not finish in {n} decisions"),
            SimulatorError::InvalidState(msg) => write!(f, "Invalid state: {msg}"),
        }
    }
}

impl std::error::Error for SimulatorError {}

#[cfg(test)]
mod tests {
    use landlord::ai::create_ai;
    use landlord::domain::rules::DECK_SIZE;

    use super::*;

    fn players(ai_type: &str) -> [Box<dyn AiPlayer + Send + Sync>; SEATS] {
        [0u64, 1, 2].map(|i| {
            create_ai(ai_type, Some(&serde_json::json!({ "seed": 10 + i })))
                .unwrap_or_else(|| panic!("unknown AI {ai_type}"))
        })
    }

    #[test]
    fn heuristic_games_finish() {
        let ais = players("heuristic");
        for seed in 0..20 {
            let game = Simulator::new(seed, 3).simulate_game(&ais).unwrap();
            assert_eq!(game.result.scores.iter().sum::<i64>(), 0);
            assert_eq!(game.cards_left[game.result.winner as usize], 0);
            assert_eq!(game.counts.illegal_decisions, 0);
            assert!(game.counts.plays > 0);
        }
    }

    #[test]
    fn random_games_finish_and_conserve_cards() {
        let ais = players("RandomPlayer");
        for seed in 0..20 {
            let game = Simulator::new(seed, 3).simulate_game(&ais).unwrap();
            let left: usize = game.cards_left.iter().sum();
            assert!(left < DECK_SIZE);
            assert_eq!(
                game.counts.plays_by_seat.iter().sum::<u32>(),
                game.counts.plays
            );
        }
    }

    #[test]
    fn same_seed_same_game() {
        let a = Simulator::new(99, 3).simulate_game(&players("heuristic")).unwrap();
        let b = Simulator::new(99, 3).simulate_game(&players("heuristic")).unwrap();
        assert_eq!(a.result.scores, b.result.scores);
        assert_eq!(a.counts, b.counts);
    }
}
