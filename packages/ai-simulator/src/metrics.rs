//! Metrics collection and output for AI simulation results.

use landlord::domain::rules::SEATS;
use serde::Serialize;

use crate::simulator::SimulatedGame;

/// Complete game metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct GameMetrics {
    pub game_id: u32,
    pub seed: u64,
    pub timestamp: String,
    pub config: SimulationConfig,
    pub result: GameResultMetrics,
    pub play: PlayMetrics,
    pub player_metrics: Vec<PlayerMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationConfig {
    pub ai_types: [String; SEATS],
    pub total_games: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResultMetrics {
    pub winner: u8,
    pub landlord: u8,
    pub landlord_won: bool,
    pub base_stake: u32,
    pub multiplier: u32,
    pub grabbed: bool,
    pub reshuffles: u8,
    pub forced_landlord: bool,
    pub scores: [i64; SEATS],
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayMetrics {
    pub decisions: u32,
    pub plays: u32,
    pub passes: u32,
    pub tricks: u32,
    pub bombs: u32,
    pub rockets: u32,
    pub illegal_decisions: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerMetrics {
    pub seat: u8,
    pub ai_type: String,
    pub landlord: bool,
    pub won: bool,
    pub score: i64,
    pub plays: u32,
    pub cards_left: usize,
}

/// Build metrics from a simulated game.
pub fn build_game_metrics(
    game_id: u32,
    seed: u64,
    ai_types: [String; SEATS],
    total_games: u32,
    game: &SimulatedGame,
    duration_ms: f64,
) -> GameMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));
    let r = &game.result;

    let player_metrics = (0..SEATS)
        .map(|i| {
            let seat = i as u8;
            let landlord = seat == r.landlord;
            PlayerMetrics {
                seat,
                ai_type: ai_types[i].clone(),
                landlord,
                won: landlord == r.landlord_won,
                score: r.scores[i],
                plays: game.counts.plays_by_seat[i],
                cards_left: game.cards_left[i],
            }
        })
        .collect();

    GameMetrics {
        game_id,
        seed,
        timestamp,
        config: SimulationConfig {
            ai_types,
            total_games,
        },
        result: GameResultMetrics {
            winner: r.winner,
            landlord: r.landlord,
            landlord_won: r.landlord_won,
            base_stake: r.base_stake,
            multiplier: r.multiplier,
            grabbed: r.grabbed,
            reshuffles: game.reshuffles,
            forced_landlord: r.forced_landlord,
            scores: r.scores,
            duration_ms,
        },
        play: PlayMetrics {
            decisions: game.counts.decisions,
            plays: game.counts.plays,
            passes: game.counts.passes,
            tricks: game.counts.tricks,
            bombs: game.counts.bombs,
            rockets: game.counts.rockets,
            illegal_decisions: game.counts.illegal_decisions,
        },
        player_metrics,
    }
}

/// CSV summary row for quick analysis.
#[derive(Debug, Serialize)]
pub struct CsvSummaryRow {
    pub game_id: u32,
    pub seed: u64,
    pub winner: u8,
    pub landlord: u8,
    pub landlord_won: bool,
    pub multiplier: u32,
    pub grabbed: bool,
    pub reshuffles: u8,
    pub forced_landlord: bool,
    pub plays: u32,
    pub bombs: u32,
    pub seat0_score: i64,
    pub seat1_score: i64,
    pub seat2_score: i64,
    pub seat0_ai: String,
    pub seat1_ai: String,
    pub seat2_ai: String,
}

impl From<&GameMetrics> for CsvSummaryRow {
    fn from(metrics: &GameMetrics) -> Self {
        let r = &metrics.result;
        CsvSummaryRow {
            game_id: metrics.game_id,
            seed: metrics.seed,
            winner: r.winner,
            landlord: r.landlord,
            landlord_won: r.landlord_won,
            multiplier: r.multiplier,
            grabbed: r.grabbed,
            reshuffles: r.reshuffles,
            forced_landlord: r.forced_landlord,
            plays: metrics.play.plays,
            bombs: metrics.play.bombs + metrics.play.rockets,
            seat0_score: r.scores[0],
            seat1_score: r.scores[1],
            seat2_score: r.scores[2],
            seat0_ai: metrics.config.ai_types[0].clone(),
            seat1_ai: metrics.config.ai_types[1].clone(),
            seat2_ai: metrics.config.ai_types[2].clone(),
        }
    }
}
