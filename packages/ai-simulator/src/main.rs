//! AI Simulator CLI - Fast in-memory landlord games for AI evaluation.
//!
//! Games run against the round state machine directly, without sessions,
//! schedulers or timers.

mod metrics;
mod output;
mod simulator;
mod types;

use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use landlord::ai::{create_ai, AiPlayer, Personality};
use landlord::domain::rules::{DEFAULT_MAX_RESHUFFLES, SEATS};
use metrics::build_game_metrics;
use output::OutputWriter;
use simulator::{SimulatedGame, Simulator};
use tracing::{info, warn};
use types::OutputFormat;

#[derive(Parser)]
#[command(name = "ai-simulator")]
#[command(about = "Fast in-memory landlord simulator for AI evaluation")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// AI type for all seats
    #[arg(long, conflicts_with_all = ["seat0", "seat1", "seat2"])]
    seats: Option<AiType>,

    /// AI type for seat 0
    #[arg(long, default_value = "heuristic")]
    seat0: AiType,

    /// AI type for seat 1
    #[arg(long, default_value = "heuristic")]
    seat1: AiType,

    /// AI type for seat 2
    #[arg(long, default_value = "heuristic")]
    seat2: AiType,

    /// Personality for heuristic seats (aggressive, conservative, balanced, unpredictable)
    #[arg(long, value_parser = parse_personality)]
    personality: Option<Personality>,

    /// Base seed; game N uses seed + N - 1
    #[arg(long)]
    seed: Option<u64>,

    /// All-pass redeals before the landlord is forced
    #[arg(long, default_value_t = DEFAULT_MAX_RESHUFFLES)]
    max_reshuffles: u8,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show output summary and file paths
    #[arg(long)]
    show_output: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: String,

    /// Output format
    #[arg(long, default_value = "jsonl")]
    output_format: OutputFormat,

    /// Compress the detail file
    #[arg(long)]
    compress: bool,
}

#[derive(Debug, Clone, ValueEnum)]
enum AiType {
    Heuristic,
    Random,
}

fn parse_personality(s: &str) -> Result<Personality, String> {
    s.parse().map_err(|e: landlord::DomainError| e.to_string())
}

impl AiType {
    fn name(&self) -> &'static str {
        match self {
            AiType::Heuristic => "Heuristic",
            AiType::Random => "RandomPlayer",
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    landlord::telemetry::init_pretty(level);

    let seat_types: [AiType; SEATS] = match args.seats {
        Some(ai) => [ai.clone(), ai.clone(), ai],
        None => [args.seat0, args.seat1, args.seat2],
    };
    let ai_types = seat_types.clone().map(|t| t.name().to_string());

    if args.show_output {
        info!(games = args.games, seats = ?ai_types, "Starting AI simulator");
    }

    let mut output_writer = OutputWriter::new(&args.output_dir, &args.output_format, args.compress)?;

    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;

    for game_num in 1..=args.games {
        let game_start = Instant::now();
        let game_seed = match args.seed {
            Some(s) => s.wrapping_add(u64::from(game_num - 1)),
            None => rand::random(),
        };

        let ais = [0, 1, 2].map(|i| create_ai_player(&seat_types[i], args.personality, game_seed, i));
        let [a, b, c] = ais;
        let ais = [a?, b?, c?];

        match Simulator::new(game_seed, args.max_reshuffles).simulate_game(&ais) {
            Ok(game) => {
                let duration_ms = game_start.elapsed().as_secs_f64() * 1000.0;
                let metrics = build_game_metrics(
                    game_num,
                    game_seed,
                    ai_types.clone(),
                    args.games,
                    &game,
                    duration_ms,
                );
                if let Err(e) = output_writer.write_game(&metrics) {
                    warn!(game = game_num, error = %e, "Failed to write metrics");
                }
                if args.verbose {
                    info!(game = game_num, scores = ?game.result.scores, "Game completed");
                }
                results.push(game);
            }
            Err(e) => {
                errors += 1;
                warn!(game = game_num, seed = game_seed, error = %e, "Game failed");
            }
        }
    }

    let elapsed = start.elapsed();
    let (detail_path, csv_path) = {
        let (d, c) = output_writer.output_paths();
        (d.to_path_buf(), c.to_path_buf())
    };
    output_writer.finish()?;

    if args.show_output {
        info!("Detailed results written to: {}", detail_path.display());
        info!("Summary CSV written to: {}", csv_path.display());
        print_summary(&results, errors, elapsed, args.games);
    }

    Ok(())
}

fn create_ai_player(
    ai_type: &AiType,
    personality: Option<Personality>,
    game_seed: u64,
    seat: usize,
) -> Result<Box<dyn AiPlayer + Send + Sync>, Box<dyn std::error::Error>> {
    let mut config = serde_json::json!({ "seed": game_seed.wrapping_mul(31).wrapping_add(seat as u64) });
    if let Some(p) = personality {
        config["personality"] = serde_json::Value::from(p.as_str());
    }
    create_ai(ai_type.name(), Some(&config))
        .ok_or_else(|| format!("Unknown AI type: {}", ai_type.name()).into())
}

fn print_summary(results: &[SimulatedGame], errors: u32, elapsed: Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Games completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {errors}");
    }
    println!("Total time: {elapsed:?}");
    if results.is_empty() {
        return;
    }
    let n = results.len() as f64;
    println!("Average time per game: {:?}", elapsed / results.len() as u32);

    let mut wins = [0u32; SEATS];
    let mut landlord_count = [0u32; SEATS];
    let mut total_scores = [0i64; SEATS];
    let mut landlord_wins = 0u32;
    let mut multiplier_sum = 0u64;
    let mut forced = 0u32;
    let mut grabbed = 0u32;

    for game in results {
        let r = &game.result;
        landlord_count[r.landlord as usize] += 1;
        if r.landlord_won {
            landlord_wins += 1;
        }
        if r.forced_landlord {
            forced += 1;
        }
        if r.grabbed {
            grabbed += 1;
        }
        multiplier_sum += u64::from(r.multiplier);
        for seat in 0..SEATS {
            total_scores[seat] += r.scores[seat];
            if (seat as u8 == r.landlord) == r.landlord_won {
                wins[seat] += 1;
            }
        }
    }

    println!("\n=== Landlord ===");
    println!(
        "Landlord win rate: {:.1}% ({landlord_wins}/{})",
        f64::from(landlord_wins) / n * 100.0,
        results.len()
    );
    println!("Average multiplier: {:.2}", multiplier_sum as f64 / n);
    println!("Grabbed: {grabbed}, forced: {forced}");

    println!("\n=== Results by Seat ===");
    for seat in 0..SEATS {
        println!(
            "Seat {seat}: avg={:.1}, wins={} ({:.1}%), landlord={}",
            total_scores[seat] as f64 / n,
            wins[seat],
            f64::from(wins[seat]) / n * 100.0,
            landlord_count[seat]
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn personality_flag_accepts_known_names() {
        let args = Args::try_parse_from(["ai-simulator", "--personality", "Unpredictable"]).unwrap();
        assert_eq!(args.personality, Some(Personality::Unpredictable));
        assert!(Args::try_parse_from(["ai-simulator", "--personality", "adaptive"]).is_err());
    }

    #[test]
    fn seats_shortcut_conflicts_with_single_seats() {
        assert!(Args::try_parse_from(["ai-simulator", "--seats", "random", "--seat0", "heuristic"]).is_err());
        let args = Args::try_parse_from(["ai-simulator", "--seats", "random", "--games", "3"]).unwrap();
        assert_eq!(args.games, 3);
        assert!(matches!(args.seats, Some(AiType::Random)));
    }
}
