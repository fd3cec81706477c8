//! Shared types for the simulator.

use clap::ValueEnum;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per game
    Jsonl,
    /// A single JSON array written at the end
    Json,
}
