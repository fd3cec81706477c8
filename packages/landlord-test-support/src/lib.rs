//! Shared helpers for the landlord integration tests: one-time logging
//! setup, unique ids for rooms and players, and reproducible seeds.

pub mod logging;
pub mod seeds;
pub mod unique_helpers;

pub use seeds::{seed_from_env, test_seeds};
pub use unique_helpers::{unique_player_id, unique_room_id, unique_str};
