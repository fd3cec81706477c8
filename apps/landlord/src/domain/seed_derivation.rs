//! RNG seed derivation for deterministic sessions.
//!
//! A session owns a single base seed. Every random choice the engine makes
//! (shuffle, first bidder, forced landlord) draws from a seed derived here,
//! so a replay with the same base seed and the same decisions reproduces the
//! same game.

/// Seed for shuffling the deck of deal `deal_no` (1-based).
pub fn derive_deal_seed(game_seed: u64, deal_no: u32) -> u64 {
    game_seed
        .wrapping_add((deal_no as u64).wrapping_mul(1_000_000))
        .wrapping_add(2)
}

/// Seed for picking the first bidder of deal `deal_no`.
pub fn derive_first_bidder_seed(game_seed: u64, deal_no: u32) -> u64 {
    game_seed
        .wrapping_add((deal_no as u64).wrapping_mul(1_000_000))
        .wrapping_add(3)
}

/// Seed for the random landlord assignment once reshuffles are exhausted.
pub fn derive_forced_landlord_seed(game_seed: u64, deal_no: u32) -> u64 {
    game_seed
        .wrapping_add((deal_no as u64).wrapping_mul(1_000_000))
        .wrapping_add(5)
}

/// Seed for an AI seat's private RNG.
pub fn derive_ai_seed(game_seed: u64, seat: u8) -> u64 {
    game_seed
        .wrapping_add((seat as u64).wrapping_mul(100))
        .wrapping_add(1)
}
