//! Seeds for scenario tests.
//!
//! `LANDLORD_TEST_SEED` pins every scenario to one seed, which is the quickest
//! way to replay a failure reported by CI.

/// Fixed seeds used when no override is set.
const DEFAULT_SEEDS: [u64; 8] = [1, 7, 42, 99, 1234, 20_240_101, 0xDEAD_BEEF, u64::MAX];

pub fn seed_from_env() -> Option<u64> {
    std::env::var("LANDLORD_TEST_SEED")
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
}

/// The override seed alone, or the default set.
pub fn test_seeds() -> Vec<u64> {
    match seed_from_env() {
        Some(seed) => vec![seed],
        None => DEFAULT_SEEDS.to_vec(),
    }
}
