#![allow(dead_code)]

use landlord::services::{GameSession, SeatSpec};
use landlord::GameConfig;

// Logging is auto-installed for every test binary that declares `mod common`
#[ctor::ctor]
fn init_logging() {
    landlord_test_support::logging::init();
}

/// Upper bound on decisions in one game, reshuffles included.
pub const MAX_DECISIONS: usize = 600;

pub fn ai_session(ai_type: &str, seed: u64) -> GameSession {
    let seats = [0, 1, 2].map(|i| {
        SeatSpec::ai(format!("{ai_type}-{i}"), ai_type)
            .with_ai_config(serde_json::json!({ "seed": seed.wrapping_add(i) }))
    });
    let mut session = GameSession::new(GameConfig::default(), seats, seed).expect("session");
    session.start().expect("start");
    session
}

/// Play the session out with each seat's local player; panics on any
/// rejected decision.
pub fn play_out(session: &mut GameSession) -> usize {
    for n in 0..MAX_DECISIONS {
        let Some(seat) = session.current_actor() else {
            return n;
        };
        let decision = session.local_decision(seat).expect("local decision");
        if let Err(e) = session.submit(seat, decision.clone()) {
            panic!("seat {seat} submitted illegal {decision:?}: {e}");
        }
    }
    panic!("game did not finish within {MAX_DECISIONS} decisions");
}
