use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::rules::SEATS;
use crate::domain::state::{require_landlord, RoundState, Seat};
use crate::errors::domain::DomainError;

/// Stake before doubling: 2 if anyone grabbed, else 1.
pub fn base_stake(grabbed: bool) -> u32 {
    if grabbed {
        2
    } else {
        1
    }
}

/// Terminal snapshot of a finished game. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Seat,
    pub landlord: Seat,
    pub landlord_won: bool,
    pub grabbed: bool,
    pub base_stake: u32,
    pub multiplier: u32,
    /// Signed score per seat; the landlord's magnitude is twice a farmer's.
    pub scores: [i64; SEATS],
    pub forced_landlord: bool,
    pub deal_no: u32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
}

/// Per-seat scores for a finished game.
///
/// Each farmer moves `base × multiplier`; the landlord moves twice that in
/// the opposite direction, so the scores always sum to zero.
pub fn compute_scores(
    landlord: Seat,
    winner: Seat,
    grabbed: bool,
    multiplier: u32,
) -> [i64; SEATS] {
    let unit = base_stake(grabbed) as i64 * multiplier as i64;
    let landlord_won = winner == landlord;
    let mut scores = [0i64; SEATS];
    for (seat, score) in scores.iter_mut().enumerate() {
        let is_landlord = seat as Seat == landlord;
        *score = match (is_landlord, landlord_won) {
            (true, true) => unit * 2,
            (true, false) => -unit * 2,
            (false, true) => -unit,
            (false, false) => unit,
        };
    }
    scores
}

/// Build the result for a game that `winner` just closed out.
pub fn score_game(state: &RoundState, winner: Seat) -> Result<GameResult, DomainError> {
    let landlord = require_landlord(state, "score_game")?;
    let grabbed = state.bidding.as_ref().is_some_and(|b| b.grabbed());
    let multiplier = state.multiplier.as_ref().map_or(1, |m| m.multiplier);
    Ok(GameResult {
        winner,
        landlord,
        landlord_won: winner == landlord,
        grabbed,
        base_stake: base_stake(grabbed),
        multiplier,
        scores: compute_scores(landlord, winner, grabbed, multiplier),
        forced_landlord: state.forced_landlord,
        deal_no: state.deal_no,
        started_at: None,
        ended_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landlord_win_takes_double() {
        assert_eq!(compute_scores(1, 1, false, 1), [-1, 2, -1]);
        assert_eq!(compute_scores(0, 0, true, 4), [16, -8, -8]);
    }

    #[test]
    fn farmer_win_pays_farmers() {
        assert_eq!(compute_scores(2, 0, false, 2), [2, 2, -4]);
        assert_eq!(compute_scores(2, 1, true, 2), [4, 4, -8]);
    }

    #[test]
    fn scores_sum_to_zero() {
        for landlord in 0..3u8 {
            for winner in 0..3u8 {
                for grabbed in [false, true] {
                    for m in [1u32, 2, 4, 8] {
                        let s = compute_scores(landlord, winner, grabbed, m);
                        assert_eq!(s.iter().sum::<i64>(), 0);
                        assert_eq!(s[landlord as usize].abs(), 2 * s[((landlord + 1) % 3) as usize].abs());
                    }
                }
            }
        }
    }
}
