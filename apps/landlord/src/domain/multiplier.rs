use tracing::{debug, info};

use crate::domain::game_transition::Transition;
use crate::domain::rules::SEATS;
use crate::domain::state::{
    nth_from, require_landlord, require_phase, require_seat, require_turn, MultiplierRecord,
    Phase, PlayState, RoundState, Seat,
};
use crate::errors::domain::{DomainError, ValidationKind};

/// Record a double/pass decision. Starting at the landlord each seat
/// decides once; after the third decision play starts with the landlord.
pub fn submit_multiplier(
    state: &mut RoundState,
    seat: Seat,
    doubled: bool,
) -> Result<Vec<Transition>, DomainError> {
    require_seat(seat)?;
    require_phase(state, Phase::Multiplier)?;
    let landlord = require_landlord(state, "submit_multiplier")?;
    let m = state.multiplier.as_mut().ok_or_else(|| {
        DomainError::validation_other(
            "Invariant violated: multiplier state must be set (submit_multiplier)",
        )
    })?;

    if m.decided[seat as usize] {
        return Err(DomainError::validation(
            ValidationKind::DuplicateDecision,
            format!("Seat {seat} already decided on the multiplier"),
        ));
    }
    require_turn(m.current, seat, "submit_multiplier")?;

    m.decided[seat as usize] = true;
    m.records.push(MultiplierRecord { seat, doubled });
    if doubled {
        m.multiplier = m.multiplier.saturating_mul(2);
    }
    debug!(seat, doubled, multiplier = m.multiplier, "Multiplier decision recorded");

    let mut out = vec![Transition::MultiplierDecided {
        seat,
        doubled,
        multiplier: m.multiplier,
    }];

    // Skip seats that already decided; at most SEATS - 1 steps.
    let next = (1..SEATS as u8)
        .map(|i| nth_from(seat, i))
        .find(|s| !m.decided[*s as usize]);
    match next {
        Some(s) => m.current = Some(s),
        None => {
            m.current = None;
            info!(
                landlord,
                multiplier = m.multiplier,
                "Multiplier settled; playing starts"
            );
            state.play = Some(PlayState::new(landlord));
            state.phase = Phase::Playing;
            out.push(Transition::PlayingStarted { leader: landlord });
        }
    }
    Ok(out)
}
