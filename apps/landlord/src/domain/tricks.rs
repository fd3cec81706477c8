use tracing::{debug, info};

use crate::domain::compare::beats;
use crate::domain::game_transition::Transition;
use crate::domain::hints::legal_plays;
use crate::domain::patterns::{classify, Pattern};
use crate::domain::rules::SEATS;
use crate::domain::scoring::score_game;
use crate::domain::state::{
    next_seat, require_phase, require_seat, require_turn, Phase, PlayAction, PlayRecord,
    RoundState, Seat,
};
use crate::domain::Card;
use crate::errors::domain::{DomainError, ValidationKind};

/// Legal plays for `seat` against the current trick, independent of turn.
pub fn legal_moves(state: &RoundState, seat: Seat) -> Vec<Pattern> {
    let Some(play) = state.play.as_ref() else {
        return Vec::new();
    };
    if state.phase != Phase::Playing {
        return Vec::new();
    }
    legal_plays(state.hand(seat), play.last_pattern.as_ref())
}

/// Whether `seat` may pass right now: only when there is a play to beat.
pub fn can_pass(state: &RoundState) -> bool {
    state
        .play
        .as_ref()
        .is_some_and(|p| p.last_pattern.is_some())
}

/// Play `cards` from `seat`'s hand, enforcing phase, turn, ownership,
/// pattern validity and that the play beats the last one.
pub fn play_cards(
    state: &mut RoundState,
    seat: Seat,
    cards: &[Card],
) -> Result<Vec<Transition>, DomainError> {
    require_seat(seat)?;
    require_phase(state, Phase::Playing)?;
    let play = state.play.as_ref().ok_or_else(|| {
        DomainError::validation_other("Invariant violated: play state must be set (play_cards)")
    })?;
    require_turn(Some(play.current), seat, "play_cards")?;

    let hand = state.hand(seat);
    let mut requested = cards.to_vec();
    requested.sort();
    requested.dedup();
    if requested.len() != cards.len() || requested.iter().any(|c| !hand.contains(c)) {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            format!("Seat {seat} does not hold all of the submitted cards"),
        ));
    }

    let pattern = classify(&requested);
    if !pattern.is_valid() {
        return Err(DomainError::validation(
            ValidationKind::InvalidPattern,
            "Cards do not form a valid pattern",
        ));
    }
    if let Some(last) = play.last_pattern.as_ref() {
        if !beats(&pattern, last) {
            return Err(DomainError::validation(
                ValidationKind::IllegalPlay,
                format!("{} does not beat {}", pattern.describe(), last.describe()),
            ));
        }
    }

    let hand = &mut state.hands[seat as usize];
    hand.retain(|c| !requested.contains(c));
    let remaining = hand.len();

    let play = state.play.as_mut().ok_or_else(|| {
        DomainError::validation_other("Invariant violated: play state must be set (play_cards)")
    })?;
    play.history.push(PlayRecord {
        seat,
        action: PlayAction::Play {
            pattern: pattern.clone(),
        },
    });
    play.last_pattern = Some(pattern.clone());
    play.last_player = Some(seat);
    play.passed_since_play.clear();
    debug!(seat, pattern = %pattern, remaining, "Cards played");

    let mut out = vec![Transition::CardsPlayed {
        seat,
        pattern,
        remaining,
    }];

    if remaining == 0 {
        let result = score_game(state, seat)?;
        info!(
            winner = seat,
            landlord_won = result.landlord_won,
            multiplier = result.multiplier,
            "Game ended"
        );
        state.phase = Phase::Ended;
        state.result = Some(result.clone());
        out.push(Transition::GameEnded { result });
    } else {
        play.current = next_seat(seat);
    }
    Ok(out)
}

/// Pass on the current trick. The trick closes once every other seat has
/// passed since the last play; its player then leads freely.
pub fn pass_turn(state: &mut RoundState, seat: Seat) -> Result<Vec<Transition>, DomainError> {
    require_seat(seat)?;
    require_phase(state, Phase::Playing)?;
    let play = state.play.as_mut().ok_or_else(|| {
        DomainError::validation_other("Invariant violated: play state must be set (pass_turn)")
    })?;
    require_turn(Some(play.current), seat, "pass_turn")?;
    let Some(last_player) = play.last_player.filter(|_| play.last_pattern.is_some()) else {
        return Err(DomainError::validation(
            ValidationKind::PassNotAllowed,
            "Cannot pass while leading a trick",
        ));
    };

    play.history.push(PlayRecord {
        seat,
        action: PlayAction::Pass,
    });
    if !play.passed_since_play.contains(&seat) {
        play.passed_since_play.push(seat);
    }
    debug!(seat, "Passed");
    let mut out = vec![Transition::Passed { seat }];

    let trick_closed = (0..SEATS as Seat)
        .filter(|s| *s != last_player)
        .all(|s| play.passed_since_play.contains(&s));
    if trick_closed {
        play.last_pattern = None;
        play.passed_since_play.clear();
        play.current = last_player;
        play.tricks_completed += 1;
        debug!(leader = last_player, "Trick closed");
        out.push(Transition::TrickReset {
            leader: last_player,
        });
    } else {
        play.current = next_seat(seat);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards_parsing::parse_cards;
    use crate::domain::state::{MultiplierState, PlayState};

    /// Playing-phase state with hand-picked hands; seat 0 is landlord.
    fn playing(hands: [&[&str]; 3]) -> RoundState {
        let mut s = RoundState::new(1);
        s.deal_no = 1;
        for (i, h) in hands.iter().enumerate() {
            s.hands[i] = parse_cards(h);
            s.hands[i].sort();
        }
        s.landlord = Some(0);
        let mut m = MultiplierState::new(0);
        m.decided = [true; 3];
        m.current = None;
        s.multiplier = Some(m);
        s.play = Some(PlayState::new(0));
        s.phase = Phase::Playing;
        s
    }

    #[test]
    fn leader_cannot_pass() {
        let mut s = playing([&["3S", "4S"], &["5S"], &["6S"]]);
        let err = pass_turn(&mut s, 0).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::PassNotAllowed));
    }

    #[test]
    fn rejects_cards_not_in_hand_and_invalid_patterns() {
        let mut s = playing([&["3S", "4S", "9D"], &["5S"], &["6S"]]);
        let err = play_cards(&mut s, 0, &parse_cards(&["5S"])).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::CardNotInHand));
        let err = play_cards(&mut s, 0, &parse_cards(&["3S", "4S"])).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::InvalidPattern));
    }

    #[test]
    fn must_beat_last_play() {
        let mut s = playing([&["7S", "7H", "3D"], &["5S", "5H", "KD"], &["6S"]]);
        play_cards(&mut s, 0, &parse_cards(&["7S", "7H"])).unwrap();
        let before = s.clone();
        let err = play_cards(&mut s, 1, &parse_cards(&["5S", "5H"])).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::IllegalPlay));
        assert_eq!(s, before);
        let err = play_cards(&mut s, 1, &parse_cards(&["KD"])).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::IllegalPlay));
    }

    #[test]
    fn two_passes_close_the_trick() {
        let mut s = playing([&["7S", "3D"], &["5S", "KD"], &["6S", "8D"]]);
        play_cards(&mut s, 0, &parse_cards(&["7S"])).unwrap();
        pass_turn(&mut s, 1).unwrap();
        assert!(s.play.as_ref().unwrap().last_pattern.is_some());
        let t = pass_turn(&mut s, 2).unwrap();
        assert!(t.contains(&Transition::TrickReset { leader: 0 }));
        let play = s.play.as_ref().unwrap();
        assert!(play.last_pattern.is_none());
        assert_eq!(play.current, 0);
        assert_eq!(play.tricks_completed, 1);
    }

    #[test]
    fn pass_then_play_keeps_trick_open() {
        let mut s = playing([&["7S", "3D"], &["5S", "KD"], &["9S", "8D"]]);
        play_cards(&mut s, 0, &parse_cards(&["7S"])).unwrap();
        pass_turn(&mut s, 1).unwrap();
        play_cards(&mut s, 2, &parse_cards(&["9S"])).unwrap();
        pass_turn(&mut s, 0).unwrap();
        assert!(s.play.as_ref().unwrap().last_pattern.is_some());
        pass_turn(&mut s, 1).unwrap();
        let play = s.play.as_ref().unwrap();
        assert!(play.last_pattern.is_none());
        assert_eq!(play.current, 2);
    }

    #[test]
    fn emptying_a_hand_ends_the_game() {
        let mut s = playing([&["7S"], &["5S"], &["6S"]]);
        let t = play_cards(&mut s, 0, &parse_cards(&["7S"])).unwrap();
        assert_eq!(s.phase, Phase::Ended);
        let result = s.result.as_ref().unwrap();
        assert_eq!(result.winner, 0);
        assert!(result.landlord_won);
        assert_eq!(result.scores, [2, -1, -1]);
        assert!(matches!(t.last(), Some(Transition::GameEnded { .. })));
    }

    #[test]
    fn legal_moves_track_last_play() {
        let mut s = playing([&["7S", "3D"], &["5S", "KD"], &["6S"]]);
        play_cards(&mut s, 0, &parse_cards(&["7S"])).unwrap();
        let moves = legal_moves(&s, 1);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].cards, parse_cards(&["KD"]));
        assert!(can_pass(&s));
    }
}
