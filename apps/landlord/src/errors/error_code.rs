//! Error codes surfaced to clients and logs.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE.

use core::fmt;

use super::domain::{ConflictKind, DomainError, InfraErrorKind, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Play validation
    /// Cards do not form a legal pattern
    InvalidPattern,
    /// Play does not beat the last play
    IllegalPlay,
    /// Card not in hand
    CardNotInHand,
    /// Pass while leading a fresh trick
    PassNotAllowed,

    // Turn / phase guards
    OutOfTurn,
    DuplicateDecision,
    PhaseMismatch,
    CallerCannotGrab,
    InvalidDecision,

    // Parsing
    ParseCard,
    InvalidCard,
    ValidationError,

    // Room
    SeatTaken,
    RoomFull,
    GameAlreadyStarted,
    Conflict,

    // Operational
    Timeout,
    Unavailable,
    DataCorruption,
    ConfigError,
    AiError,
    OracleError,
    StorageError,
    TransportError,
    Internal,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPattern => "INVALID_PATTERN",
            Self::IllegalPlay => "ILLEGAL_PLAY",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::PassNotAllowed => "PASS_NOT_ALLOWED",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::DuplicateDecision => "DUPLICATE_DECISION",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::CallerCannotGrab => "CALLER_CANNOT_GRAB",
            Self::InvalidDecision => "INVALID_DECISION",
            Self::ParseCard => "PARSE_CARD",
            Self::InvalidCard => "INVALID_CARD",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::SeatTaken => "SEAT_TAKEN",
            Self::RoomFull => "ROOM_FULL",
            Self::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            Self::Conflict => "CONFLICT",
            Self::Timeout => "TIMEOUT",
            Self::Unavailable => "UNAVAILABLE",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::AiError => "AI_ERROR",
            Self::OracleError => "ORACLE_ERROR",
            Self::StorageError => "STORAGE_ERROR",
            Self::TransportError => "TRANSPORT_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&DomainError> for ErrorCode {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::InvalidPattern => Self::InvalidPattern,
                ValidationKind::IllegalPlay => Self::IllegalPlay,
                ValidationKind::OutOfTurn => Self::OutOfTurn,
                ValidationKind::DuplicateDecision => Self::DuplicateDecision,
                ValidationKind::PhaseMismatch => Self::PhaseMismatch,
                ValidationKind::CardNotInHand => Self::CardNotInHand,
                ValidationKind::PassNotAllowed => Self::PassNotAllowed,
                ValidationKind::CallerCannotGrab => Self::CallerCannotGrab,
                ValidationKind::InvalidDecision => Self::InvalidDecision,
                ValidationKind::ParseCard => Self::ParseCard,
                ValidationKind::InvalidCard => Self::InvalidCard,
                ValidationKind::Other(_) => Self::ValidationError,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::SeatTaken => Self::SeatTaken,
                ConflictKind::RoomFull => Self::RoomFull,
                ConflictKind::GameAlreadyStarted => Self::GameAlreadyStarted,
                ConflictKind::Other(_) => Self::Conflict,
            },
            DomainError::Infra(kind, _) => match kind {
                InfraErrorKind::Timeout => Self::Timeout,
                InfraErrorKind::Unavailable => Self::Unavailable,
                InfraErrorKind::DataCorruption => Self::DataCorruption,
                InfraErrorKind::Other(_) => Self::Internal,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_screaming_snake_case() {
        let codes = [
            ErrorCode::InvalidPattern,
            ErrorCode::CallerCannotGrab,
            ErrorCode::GameAlreadyStarted,
            ErrorCode::OracleError,
        ];
        for code in codes {
            let s = code.as_str();
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'), "{s}");
        }
    }

    #[test]
    fn domain_errors_map_to_codes() {
        let err = DomainError::validation(ValidationKind::PassNotAllowed, "leader must play");
        assert_eq!(ErrorCode::from(&err), ErrorCode::PassNotAllowed);
        let err = DomainError::conflict(ConflictKind::RoomFull, "3 players already");
        assert_eq!(ErrorCode::from(&err).to_string(), "ROOM_FULL");
    }
}
