//! Domain-level error type used across the engine, AI and services.
//!
//! This error type is transport- and storage-agnostic. Services return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Why a submitted action was rejected.
///
/// Every variant is a local rejection: the state machine is unchanged after
/// returning one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Submitted cards do not classify to a legal category.
    InvalidPattern,
    /// Pattern is valid but does not beat the last play.
    IllegalPlay,
    /// Submitter is not the seat whose decision is pending.
    OutOfTurn,
    /// Submitter already decided in the active phase.
    DuplicateDecision,
    /// Action does not belong to the current phase.
    PhaseMismatch,
    /// A submitted card is not held by the submitter.
    CardNotInHand,
    /// Pass while leading a fresh trick.
    PassNotAllowed,
    /// The original caller tried to decide again while grabbing.
    CallerCannotGrab,
    /// Decision variant is not valid for the current (sub)phase.
    InvalidDecision,
    /// Card token could not be parsed.
    ParseCard,
    /// Suit/rank combination does not exist in the deck.
    InvalidCard,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    SeatTaken,
    RoomFull,
    GameAlreadyStarted,
    Other(String),
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    Unavailable,
    DataCorruption,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input validation or game rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    /// Validation kind, if this is a validation error.
    pub fn validation_kind(&self) -> Option<&ValidationKind> {
        match self {
            DomainError::Validation(kind, _) => Some(kind),
            _ => None,
        }
    }

    /// True for the defensive guards that indicate a caller race rather than
    /// a user mistake.
    pub fn is_guard_rejection(&self) -> bool {
        matches!(
            self.validation_kind(),
            Some(ValidationKind::OutOfTurn)
                | Some(ValidationKind::DuplicateDecision)
                | Some(ValidationKind::CallerCannotGrab)
        )
    }
}
