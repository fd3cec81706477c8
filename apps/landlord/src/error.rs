use thiserror::Error;

use crate::ai::AiError;
use crate::ai::oracle::OracleError;
use crate::errors::{DomainError, ErrorCode};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("AI error: {detail}")]
    Ai { detail: String },
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),
    #[error("Storage error: {detail}")]
    Storage { detail: String },
    #[error("Transport error: {detail}")]
    Transport { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    /// Stable error code for logs and client messages
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Domain(e) => ErrorCode::from(e),
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Ai { .. } => ErrorCode::AiError,
            AppError::Oracle(_) => ErrorCode::OracleError,
            AppError::Storage { .. } => ErrorCode::StorageError,
            AppError::Transport { .. } => ErrorCode::TransportError,
            AppError::Internal { .. } => ErrorCode::Internal,
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn ai(detail: impl Into<String>) -> Self {
        Self::Ai {
            detail: detail.into(),
        }
    }

    pub fn storage(detail: impl Into<String>) -> Self {
        Self::Storage {
            detail: detail.into(),
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    /// Domain error, if this wraps one.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            AppError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AiError> for AppError {
    fn from(e: AiError) -> Self {
        AppError::ai(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::storage(format!("io error: {e}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::storage(format!("json error: {e}"))
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::config(format!("env var error: {e}"))
    }
}
