//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Only deterministic business failures live here (validation, invariants,
/// workflow legality). Process-edge concerns (I/O, parsing files) belong to
/// the binaries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed validation. Carries every message that applies, joined
    /// with `"; "`, so callers can show all problems at once.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The targeted aggregate does not exist yet.
    #[error("not found")]
    NotFound,

    /// The command conflicts with current state (e.g. create twice).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A workflow action is not legal from the current status.
    #[error("cannot {action} a voucher that is {from}")]
    IllegalTransition { from: String, action: String },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn illegal_transition(from: impl core::fmt::Display, action: impl core::fmt::Display) -> Self {
        Self::IllegalTransition {
            from: from.to_string(),
            action: action.to_string(),
        }
    }
}
