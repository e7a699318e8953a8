//! Errors raised by the entity rules.
//!
//! Nothing here knows about HTTP or storage; the application layer maps each
//! variant onto its own error type.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input breaks a field rule or a cross-field rule
    #[error("{0}")]
    Validation(String),

    /// Password does not meet the policy
    #[error("Password error: {0}")]
    Password(String),

    /// The change collides with existing state, e.g. a full room
    #[error("{0}")]
    Conflict(String),

    /// Hashing or another primitive failed
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
