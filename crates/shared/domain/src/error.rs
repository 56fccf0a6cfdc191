//! Errors raised while building or checking domain values.

use thiserror::Error;

/// Failure of a domain rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input field missing, blank or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// New password rejected before hashing
    #[error("Password error: {0}")]
    Password(String),

    /// Plain text does not match the stored password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A persisted tag (role, status, request type) outside the known set
    #[error("Unknown {kind} '{value}'")]
    UnknownTag { kind: &'static str, value: String },

    /// Hashing backend failure
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

    pub fn unknown_tag(kind: &'static str, value: impl Into<String>) -> Self {
        DomainError::UnknownTag {
            kind,
            value: value.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
