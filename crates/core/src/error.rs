//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. Storage
/// absence ("room not found") and I/O failures belong to the store layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. empty title, author without identity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identity reference could not be parsed into a store key.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// No question in the room matches the requested identity.
    #[error("question not found")]
    QuestionNotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_reference(msg: impl Into<String>) -> Self {
        Self::InvalidReference(msg.into())
    }

    pub fn question_not_found() -> Self {
        Self::QuestionNotFound
    }
}
