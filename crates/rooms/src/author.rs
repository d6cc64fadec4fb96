use serde::{Deserialize, Serialize};

use letmeask_core::{DomainError, ValueObject};

/// Author reference embedded by value in rooms, questions and likes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

impl ValueObject for Author {}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: avatar.into(),
        }
    }

    /// An author without an identity can never be persisted.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::validation("author id must not be empty"));
        }
        Ok(())
    }
}
