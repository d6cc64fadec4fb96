use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use letmeask_core::Entity;

use crate::Author;

/// A like left on a question. At most one per author per question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    /// Empty until the like is first persisted.
    #[serde(default)]
    pub id: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(author: Author) -> Self {
        Self {
            id: String::new(),
            author,
            created_at: Utc::now(),
        }
    }
}

impl Entity for Like {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn has_identity(&self) -> bool {
        !self.id.is_empty()
    }
}

/// A question posted into a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Empty until the question is first persisted.
    #[serde(default)]
    pub id: String,
    pub content: String,
    pub is_highlighted: bool,
    pub is_answered: bool,
    pub author: Author,
    pub likes: Vec<Like>,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(content: impl Into<String>, author: Author) -> Self {
        Self {
            id: String::new(),
            content: content.into(),
            is_highlighted: false,
            is_answered: false,
            author,
            likes: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// The like left by `author_id`, if any.
    pub fn like_by(&self, author_id: &str) -> Option<&Like> {
        self.likes.iter().find(|l| l.author.id == author_id)
    }

    /// Appends `like` unless its author already liked this question.
    ///
    /// Returns whether the like was added.
    pub(crate) fn add_like(&mut self, like: Like) -> bool {
        if self.like_by(&like.author.id).is_some() {
            return false;
        }
        self.likes.push(like);
        true
    }

    pub(crate) fn remove_like(&mut self, like_id: &str) {
        if like_id.is_empty() {
            return;
        }
        self.likes.retain(|l| l.id != like_id);
    }
}

impl Entity for Question {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn has_identity(&self) -> bool {
        !self.id.is_empty()
    }
}
