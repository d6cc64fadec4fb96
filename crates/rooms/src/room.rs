use chrono::{DateTime, Utc};
use serde::Serialize;

use letmeask_core::{AggregateRoot, DomainError, DomainResult};

use crate::{Author, Like, Question};

/// Everything needed to rehydrate a [`Room`] from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomParts {
    pub id: String,
    pub title: String,
    pub author: Author,
    pub questions: Vec<Question>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate root: Room.
///
/// Questions and likes are kept in insertion order and located by linear scan;
/// rooms are small enough that no index is maintained.
///
/// Identity, author and creation time are fixed once the room exists. `ended_at`
/// is terminal: nothing here can clear it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    id: String,
    title: String,
    author: Author,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    questions: Vec<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ended_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Room {
    /// A new, not-yet-persisted room with no questions.
    pub fn new(title: impl Into<String>, author: Author) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            title: title.into(),
            author,
            questions: Vec::new(),
            ended_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_parts(parts: RoomParts) -> Self {
        Self {
            id: parts.id,
            title: parts.title,
            author: parts.author,
            questions: parts.questions,
            ended_at: parts.ended_at,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        }
    }

    pub fn into_parts(self) -> RoomParts {
        RoomParts {
            id: self.id,
            title: self.title,
            author: self.author,
            questions: self.questions,
            ended_at: self.ended_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Checks a room is fit to be created.
    pub fn validate_new(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("room title must not be empty"));
        }
        self.author.validate()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.position_of(question_id).map(|idx| &self.questions[idx])
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_authored_by(&self, user_id: &str) -> bool {
        !user_id.is_empty() && self.author.id == user_id
    }

    /// Stamps a fresh creation time and appends the question.
    ///
    /// Identity is left as-is; it is assigned when the room is persisted.
    pub fn add_question(&mut self, mut question: Question) {
        question.created_at = Utc::now();
        self.questions.push(question);
    }

    /// Adds `like` to the question unless its author already liked it.
    pub fn like_question(&mut self, question_id: &str, mut like: Like) -> DomainResult<()> {
        let question = self.question_mut(question_id)?;
        like.created_at = Utc::now();
        question.add_like(like);
        Ok(())
    }

    /// Removes the like with `like_id`; a missing like is not an error.
    pub fn deslike_question(&mut self, question_id: &str, like_id: &str) -> DomainResult<()> {
        self.question_mut(question_id)?.remove_like(like_id);
        Ok(())
    }

    pub fn mark_question_answered(&mut self, question_id: &str) -> DomainResult<()> {
        self.question_mut(question_id)?.is_answered = true;
        Ok(())
    }

    pub fn update_question_highlight(&mut self, question_id: &str, value: bool) -> DomainResult<()> {
        self.question_mut(question_id)?.is_highlighted = value;
        Ok(())
    }

    /// Removes the question if present; no-op otherwise.
    pub fn delete_question(&mut self, question_id: &str) {
        if let Some(idx) = self.position_of(question_id) {
            self.questions.remove(idx);
        }
    }

    /// Marks the room as ended. Calling it again only refreshes the timestamp.
    pub fn end(&mut self) {
        self.ended_at = Some(Utc::now());
    }

    fn position_of(&self, question_id: &str) -> Option<usize> {
        if question_id.is_empty() {
            return None;
        }
        self.questions.iter().position(|q| q.id == question_id)
    }

    fn question_mut(&mut self, question_id: &str) -> DomainResult<&mut Question> {
        let idx = self
            .position_of(question_id)
            .ok_or_else(DomainError::question_not_found)?;
        Ok(&mut self.questions[idx])
    }
}

impl AggregateRoot for Room {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
