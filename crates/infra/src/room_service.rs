//! Room orchestration: load, mutate, persist.
//!
//! Every mutating operation is three independent store round trips
//! (`find_by_id`, a domain mutation, `update`). Nothing is held across them;
//! concurrent writers to the same room resolve as last-write-wins.
//!
//! Moderation (`update_question`, `delete_question`, `end_room`) is gated on the
//! caller being the room's author. The check runs after the load and before any
//! write. Participation (`create_question`, `like_question`, `deslike_question`)
//! is open to any authenticated caller.

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use letmeask_core::{AggregateRoot, DocumentId, DomainError, UserId};
use letmeask_rooms::{Author, Like, Question, Room};

use crate::room_store::{RoomStore, RoomStoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomServiceError {
    #[error("room not found")]
    RoomNotFound,

    /// A nested question is absent, distinct from the room being absent.
    #[error("question not found")]
    QuestionNotFound,

    /// The caller is not the room's author.
    #[error("forbidden")]
    Forbidden,

    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("validation failed: {0}")]
    Validation(String),

    /// Opaque I/O failure, passed through untouched.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<RoomStoreError> for RoomServiceError {
    fn from(value: RoomStoreError) -> Self {
        match value {
            RoomStoreError::RoomNotFound => RoomServiceError::RoomNotFound,
            RoomStoreError::InvalidReference(msg) => RoomServiceError::InvalidReference(msg),
            RoomStoreError::Storage(msg) => RoomServiceError::Storage(msg),
        }
    }
}

impl From<DomainError> for RoomServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => RoomServiceError::Validation(msg),
            DomainError::InvalidReference(msg) => RoomServiceError::InvalidReference(msg),
            DomainError::QuestionNotFound => RoomServiceError::QuestionNotFound,
        }
    }
}

/// Moderation changes to a single question.
///
/// `is_answered` is one-way: `Some(false)` is accepted and ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct QuestionUpdate {
    #[serde(default)]
    pub is_answered: Option<bool>,
    #[serde(default)]
    pub is_highlighted: Option<bool>,
}

impl QuestionUpdate {
    pub fn validate(&self) -> Result<(), RoomServiceError> {
        if self.is_answered.is_none() && self.is_highlighted.is_none() {
            return Err(RoomServiceError::Validation(
                "one of is_answered or is_highlighted is required".to_string(),
            ));
        }
        Ok(())
    }

    fn apply(&self, room: &mut Room, question_id: &str) -> Result<(), DomainError> {
        if room.question(question_id).is_none() {
            return Err(DomainError::question_not_found());
        }
        if self.is_answered == Some(true) {
            room.mark_question_answered(question_id)?;
        }
        if let Some(highlighted) = self.is_highlighted {
            room.update_question_highlight(question_id, highlighted)?;
        }
        Ok(())
    }
}

pub struct RoomService<S> {
    store: S,
}

impl<S: RoomStore> RoomService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(&self, room: Room) -> Result<Room, RoomServiceError> {
        room.validate_new()?;
        let mut parts = room.into_parts();
        parts.author = canonical_author(parts.author)?;
        let room = Room::from_parts(parts);
        let created = self.store.create(&room).await?;
        info!(room_id = %created.id(), author_id = %created.author().id, "room created");
        Ok(created)
    }

    pub async fn find_by_id(&self, room_id: &str) -> Result<Room, RoomServiceError> {
        Ok(self.store.find_by_id(room_id).await?)
    }

    pub async fn create_question(&self, room_id: &str, mut question: Question) -> Result<Room, RoomServiceError> {
        if question.content.trim().is_empty() {
            return Err(RoomServiceError::Validation("question content must not be empty".to_string()));
        }
        question.author.validate()?;
        question.author = canonical_author(question.author)?;

        let mut room = self.store.find_by_id(room_id).await?;
        room.add_question(question);
        self.persist(room_id, &room).await
    }

    pub async fn like_question(
        &self,
        room_id: &str,
        question_id: &str,
        author: Author,
    ) -> Result<Room, RoomServiceError> {
        author.validate()?;
        let author = canonical_author(author)?;

        let mut room = self.store.find_by_id(room_id).await?;
        room.like_question(&canonical_ref(question_id), Like::new(author))?;
        self.persist(room_id, &room).await
    }

    /// Removing a like that does not exist is not an error.
    pub async fn deslike_question(
        &self,
        room_id: &str,
        question_id: &str,
        like_id: &str,
    ) -> Result<Room, RoomServiceError> {
        let mut room = self.store.find_by_id(room_id).await?;
        room.deslike_question(&canonical_ref(question_id), &canonical_ref(like_id))?;
        self.persist(room_id, &room).await
    }

    pub async fn update_question(
        &self,
        user_id: &str,
        room_id: &str,
        question_id: &str,
        update: QuestionUpdate,
    ) -> Result<Room, RoomServiceError> {
        update.validate()?;

        let mut room = self.load_authorized(user_id, room_id).await?;
        update.apply(&mut room, &canonical_ref(question_id))?;
        self.persist(room_id, &room).await
    }

    pub async fn delete_question(
        &self,
        user_id: &str,
        room_id: &str,
        question_id: &str,
    ) -> Result<Room, RoomServiceError> {
        let mut room = self.load_authorized(user_id, room_id).await?;
        room.delete_question(&canonical_ref(question_id));
        self.persist(room_id, &room).await
    }

    pub async fn end_room(&self, user_id: &str, room_id: &str) -> Result<Room, RoomServiceError> {
        let mut room = self.load_authorized(user_id, room_id).await?;
        room.end();
        let ended = self.persist(room_id, &room).await?;
        info!(room_id, "room ended");
        Ok(ended)
    }

    async fn load_authorized(&self, user_id: &str, room_id: &str) -> Result<Room, RoomServiceError> {
        let room = self.store.find_by_id(room_id).await?;
        if !room.is_authored_by(&canonical_ref(user_id)) {
            debug!(room_id, user_id, "caller is not the room author");
            return Err(RoomServiceError::Forbidden);
        }
        Ok(room)
    }

    async fn persist(&self, room_id: &str, room: &Room) -> Result<Room, RoomServiceError> {
        Ok(self.store.update(room_id, room).await?)
    }
}

/// Authors are compared by identity string, so the id is stored in its
/// canonical rendering. An unparseable id is an `InvalidReference`.
fn canonical_author(mut author: Author) -> Result<Author, RoomServiceError> {
    let id: UserId = author.id.parse()?;
    author.id = id.to_string();
    Ok(author)
}

/// Canonical rendering of a question/like/user reference. Stored references
/// are always canonical, so input that does not parse is passed through and
/// simply matches nothing.
fn canonical_ref(raw: &str) -> String {
    raw.parse::<DocumentId>()
        .map(|id| id.to_string())
        .unwrap_or_else(|_| raw.to_string())
}
