//! Translation between the Room aggregate and its stored document.
//!
//! Writing (domain → document):
//! - an empty question/like identity gets a fresh one from the [`IdentityAssigner`];
//! - a non-empty identity must parse into a [`DocumentId`] and is kept as-is;
//! - every author identity must parse, otherwise the whole mapping fails.
//!
//! Reading (document → domain) only renders keys back to strings.

use chrono::{DateTime, Utc};

use letmeask_core::{DocumentId, DomainError, IdentityAssigner, TimeOrderedIds};
use letmeask_rooms::{Author, Like, Question, Room, RoomParts};

use super::document::{AuthorDocument, LikeDocument, QuestionDocument, RoomDocument, RoomPatch};
use super::r#trait::RoomStoreError;

#[derive(Debug, Clone, Default)]
pub struct RoomMapper<A = TimeOrderedIds> {
    assigner: A,
}

impl<A: IdentityAssigner> RoomMapper<A> {
    pub fn new(assigner: A) -> Self {
        Self { assigner }
    }

    /// Map a room that is about to be inserted. The room always gets a fresh
    /// identity and both timestamps are set to `now`.
    pub fn to_new_document(&self, room: &Room, now: DateTime<Utc>) -> Result<RoomDocument, RoomStoreError> {
        Ok(RoomDocument {
            id: self.assigner.new_identity(),
            title: room.title().to_string(),
            author: author_to_document(room.author(), "room author")?,
            questions: self.questions_to_documents(room.questions())?,
            ended_at: room.ended_at(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Map a room into the whole-field replace payload used by `update`.
    pub fn to_patch(&self, room: &Room, now: DateTime<Utc>) -> Result<RoomPatch, RoomStoreError> {
        Ok(RoomPatch {
            title: room.title().to_string(),
            questions: self.questions_to_documents(room.questions())?,
            ended_at: room.ended_at(),
            updated_at: now,
        })
    }

    pub fn questions_to_documents(&self, questions: &[Question]) -> Result<Vec<QuestionDocument>, RoomStoreError> {
        questions.iter().map(|q| self.question_to_document(q)).collect()
    }

    fn question_to_document(&self, question: &Question) -> Result<QuestionDocument, RoomStoreError> {
        let likes = question
            .likes
            .iter()
            .map(|l| self.like_to_document(l))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QuestionDocument {
            id: self.resolve_identity(&question.id, "question id")?,
            content: question.content.clone(),
            is_highlighted: question.is_highlighted,
            is_answered: question.is_answered,
            author: author_to_document(&question.author, "question author")?,
            likes,
            created_at: question.created_at,
        })
    }

    fn like_to_document(&self, like: &Like) -> Result<LikeDocument, RoomStoreError> {
        Ok(LikeDocument {
            id: self.resolve_identity(&like.id, "like id")?,
            author: author_to_document(&like.author, "like author")?,
            created_at: like.created_at,
        })
    }

    fn resolve_identity(&self, raw: &str, what: &str) -> Result<DocumentId, RoomStoreError> {
        if raw.is_empty() {
            return Ok(self.assigner.new_identity());
        }
        parse_reference(raw, what)
    }
}

fn parse_reference(raw: &str, what: &str) -> Result<DocumentId, RoomStoreError> {
    raw.parse()
        .map_err(|e: DomainError| RoomStoreError::invalid_reference(what, e))
}

pub fn author_to_document(author: &Author, what: &str) -> Result<AuthorDocument, RoomStoreError> {
    Ok(AuthorDocument {
        id: parse_reference(&author.id, what)?,
        name: author.name.clone(),
        avatar: author.avatar.clone(),
    })
}

fn author_from_document(author: AuthorDocument) -> Author {
    Author::new(author.id.to_string(), author.name, author.avatar)
}

pub fn document_to_room(document: RoomDocument) -> Room {
    let questions = document
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id.to_string(),
            content: q.content,
            is_highlighted: q.is_highlighted,
            is_answered: q.is_answered,
            author: author_from_document(q.author),
            likes: q
                .likes
                .into_iter()
                .map(|l| Like {
                    id: l.id.to_string(),
                    author: author_from_document(l.author),
                    created_at: l.created_at,
                })
                .collect(),
            created_at: q.created_at,
        })
        .collect();

    Room::from_parts(RoomParts {
        id: document.id.to_string(),
        title: document.title,
        author: author_from_document(document.author),
        questions,
        ended_at: document.ended_at,
        created_at: document.created_at,
        updated_at: document.updated_at,
    })
}
