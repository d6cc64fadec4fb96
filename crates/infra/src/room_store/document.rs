//! Stored document shapes.
//!
//! ```text
//! Room     { id, title, author{id,name,avatar}, questions[Question], ended_at?, created_at, updated_at }
//! Question { id, content, is_highlighted, is_answered, author{...}, likes[Like], created_at }
//! Like     { id, author{...}, created_at }
//! ```
//!
//! `questions`/`likes` are omitted entirely when empty, and `ended_at` when unset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::warn;

use letmeask_core::DocumentId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDocument {
    pub id: DocumentId,
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeDocument {
    pub id: DocumentId,
    pub author: AuthorDocument,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDocument {
    pub id: DocumentId,
    pub content: String,
    #[serde(default)]
    pub is_highlighted: bool,
    #[serde(default)]
    pub is_answered: bool,
    pub author: AuthorDocument,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub likes: Vec<LikeDocument>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDocument {
    pub id: DocumentId,
    pub title: String,
    pub author: AuthorDocument,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<QuestionDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whole-field replace payload written by `update`.
///
/// Applying it removes the stored `questions` key before merging, so an empty
/// question collection ends up omitted rather than stored as `[]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomPatch {
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<QuestionDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl RoomPatch {
    pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Apply the patch to a stored room object in place.
    pub fn apply_to(&self, stored: &mut Map<String, JsonValue>) -> Result<(), serde_json::Error> {
        stored.remove("questions");
        if let JsonValue::Object(fields) = self.to_json()? {
            stored.extend(fields);
        }
        Ok(())
    }
}

// Read-side shapes: the room envelope must decode, nested elements may not.

#[derive(Deserialize)]
struct StoredRoom {
    id: DocumentId,
    title: String,
    author: AuthorDocument,
    #[serde(default)]
    questions: Option<Vec<JsonValue>>,
    #[serde(default)]
    ended_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct StoredQuestion {
    id: DocumentId,
    content: String,
    #[serde(default)]
    is_highlighted: bool,
    #[serde(default)]
    is_answered: bool,
    author: AuthorDocument,
    #[serde(default)]
    likes: Option<Vec<JsonValue>>,
    created_at: DateTime<Utc>,
}

/// Decode a stored room into presentation order.
///
/// Questions that fail to decode or have blank content are dropped, as are
/// likes that fail to decode. Questions and likes come back newest first.
pub fn decode_room_document(stored: JsonValue) -> Result<RoomDocument, serde_json::Error> {
    let room: StoredRoom = serde_json::from_value(stored)?;

    let mut questions: Vec<QuestionDocument> = room
        .questions
        .unwrap_or_default()
        .into_iter()
        .filter_map(|raw| decode_question(room.id, raw))
        .collect();
    questions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

    Ok(RoomDocument {
        id: room.id,
        title: room.title,
        author: room.author,
        questions,
        ended_at: room.ended_at,
        created_at: room.created_at,
        updated_at: room.updated_at,
    })
}

fn decode_question(room_id: DocumentId, raw: JsonValue) -> Option<QuestionDocument> {
    let question: StoredQuestion = match serde_json::from_value(raw) {
        Ok(q) => q,
        Err(err) => {
            warn!(%room_id, error = %err, "dropping malformed question");
            return None;
        }
    };

    if question.content.trim().is_empty() {
        warn!(%room_id, question_id = %question.id, "dropping question without content");
        return None;
    }

    let mut likes: Vec<LikeDocument> = question
        .likes
        .unwrap_or_default()
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<LikeDocument>(raw) {
            Ok(like) => Some(like),
            Err(err) => {
                warn!(%room_id, question_id = %question.id, error = %err, "dropping malformed like");
                None
            }
        })
        .collect();
    likes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

    Some(QuestionDocument {
        id: question.id,
        content: question.content,
        is_highlighted: question.is_highlighted,
        is_answered: question.is_answered,
        author: question.author,
        likes,
        created_at: question.created_at,
    })
}
