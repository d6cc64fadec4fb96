use serde::Deserialize;

use letmeask_core::UserId;
use letmeask_infra::QuestionUpdate;
use letmeask_rooms::Author;

// -------------------------
// Request DTOs
// -------------------------

/// Author details as sent by clients.
///
/// A missing or blank `id` means "the authenticated caller".
#[derive(Debug, Deserialize)]
pub struct AuthorPayload {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

impl AuthorPayload {
    pub fn into_author(self, caller: UserId) -> Author {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| caller.to_string());
        Author::new(id, self.name, self.avatar)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub title: String,
    pub author: AuthorPayload,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub content: String,
    pub author: AuthorPayload,
}

#[derive(Debug, Deserialize)]
pub struct LikeQuestionRequest {
    pub author: AuthorPayload,
}

pub type UpdateQuestionRequest = QuestionUpdate;
