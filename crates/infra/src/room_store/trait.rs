use std::sync::Arc;

use thiserror::Error;

use letmeask_core::DomainError;
use letmeask_rooms::Room;

/// Room store operation error.
///
/// These are **infrastructure errors** as opposed to domain errors (validation,
/// nested "question not found").
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomStoreError {
    /// No stored room matches the requested identity.
    #[error("room not found")]
    RoomNotFound,

    /// An identity (room, question, like or author) could not be parsed into a
    /// store key. The whole write is aborted.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Underlying storage failed (connectivity, timeout, corrupt document).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl RoomStoreError {
    pub fn invalid_reference(what: &str, err: DomainError) -> Self {
        match err {
            DomainError::InvalidReference(msg) => Self::InvalidReference(format!("{what}: {msg}")),
            other => Self::InvalidReference(format!("{what}: {other}")),
        }
    }

    pub fn storage(operation: &str, err: impl core::fmt::Display) -> Self {
        Self::Storage(format!("{operation}: {err}"))
    }
}

/// Whole-aggregate room persistence.
///
/// ## Semantics
///
/// - `create` assigns the room's identity and timestamps, then re-reads.
/// - `find_by_id` returns questions newest first, likes newest first, and
///   silently drops nested elements that are incomplete.
/// - `update` replaces title, the full question collection and `updated_at`;
///   `ended_at` is only written when set, so it can never be cleared. Re-reads
///   after writing.
///
/// There is no version check. Two writers racing on the same room resolve as
/// last-write-wins.
#[async_trait::async_trait]
pub trait RoomStore: Send + Sync {
    async fn create(&self, room: &Room) -> Result<Room, RoomStoreError>;

    async fn find_by_id(&self, room_id: &str) -> Result<Room, RoomStoreError>;

    async fn update(&self, room_id: &str, room: &Room) -> Result<Room, RoomStoreError>;
}

#[async_trait::async_trait]
impl<S> RoomStore for Arc<S>
where
    S: RoomStore + ?Sized,
{
    async fn create(&self, room: &Room) -> Result<Room, RoomStoreError> {
        (**self).create(room).await
    }

    async fn find_by_id(&self, room_id: &str) -> Result<Room, RoomStoreError> {
        (**self).find_by_id(room_id).await
    }

    async fn update(&self, room_id: &str, room: &Room) -> Result<Room, RoomStoreError> {
        (**self).update(room_id, room).await
    }
}
