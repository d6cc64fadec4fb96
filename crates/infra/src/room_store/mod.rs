//! Room persistence boundary.
//!
//! Rooms are stored as whole documents (room + nested questions + nested likes).
//! The [`mapper`] turns the domain aggregate into the stored shape, assigning
//! identities to nested elements on first write, and back again on read.

pub mod document;
pub mod in_memory;
pub mod mapper;
pub mod postgres;
pub mod r#trait;

pub use document::{AuthorDocument, LikeDocument, QuestionDocument, RoomDocument, RoomPatch};
pub use in_memory::InMemoryRoomStore;
pub use mapper::RoomMapper;
pub use postgres::PostgresRoomStore;
pub use r#trait::{RoomStore, RoomStoreError};

use letmeask_core::{DocumentId, DomainError};

/// Parse an externally supplied room identifier into its store key.
pub(crate) fn parse_room_id(room_id: &str) -> Result<DocumentId, RoomStoreError> {
    room_id
        .parse()
        .map_err(|e: DomainError| RoomStoreError::invalid_reference("room id", e))
}
