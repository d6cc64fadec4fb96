//! Infrastructure layer: room persistence and application orchestration.

pub mod room_service;
pub mod room_store;

pub use room_service::{QuestionUpdate, RoomService, RoomServiceError};
pub use room_store::{InMemoryRoomStore, PostgresRoomStore, RoomStore, RoomStoreError};
