//! Q&A rooms domain module.
//!
//! This crate contains the Room aggregate and its nested questions and likes,
//! implemented purely as in-memory domain logic (no IO, no HTTP, no storage).

pub mod author;
pub mod question;
pub mod room;

pub use author::Author;
pub use question::{Like, Question};
pub use room::{Room, RoomParts};
