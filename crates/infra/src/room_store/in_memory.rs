use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use serde_json::Value as JsonValue;

use letmeask_core::{DocumentId, IdentityAssigner, TimeOrderedIds};
use letmeask_rooms::Room;

use super::document::decode_room_document;
use super::mapper::{RoomMapper, document_to_room};
use super::parse_room_id;
use super::r#trait::{RoomStore, RoomStoreError};

/// In-memory room store keeping the stored JSON documents.
///
/// Intended for tests/dev. Documents go through the same encode/decode path
/// as the Postgres store so ordering and sanitation behave identically.
#[derive(Debug, Default)]
pub struct InMemoryRoomStore<A = TimeOrderedIds> {
    documents: RwLock<HashMap<DocumentId, JsonValue>>,
    mapper: RoomMapper<A>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: IdentityAssigner> InMemoryRoomStore<A> {
    pub fn with_assigner(assigner: A) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            mapper: RoomMapper::new(assigner),
        }
    }

    /// Store a raw document under `id`, bypassing the mapper.
    pub fn insert_raw(&self, id: DocumentId, document: JsonValue) -> Result<(), RoomStoreError> {
        let mut docs = self
            .documents
            .write()
            .map_err(|_| RoomStoreError::storage("insert_raw", "lock poisoned"))?;
        docs.insert(id, document);
        Ok(())
    }

    /// The raw stored document, if any.
    pub fn raw(&self, id: DocumentId) -> Result<Option<JsonValue>, RoomStoreError> {
        let docs = self
            .documents
            .read()
            .map_err(|_| RoomStoreError::storage("raw", "lock poisoned"))?;
        Ok(docs.get(&id).cloned())
    }

    fn read(&self, id: DocumentId) -> Result<Room, RoomStoreError> {
        let stored = self.raw(id)?.ok_or(RoomStoreError::RoomNotFound)?;
        let document =
            decode_room_document(stored).map_err(|e| RoomStoreError::storage("decode room", e))?;
        Ok(document_to_room(document))
    }
}

#[async_trait::async_trait]
impl<A: IdentityAssigner> RoomStore for InMemoryRoomStore<A> {
    async fn create(&self, room: &Room) -> Result<Room, RoomStoreError> {
        let document = self.mapper.to_new_document(room, Utc::now())?;
        let id = document.id;
        let json =
            serde_json::to_value(&document).map_err(|e| RoomStoreError::storage("encode room", e))?;
        self.insert_raw(id, json)?;
        self.read(id)
    }

    async fn find_by_id(&self, room_id: &str) -> Result<Room, RoomStoreError> {
        let id = parse_room_id(room_id)?;
        self.read(id)
    }

    async fn update(&self, room_id: &str, room: &Room) -> Result<Room, RoomStoreError> {
        let id = parse_room_id(room_id)?;
        // Mapping fails before anything is touched.
        let patch = self.mapper.to_patch(room, Utc::now())?;

        {
            let mut docs = self
                .documents
                .write()
                .map_err(|_| RoomStoreError::storage("update", "lock poisoned"))?;
            let stored = docs.get_mut(&id).ok_or(RoomStoreError::RoomNotFound)?;
            let JsonValue::Object(fields) = stored else {
                return Err(RoomStoreError::storage("update", "stored room is not an object"));
            };
            patch
                .apply_to(fields)
                .map_err(|e| RoomStoreError::storage("encode patch", e))?;
        }

        self.read(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use letmeask_core::AggregateRoot;
    use letmeask_rooms::{Author, Like, Question};
    use serde_json::json;

    fn author(id: &DocumentId, name: &str) -> Author {
        Author::new(id.to_string(), name, "")
    }

    async fn room_with_question(store: &InMemoryRoomStore) -> (Room, DocumentId) {
        let owner = DocumentId::new();
        let created = store.create(&Room::new("Weekly Q&A", author(&owner, "Ana"))).await.unwrap();
        let mut room = created.clone();
        room.add_question(Question::new("Why Rust?", author(&owner, "Ana")));
        let updated = store.update(created.id(), &room).await.unwrap();
        (updated, owner)
    }

    #[tokio::test]
    async fn create_assigns_identity_and_timestamps() {
        let store = InMemoryRoomStore::new();
        let owner = DocumentId::new();

        let room = store.create(&Room::new("Weekly Q&A", author(&owner, "Ana"))).await.unwrap();

        assert!(!room.id().is_empty());
        assert_eq!(room.title(), "Weekly Q&A");
        assert_eq!(room.created_at(), room.updated_at());
        assert!(room.questions().is_empty());

        let id: DocumentId = room.id().parse().unwrap();
        let raw = store.raw(id).unwrap().unwrap();
        assert!(raw.get("questions").is_none());
        assert!(raw.get("ended_at").is_none());
    }

    #[tokio::test]
    async fn identities_are_stable_across_updates() {
        let store = InMemoryRoomStore::new();
        let (room, owner) = room_with_question(&store).await;
        let question_id = room.questions()[0].id.clone();
        assert!(!question_id.is_empty());

        let mut room = room;
        room.like_question(&question_id, Like::new(author(&owner, "Ana"))).unwrap();
        room.add_question(Question::new("And Go?", author(&owner, "Ana")));
        let room = store.update(room.id(), &room).await.unwrap();

        let reread = store.find_by_id(room.id()).await.unwrap();
        assert_eq!(reread, room);
        let kept = reread.question(&question_id).expect("question kept its id");
        assert_eq!(kept.likes.len(), 1);
        assert!(!kept.likes[0].id.is_empty());
        assert_eq!(reread.questions().len(), 2);
        // newest first
        assert_eq!(reread.questions()[0].content, "And Go?");
    }

    #[tokio::test]
    async fn concurrent_writers_resolve_as_last_write_wins() {
        let store = InMemoryRoomStore::new();
        let (room, owner) = room_with_question(&store).await;

        let mut first = store.find_by_id(room.id()).await.unwrap();
        let mut second = store.find_by_id(room.id()).await.unwrap();
        first.add_question(Question::new("from first", author(&owner, "Ana")));
        second.add_question(Question::new("from second", author(&owner, "Ana")));

        store.update(room.id(), &first).await.unwrap();
        store.update(room.id(), &second).await.unwrap();

        let stored = store.find_by_id(room.id()).await.unwrap();
        let contents: Vec<&str> = stored.questions().iter().map(|q| q.content.as_str()).collect();
        assert_eq!(contents, vec!["from second", "Why Rust?"]);
    }

    #[tokio::test]
    async fn removing_all_questions_omits_the_field() {
        let store = InMemoryRoomStore::new();
        let (mut room, _) = room_with_question(&store).await;
        let question_id = room.questions()[0].id.clone();
        room.delete_question(&question_id);

        let room = store.update(room.id(), &room).await.unwrap();

        assert!(room.questions().is_empty());
        let raw = store.raw(room.id().parse().unwrap()).unwrap().unwrap();
        assert!(raw.get("questions").is_none());
    }

    #[tokio::test]
    async fn ended_at_survives_an_update_without_it() {
        let store = InMemoryRoomStore::new();
        let (mut room, _) = room_with_question(&store).await;
        room.end();
        let ended = store.update(room.id(), &room).await.unwrap();
        let ended_at = ended.ended_at().expect("room ended");

        let mut stale = Room::from_parts({
            let mut parts = ended.clone().into_parts();
            parts.ended_at = None;
            parts
        });
        stale.delete_question(&ended.questions()[0].id);
        let after = store.update(stale.id(), &stale).await.unwrap();

        assert_eq!(after.ended_at(), Some(ended_at));
        assert!(after.questions().is_empty());
    }

    #[tokio::test]
    async fn invalid_reference_leaves_the_stored_room_untouched() {
        let store = InMemoryRoomStore::new();
        let (room, _) = room_with_question(&store).await;
        let id: DocumentId = room.id().parse().unwrap();
        let before = store.raw(id).unwrap();

        let mut bad = room.clone();
        bad.add_question(Question::new("who am I?", Author::new("not-a-uuid", "Bob", "")));
        let err = store.update(room.id(), &bad).await.unwrap_err();

        assert!(matches!(err, RoomStoreError::InvalidReference(_)));
        assert_eq!(store.raw(id).unwrap(), before);
    }

    #[tokio::test]
    async fn unknown_and_malformed_room_ids() {
        let store = InMemoryRoomStore::new();
        let owner = DocumentId::new();
        let room = Room::new("Weekly Q&A", author(&owner, "Ana"));

        let missing = DocumentId::new().to_string();
        assert_eq!(store.find_by_id(&missing).await.unwrap_err(), RoomStoreError::RoomNotFound);
        assert_eq!(store.update(&missing, &room).await.unwrap_err(), RoomStoreError::RoomNotFound);

        assert!(matches!(
            store.find_by_id("r-404").await.unwrap_err(),
            RoomStoreError::InvalidReference(_)
        ));
    }

    #[tokio::test]
    async fn corrupt_nested_elements_are_dropped_on_read() {
        let store = InMemoryRoomStore::new();
        let id = DocumentId::new();
        let owner = DocumentId::new();
        let owner_json = json!({ "id": owner, "name": "Ana", "avatar": "" });

        store
            .insert_raw(
                id,
                json!({
                    "id": id,
                    "title": "Imported",
                    "author": owner_json,
                    "questions": [
                        { "id": DocumentId::new(), "content": "kept", "author": owner_json,
                          "created_at": "2024-03-01T10:00:00Z",
                          "likes": [ { "id": DocumentId::new() } ] },
                        { "id": DocumentId::new(), "content": "   ", "author": owner_json,
                          "created_at": "2024-03-01T10:01:00Z" },
                        { "content": "no id" }
                    ],
                    "created_at": "2024-03-01T09:00:00Z",
                    "updated_at": "2024-03-01T09:00:00Z"
                }),
            )
            .unwrap();

        let room = store.find_by_id(&id.to_string()).await.unwrap();
        assert_eq!(room.questions().len(), 1);
        assert_eq!(room.questions()[0].content, "kept");
        assert!(room.questions()[0].likes.is_empty());
    }

    #[tokio::test]
    async fn corrupt_room_envelope_is_a_storage_error() {
        let store = InMemoryRoomStore::new();
        let id = DocumentId::new();
        store.insert_raw(id, json!({ "id": id, "title": 42 })).unwrap();

        let err = store.find_by_id(&id.to_string()).await.unwrap_err();
        assert!(matches!(err, RoomStoreError::Storage(_)));
    }
}
