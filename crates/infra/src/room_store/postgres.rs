//! Postgres-backed room store.
//!
//! Each room is one row holding the whole document as JSONB:
//!
//! ```sql
//! CREATE TABLE rooms (id UUID PRIMARY KEY, document JSONB NOT NULL)
//! ```
//!
//! `update` is a single statement: the stored `questions` key is removed and
//! the patch is merged on top, so `ended_at` stays put when the patch omits it.
//!
//! ## Error Mapping
//!
//! | SQLx Error | RoomStoreError |
//! |------------|----------------|
//! | Database (any code) | `Storage` |
//! | PoolClosed | `Storage` |
//! | Other | `Storage` |
//!
//! `RoomNotFound` comes from zero rows read or affected, never from SQLx.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};
use tracing::instrument;

use letmeask_core::{DocumentId, IdentityAssigner, TimeOrderedIds};
use letmeask_rooms::Room;

use super::document::decode_room_document;
use super::mapper::{RoomMapper, document_to_room};
use super::parse_room_id;
use super::r#trait::{RoomStore, RoomStoreError};

#[derive(Debug, Clone)]
pub struct PostgresRoomStore<A = TimeOrderedIds> {
    pool: Arc<PgPool>,
    mapper: Arc<RoomMapper<A>>,
}

impl PostgresRoomStore {
    pub fn new(pool: PgPool) -> Self {
        Self::with_assigner(pool, TimeOrderedIds)
    }
}

impl<A: IdentityAssigner> PostgresRoomStore<A> {
    pub fn with_assigner(pool: PgPool, assigner: A) -> Self {
        Self {
            pool: Arc::new(pool),
            mapper: Arc::new(RoomMapper::new(assigner)),
        }
    }

    /// Create the `rooms` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), RoomStoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS rooms (
                id UUID PRIMARY KEY,
                document JSONB NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(room_id = %id), err)]
    async fn load(&self, id: DocumentId) -> Result<Room, RoomStoreError> {
        let row = sqlx::query("SELECT document FROM rooms WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?
            .ok_or(RoomStoreError::RoomNotFound)?;

        let stored: JsonValue = row
            .try_get("document")
            .map_err(|e| map_sqlx_error("find_by_id", e))?;
        let document =
            decode_room_document(stored).map_err(|e| RoomStoreError::storage("decode room", e))?;
        Ok(document_to_room(document))
    }
}

#[async_trait::async_trait]
impl<A: IdentityAssigner> RoomStore for PostgresRoomStore<A> {
    #[instrument(skip(self, room), fields(title = %room.title()), err)]
    async fn create(&self, room: &Room) -> Result<Room, RoomStoreError> {
        let document = self.mapper.to_new_document(room, Utc::now())?;
        let id = document.id;
        let json =
            serde_json::to_value(&document).map_err(|e| RoomStoreError::storage("encode room", e))?;

        sqlx::query("INSERT INTO rooms (id, document) VALUES ($1, $2)")
            .bind(id.as_uuid())
            .bind(json)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("create", e))?;

        self.load(id).await
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, room_id: &str) -> Result<Room, RoomStoreError> {
        let id = parse_room_id(room_id)?;
        self.load(id).await
    }

    #[instrument(skip(self, room), err)]
    async fn update(&self, room_id: &str, room: &Room) -> Result<Room, RoomStoreError> {
        let id = parse_room_id(room_id)?;
        let patch = self
            .mapper
            .to_patch(room, Utc::now())?
            .to_json()
            .map_err(|e| RoomStoreError::storage("encode patch", e))?;

        let result = sqlx::query(
            r#"
            UPDATE rooms
            SET document = (document - 'questions') || $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(patch)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(RoomStoreError::RoomNotFound);
        }

        self.load(id).await
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RoomStoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            RoomStoreError::Storage(format!(
                "database error in {operation} ({code}): {}",
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            RoomStoreError::Storage(format!("connection pool closed in {operation}"))
        }
        other => RoomStoreError::storage(operation, other),
    }
}

#[cfg(test)]
mod tests {
    //! Runs against a real database only when `DATABASE_URL` is set.

    use super::*;
    use letmeask_core::AggregateRoot;
    use letmeask_rooms::{Author, Like, Question};

    async fn store() -> Option<PostgresRoomStore> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url).await.expect("connect to DATABASE_URL");
        let store = PostgresRoomStore::new(pool);
        store.ensure_schema().await.expect("ensure schema");
        Some(store)
    }

    fn author(name: &str) -> Author {
        Author::new(DocumentId::new().to_string(), name, "")
    }

    #[test]
    fn database_errors_become_storage_errors() {
        let err = map_sqlx_error("create", sqlx::Error::PoolClosed);
        assert!(matches!(err, RoomStoreError::Storage(ref m) if m.contains("create")));
    }

    #[tokio::test]
    async fn update_replaces_questions_and_keeps_ended_at() {
        let Some(store) = store().await else {
            return;
        };
        let owner = author("Ana");
        let created = store.create(&Room::new("Weekly Q&A", owner.clone())).await.unwrap();

        let mut room = created.clone();
        room.add_question(Question::new("Why Rust?", owner.clone()));
        room.end();
        let room = store.update(created.id(), &room).await.unwrap();
        let question_id = room.questions()[0].id.clone();
        let ended_at = room.ended_at();

        let mut liked = room.clone();
        liked.like_question(&question_id, Like::new(author("Bob"))).unwrap();
        let mut parts = liked.into_parts();
        parts.ended_at = None;
        let liked = store.update(created.id(), &Room::from_parts(parts)).await.unwrap();

        assert_eq!(liked.ended_at(), ended_at);
        assert_eq!(liked.questions()[0].id, question_id);
        assert_eq!(liked.questions()[0].likes.len(), 1);
        assert_eq!(store.find_by_id(created.id()).await.unwrap(), liked);
    }

    #[tokio::test]
    async fn unknown_room_is_not_found() {
        let Some(store) = store().await else {
            return;
        };
        let missing = DocumentId::new().to_string();
        assert_eq!(store.find_by_id(&missing).await.unwrap_err(), RoomStoreError::RoomNotFound);
        let room = Room::new("x", author("Ana"));
        assert_eq!(store.update(&missing, &room).await.unwrap_err(), RoomStoreError::RoomNotFound);
    }
}
