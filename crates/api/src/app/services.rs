use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use letmeask_infra::{InMemoryRoomStore, PostgresRoomStore, RoomService, RoomStore, RoomStoreError};

use crate::config::StorageConfig;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to connect to Postgres: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("failed to prepare room schema: {0}")]
    Schema(#[from] RoomStoreError),
}

/// Shared application services, handed to handlers via `Extension`.
pub struct AppServices {
    pub rooms: RoomService<Arc<dyn RoomStore>>,
}

impl AppServices {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self {
            rooms: RoomService::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRoomStore::new()))
    }
}

pub async fn build_services(storage: &StorageConfig) -> Result<AppServices, StartupError> {
    match storage {
        StorageConfig::InMemory => {
            info!("using in-memory room store");
            Ok(AppServices::in_memory())
        }
        StorageConfig::Postgres { database_url } => {
            let pool = PgPool::connect(database_url).await?;
            let store = PostgresRoomStore::new(pool);
            store.ensure_schema().await?;
            info!("using postgres room store");
            Ok(AppServices::new(Arc::new(store)))
        }
    }
}
