//! Record store: single-table persistence for items, behind one trait so the
//! memory and PostgreSQL backends are interchangeable.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, ensure_items_table, PgStore};

use crate::config::{Backend, Settings};
use crate::error::AppError;
use crate::model::{Item, ItemFields, ItemPatch, SeedOutcome};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Up to `limit` items after skipping `skip`, in store order.
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Item>, AppError>;

    async fn get(&self, id: i64) -> Result<Option<Item>, AppError>;

    /// Insert an item. `id: None` assigns max(existing) + 1.
    async fn create(&self, id: Option<i64>, fields: ItemFields) -> Result<Item, AppError>;

    /// Overwrite all mutable fields. `None` when no item has `id`.
    async fn replace_all(&self, id: i64, fields: ItemFields) -> Result<Option<Item>, AppError>;

    /// Overwrite supplied fields only. `None` when no item has `id`.
    async fn replace_partial(&self, id: i64, patch: ItemPatch) -> Result<Option<Item>, AppError>;

    /// Returns false when nothing matched.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    async fn count(&self) -> Result<u64, AppError>;

    /// Insert `samples` only when the store is empty.
    async fn seed_if_empty(&self, samples: Vec<ItemFields>) -> Result<SeedOutcome, AppError>;

    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), AppError>;

    fn backend(&self) -> &'static str;
}

/// Open the store selected by `settings.backend`.
pub async fn connect(settings: &Settings) -> Result<Arc<dyn ItemStore>, AppError> {
    match &settings.backend {
        Backend::Memory => {
            tracing::info!("using in-memory item store");
            Ok(Arc::new(MemoryStore::new()))
        }
        Backend::Postgres(url) => {
            if let Err(e) = ensure_database_exists(url).await {
                tracing::warn!(error = %e, "could not verify database exists; connecting anyway");
            }
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(url)
                .await?;
            ensure_items_table(&pool).await?;
            tracing::info!(max_connections = settings.max_connections, "using postgres item store");
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}
