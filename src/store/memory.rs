//! In-process store: an ordered list of items guarded by an async lock.
//! Writers are serialized; nothing else is promised.

use super::ItemStore;
use crate::error::AppError;
use crate::model::{next_id, Item, ItemFields, ItemPatch, SeedOutcome};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<Vec<Item>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `items`, kept in the given order.
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

fn insert(items: &mut Vec<Item>, id: Option<i64>, fields: ItemFields) -> Result<Item, AppError> {
    let id = match id {
        Some(id) if items.iter().any(|i| i.id == id) => {
            return Err(AppError::Conflict(format!("Item {} already exists", id)));
        }
        Some(id) => id,
        None => next_id(items.iter().map(|i| i.id))?,
    };
    let item = Item::from_fields(id, fields);
    items.push(item.clone());
    Ok(item)
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Item>, AppError> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Item>, AppError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|i| i.id == id).cloned())
    }

    async fn create(&self, id: Option<i64>, fields: ItemFields) -> Result<Item, AppError> {
        let mut items = self.items.write().await;
        insert(&mut items, id, fields)
    }

    async fn replace_all(&self, id: i64, fields: ItemFields) -> Result<Option<Item>, AppError> {
        let mut items = self.items.write().await;
        Ok(items.iter_mut().find(|i| i.id == id).map(|item| {
            item.replace_fields(fields);
            item.clone()
        }))
    }

    async fn replace_partial(&self, id: i64, patch: ItemPatch) -> Result<Option<Item>, AppError> {
        let mut items = self.items.write().await;
        Ok(items.iter_mut().find(|i| i.id == id).map(|item| {
            patch.apply(item);
            item.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut items = self.items.write().await;
        match items.iter().position(|i| i.id == id) {
            Some(pos) => {
                items.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.items.read().await.len() as u64)
    }

    async fn seed_if_empty(&self, samples: Vec<ItemFields>) -> Result<SeedOutcome, AppError> {
        let mut items = self.items.write().await;
        if !items.is_empty() {
            return Ok(SeedOutcome::AlreadySeeded(items.len() as u64));
        }
        let mut inserted = 0u64;
        for fields in samples {
            insert(&mut items, None, fields)?;
            inserted += 1;
        }
        Ok(SeedOutcome::Inserted(inserted))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
