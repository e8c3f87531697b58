//! ItemService: validation and dispatch over an `ItemStore`.

use super::RequestValidator;
use crate::error::AppError;
use crate::model::{sample_items, Item, SeedOutcome};
use crate::store::ItemStore;
use serde_json::Value;
use std::sync::Arc;

pub const DEFAULT_LIMIT: u64 = 100;
pub const MAX_LIMIT: u64 = 1000;

#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// List items; `skip` defaults to 0, `limit` to 100 (max 1000).
    pub async fn list(&self, skip: Option<u64>, limit: Option<u64>) -> Result<Vec<Item>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        self.store.list(skip.unwrap_or(0), limit).await
    }

    pub async fn get(&self, id: i64) -> Result<Item, AppError> {
        self.store.get(id).await?.ok_or_else(AppError::item_not_found)
    }

    pub async fn create(&self, body: Value) -> Result<Item, AppError> {
        let body = RequestValidator::object(body)?;
        let new = RequestValidator::new_item(&body)?;
        let item = self.store.create(new.id, new.fields).await?;
        tracing::info!(id = item.id, name = %item.name, "item created");
        Ok(item)
    }

    /// Full replace: omitted optional fields are cleared.
    pub async fn replace(&self, id: i64, body: Value) -> Result<Item, AppError> {
        let body = RequestValidator::object(body)?;
        let fields = RequestValidator::fields(&body)?;
        let item = self
            .store
            .replace_all(id, fields)
            .await?
            .ok_or_else(AppError::item_not_found)?;
        tracing::info!(id, "item replaced");
        Ok(item)
    }

    /// Partial update: only supplied fields change.
    pub async fn update(&self, id: i64, body: Value) -> Result<Item, AppError> {
        let body = RequestValidator::object(body)?;
        let patch = RequestValidator::patch(&body)?;
        let item = self
            .store
            .replace_partial(id, patch)
            .await?
            .ok_or_else(AppError::item_not_found)?;
        tracing::info!(id, "item updated");
        Ok(item)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(AppError::item_not_found());
        }
        tracing::info!(id, "item deleted");
        Ok(())
    }

    pub async fn seed(&self) -> Result<SeedOutcome, AppError> {
        let outcome = self.store.seed_if_empty(sample_items()).await?;
        tracing::info!(?outcome, "seed");
        Ok(outcome)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn service() -> ItemService {
        ItemService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn not_found_is_distinct() {
        let svc = service();
        assert!(svc.get(1).await.unwrap_err().is_not_found());
        assert!(svc.delete(1).await.unwrap_err().is_not_found());
        assert!(svc
            .replace(1, json!({"name": "a", "price": 1}))
            .await
            .unwrap_err()
            .is_not_found());
        assert!(svc.update(1, json!({"price": 1})).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn validation_runs_before_lookup() {
        let svc = service();
        let err = svc.replace(1, json!({"name": "a"})).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn replace_ignores_body_id() {
        let svc = service();
        svc.create(json!({"name": "Laptop", "price": 999.99})).await.unwrap();
        let item = svc
            .replace(1, json!({"id": 42, "name": "Notebook", "price": 1}))
            .await
            .unwrap();
        assert_eq!(item.id, 1);
        assert!(svc.get(42).await.is_err());
    }

    #[tokio::test]
    async fn limit_is_capped() {
        let svc = service();
        for i in 0..3 {
            svc.create(json!({"name": format!("n{i}"), "price": 1})).await.unwrap();
        }
        assert_eq!(svc.list(None, None).await.unwrap().len(), 3);
        assert_eq!(svc.list(Some(1), Some(1)).await.unwrap()[0].name, "n1");
        assert_eq!(svc.list(None, Some(u64::MAX)).await.unwrap().len(), 3);
    }
}
