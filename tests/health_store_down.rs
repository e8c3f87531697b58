//! Health and readiness when the store cannot be reached.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use items_api::{
    app, AppError, AppState, Backend, Item, ItemFields, ItemPatch, ItemStore, MemoryStore, SeedOutcome,
    Settings,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Serves data from memory but fails every connectivity check, like a pool
/// whose database went away.
#[derive(Default)]
struct UnreachableStore {
    inner: MemoryStore,
}

#[async_trait]
impl ItemStore for UnreachableStore {
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Item>, AppError> {
        self.inner.list(skip, limit).await
    }

    async fn get(&self, id: i64) -> Result<Option<Item>, AppError> {
        self.inner.get(id).await
    }

    async fn create(&self, id: Option<i64>, fields: ItemFields) -> Result<Item, AppError> {
        self.inner.create(id, fields).await
    }

    async fn replace_all(&self, id: i64, fields: ItemFields) -> Result<Option<Item>, AppError> {
        self.inner.replace_all(id, fields).await
    }

    async fn replace_partial(&self, id: i64, patch: ItemPatch) -> Result<Option<Item>, AppError> {
        self.inner.replace_partial(id, patch).await
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        self.inner.delete(id).await
    }

    async fn count(&self) -> Result<u64, AppError> {
        self.inner.count().await
    }

    async fn seed_if_empty(&self, samples: Vec<ItemFields>) -> Result<SeedOutcome, AppError> {
        self.inner.seed_if_empty(samples).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

fn router() -> Router {
    let settings = Settings::for_backend(Backend::Memory);
    let state = AppState::new(Arc::new(UnreachableStore::default()), &settings);
    app(state, &settings).unwrap_or_else(|err| panic!("failed to build router: {err}"))
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .header(header::HOST, "localhost")
        .body(Body::empty())
        .unwrap();
    let response = router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_stays_200_but_reports_degraded() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    let database = body["database"].as_str().unwrap();
    assert!(database.starts_with("disconnected: "), "{database}");
}

#[tokio::test]
async fn ready_is_503_not_ready() {
    let (status, body) = get("/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        json!({"status": "not_ready", "ready": false, "checks": {"api": "ok", "database": "error"}})
    );
}

#[tokio::test]
async fn liveness_ignores_the_store() {
    let (status, body) = get("/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}
