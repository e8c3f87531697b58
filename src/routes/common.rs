//! Common routes: root, health, liveness, readiness, OpenAPI document.

use crate::handlers::health::{health, healthz, ready, root};
use crate::openapi::openapi_json;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/healthz", get(healthz))
        .route("/ready", get(ready))
        .route("/openapi.json", get(openapi_json))
        .with_state(state)
}
