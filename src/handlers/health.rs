//! Root, health and readiness handlers. Store failures are reported in the
//! body, never propagated as request errors.

use crate::response::Message;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthBody {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
    pub timestamp: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadyChecks {
    pub api: String,
    pub database: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadyBody {
    pub status: String,
    pub ready: bool,
    pub checks: ReadyChecks,
}

#[utoipa::path(get, path = "/", responses((status = 200, body = Message)))]
pub async fn root() -> Json<Message> {
    Json(Message::success("Welcome to the items API"))
}

#[utoipa::path(get, path = "/health", responses((status = 200, body = HealthBody)))]
pub async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    let (status, database) = match state.items.ping().await {
        Ok(()) if state.items.backend() == "memory" => ("healthy", "memory".to_string()),
        Ok(()) => ("healthy", "connected".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "health check: store unreachable");
            ("degraded", format!("disconnected: {}", e))
        }
    };
    Json(HealthBody {
        status: status.into(),
        service: env!("CARGO_PKG_NAME").into(),
        version: env!("CARGO_PKG_VERSION").into(),
        database,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Liveness only; never touches the store.
#[utoipa::path(get, path = "/healthz", responses((status = 200, description = "`{\"status\": \"ok\"}`")))]
pub async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, body = ReadyBody),
        (status = 503, description = "Store unreachable", body = ReadyBody)
    )
)]
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyBody>) {
    let database_ok = match state.items.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check: store unreachable");
            false
        }
    };
    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(ReadyBody {
            status: (if database_ok { "ready" } else { "not_ready" }).into(),
            ready: database_ok,
            checks: ReadyChecks {
                api: "ok".into(),
                database: (if database_ok { "ok" } else { "error" }).into(),
            },
        }),
    )
}
