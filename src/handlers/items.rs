//! Item CRUD handlers plus `/seed`.

use crate::config::UpdateMode;
use crate::error::ErrorBody;
use crate::extractors::{ItemId, JsonBody, QueryParams};
use crate::model::{Item, NewItem, SeedOutcome};
use crate::response::Message;
use crate::state::AppState;
use axum::{extract::State, response::Response, Json};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Items to skip from the front (default 0).
    pub skip: Option<u64>,
    /// Maximum items returned (default 100, capped at 1000).
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/items",
    params(ListParams),
    responses((status = 200, description = "Items in store order", body = Vec<Item>))
)]
pub async fn list(State(state): State<AppState>, QueryParams(params): QueryParams<ListParams>) -> Response {
    let result = state.items.list(params.skip, params.limit).await;
    state.presentation.respond(result.map(Json))
}

#[utoipa::path(
    get,
    path = "/items/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item, or a soft error envelope", body = Item),
        (status = 404, description = "Item not found (structured errors)", body = ErrorBody)
    )
)]
pub async fn read(State(state): State<AppState>, ItemId(id): ItemId) -> Response {
    let result = state.items.get(id).await;
    state.presentation.respond(result.map(Json))
}

#[utoipa::path(
    post,
    path = "/items",
    request_body = NewItem,
    responses(
        (status = 200, description = "Created (soft errors)", body = Item),
        (status = 201, description = "Created (structured errors)", body = Item),
        (status = 409, description = "Supplied id already exists", body = ErrorBody),
        (status = 422, description = "Invalid payload", body = ErrorBody)
    )
)]
pub async fn create(State(state): State<AppState>, JsonBody(body): JsonBody) -> Response {
    let result = state.items.create(body).await;
    let status = state.presentation.created_status();
    state.presentation.respond(result.map(|item| (status, Json(item))))
}

/// PUT: full replace or merge, per the configured update mode.
#[utoipa::path(
    put,
    path = "/items/{id}",
    params(("id" = i64, Path, description = "Item id")),
    request_body = NewItem,
    responses(
        (status = 200, description = "Updated item, or a soft error envelope", body = Item),
        (status = 404, description = "Item not found (structured errors)", body = ErrorBody),
        (status = 422, description = "Invalid payload", body = ErrorBody)
    )
)]
pub async fn replace(
    State(state): State<AppState>,
    ItemId(id): ItemId,
    JsonBody(body): JsonBody,
) -> Response {
    let result = match state.update_mode {
        UpdateMode::Replace => state.items.replace(id, body).await,
        UpdateMode::Merge => state.items.update(id, body).await,
    };
    state.presentation.respond(result.map(Json))
}

/// PATCH: always a partial update.
#[utoipa::path(
    patch,
    path = "/items/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Updated item, or a soft error envelope", body = Item),
        (status = 404, description = "Item not found (structured errors)", body = ErrorBody),
        (status = 422, description = "Invalid payload", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    ItemId(id): ItemId,
    JsonBody(body): JsonBody,
) -> Response {
    let result = state.items.update(id, body).await;
    state.presentation.respond(result.map(Json))
}

#[utoipa::path(
    delete,
    path = "/items/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Deleted, or a soft error envelope", body = Message),
        (status = 404, description = "Item not found (structured errors)", body = ErrorBody)
    )
)]
pub async fn delete(State(state): State<AppState>, ItemId(id): ItemId) -> Response {
    let result = state.items.delete(id).await;
    state
        .presentation
        .respond(result.map(|()| Json(Message::success(format!("Item {} deleted", id)))))
}

#[utoipa::path(
    post,
    path = "/seed",
    responses((status = 200, description = "Seeded (success) or left untouched (info)", body = Message))
)]
pub async fn seed(State(state): State<AppState>) -> Response {
    let result = state.items.seed().await.map(|outcome| {
        Json(match outcome {
            SeedOutcome::Inserted(n) => Message::success(format!("Seeded database with {} items", n)),
            SeedOutcome::AlreadySeeded(n) => Message::info(format!("Database already contains {} items", n)),
        })
    });
    state.presentation.respond(result)
}
