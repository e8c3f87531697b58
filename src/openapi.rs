//! OpenAPI document served at `/openapi.json`.

use crate::error::ErrorBody;
use crate::handlers::health::{HealthBody, ReadyBody, ReadyChecks};
use crate::handlers::{health, items};
use crate::model::{Item, ItemFields, NewItem};
use crate::response::Message;
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "items-api", description = "Items CRUD service"),
    paths(
        health::root,
        health::health,
        health::healthz,
        health::ready,
        items::list,
        items::read,
        items::create,
        items::replace,
        items::update,
        items::delete,
        items::seed,
    ),
    components(schemas(
        Item,
        ItemFields,
        NewItem,
        Message,
        ErrorBody,
        HealthBody,
        ReadyBody,
        ReadyChecks,
    ))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
