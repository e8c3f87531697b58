//! Item CRUD routes and `/seed`.

use crate::handlers::items::{create, delete as delete_handler, list, read, replace, seed, update};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn item_routes(state: AppState) -> Router {
    Router::new()
        .route("/items", get(list).post(create))
        .route(
            "/items/:id",
            get(read).put(replace).patch(update).delete(delete_handler),
        )
        .route("/seed", post(seed))
        .with_state(state)
}
