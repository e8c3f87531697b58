//! Items API: CRUD over a single `items` resource, backed by an in-memory list
//! or a PostgreSQL table, with configurable error presentation.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{init_tracing, Backend, Presentation, Settings, UpdateMode};
pub use error::{AppError, ConfigError};
pub use model::{Item, ItemFields, ItemPatch, NewItem, SeedOutcome};
pub use response::Message;
pub use routes::{app, common_routes, item_routes};
pub use service::ItemService;
pub use state::AppState;
pub use store::{connect, ItemStore, MemoryStore, PgStore};
