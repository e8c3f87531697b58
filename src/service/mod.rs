//! ItemService: payload validation and store dispatch.

mod items;
mod validation;
pub use items::{ItemService, DEFAULT_LIMIT, MAX_LIMIT};
pub use validation::RequestValidator;
