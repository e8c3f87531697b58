//! Shared application state for all routes.

use crate::config::{Presentation, Settings, UpdateMode};
use crate::service::ItemService;
use crate::store::ItemStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub items: ItemService,
    /// Chosen once at startup; never changes per request.
    pub presentation: Presentation,
    pub update_mode: UpdateMode,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>, settings: &Settings) -> Self {
        Self {
            items: ItemService::new(store),
            presentation: settings.presentation,
            update_mode: settings.update_mode,
        }
    }
}
