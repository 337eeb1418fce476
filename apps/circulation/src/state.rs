//! Application state.

use std::sync::Arc;

use catalog::CatalogStore;

use crate::config::Config;

/// State shared by everything that serves the catalog.
///
/// The store is constructed once by the host and passed around by handle.
#[derive(Debug)]
pub struct AppState<S: CatalogStore> {
    /// Application configuration.
    pub config: Config,
    /// Catalog store.
    pub store: S,
}

impl<S: CatalogStore> AppState<S> {
    /// Creates new application state.
    pub fn new(config: Config, store: S) -> Self {
        Self { config, store }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from config and store.
pub fn create_shared_state<S: CatalogStore>(config: Config, store: S) -> SharedState<S> {
    Arc::new(AppState::new(config, store))
}
