//! Circulation host application.
//!
//! Owns one catalog store for the lifetime of the process: restores it from
//! a snapshot or seeds the demo catalog, reports on it, and writes the
//! snapshot back on shutdown.

pub mod config;
pub mod persistence;
pub mod report;
pub mod seed;
pub mod state;

use catalog::{Catalog, CatalogStore, MemoryCatalogStore};

use crate::config::Config;
use crate::state::{SharedState, create_shared_state};

/// Builds the catalog the application starts with.
///
/// A configured snapshot wins; otherwise the demo catalog is seeded or an
/// empty catalog is created.
pub fn load_catalog(config: &Config) -> anyhow::Result<Catalog> {
    if let Some(path) = &config.snapshot_path {
        if let Some(catalog) = persistence::load_snapshot(path)? {
            tracing::info!(path = %path.display(), "Restored catalog from snapshot");
            return Ok(catalog);
        }
    }

    if config.seed_demo {
        tracing::info!("Seeding demo catalog");
        return Ok(seed::demo_catalog(&config.library_name, config.loan_limit_days)?);
    }

    Ok(Catalog::new(&config.library_name).with_loan_limit_days(config.loan_limit_days))
}

/// Creates the application state with an in-memory store.
pub fn create_state(config: Config) -> anyhow::Result<SharedState<MemoryCatalogStore>> {
    let catalog = load_catalog(&config)?;
    Ok(create_shared_state(config, MemoryCatalogStore::new(catalog)))
}

/// Writes the store's snapshot to the configured path, if any.
pub async fn persist<S: CatalogStore>(state: &SharedState<S>) -> anyhow::Result<()> {
    let Some(path) = &state.config.snapshot_path else {
        return Ok(());
    };
    let snapshot = state.store.snapshot().await?;
    persistence::save_snapshot(path, &snapshot)?;
    tracing::info!(path = %path.display(), "Catalog snapshot saved");
    Ok(())
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
