//! # Service Bootstrap
//!
//! Builds [`AppState`] from [`Settings`] at startup:
//!
//! 1. **Load the catalog**: the registry's validator graphs from
//!    `CATALOG_PATH` (file or directory).
//! 2. **Load overrides**: built-in root overrides, extended by
//!    `OVERRIDES_FILE` when set.
//! 3. **Prepare storage**: create the projects directory (best effort).
//! 4. **Log identity**: one structured startup line.

use std::sync::Arc;

use eve_registry::{CatalogError, CatalogRegistry};
use eve_schema::{OverridesError, RootOverrides, SchemaService};

use crate::boards::{BoardCatalog, BoardsError};
use crate::config::Settings;
use crate::state::AppState;

/// Errors during service bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The component catalog could not be loaded.
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// The overrides file could not be loaded.
    #[error("overrides: {0}")]
    Overrides(#[from] OverridesError),

    /// The board catalog HTTP client could not be built.
    #[error("board catalog: {0}")]
    Boards(#[from] BoardsError),
}

/// Root overrides: the built-in table plus the configured file.
pub fn load_overrides(settings: &Settings) -> Result<RootOverrides, OverridesError> {
    let mut overrides = RootOverrides::default();
    if let Some(path) = &settings.overrides_file {
        overrides.extend(RootOverrides::load(path)?);
        tracing::info!(path = %path.display(), "root overrides loaded");
    }
    Ok(overrides)
}

/// Load every startup dependency and assemble the application state.
pub async fn bootstrap(settings: Settings) -> Result<AppState, BootstrapError> {
    let registry = CatalogRegistry::load(&settings.catalog_path)?;
    let component_count = registry.component_count();
    let schemas = SchemaService::with_overrides(Arc::new(registry), load_overrides(&settings)?);
    let boards = BoardCatalog::new()?;

    let state = AppState::new(settings, schemas, boards);
    state.projects.ensure_dir().await;

    tracing::info!(
        components = component_count,
        framework_version = state.schemas.framework_version().as_deref().unwrap_or("unknown"),
        projects_dir = %state.projects.dir().display(),
        allowlist = state.allowlist().map(|a| a.len()),
        "eve bootstrap complete"
    );
    Ok(state)
}
