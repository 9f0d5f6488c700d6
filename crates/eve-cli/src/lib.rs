//! # eve-cli — Command-Line Access to the Schema Translator
//!
//! Provides the `eve` command, which loads a component catalog and runs
//! the translator without starting the API service.
//!
//! ## Subcommands
//!
//! - `eve components`: list (domain, platform) pairs.
//! - `eve schema <domain> <platform>`: print a component schema document.
//! - `eve core-schema <name>`: print a core module schema document.
//! - `eve audit`: translate every component and report fields that fell
//!   back to `raw_yaml`.
//!
//! ```bash
//! eve --catalog catalog.yaml schema sensor dht --pretty
//! eve --catalog exports/ audit
//! ```

pub mod audit;
pub mod schema;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use eve_registry::CatalogRegistry;
use eve_schema::{RootOverrides, SchemaService};

/// Load the catalog and optional override tables into a schema service.
pub fn load_service(catalog: &Path, overrides: Option<&Path>) -> Result<SchemaService> {
    let registry = CatalogRegistry::load(catalog)
        .with_context(|| format!("failed to load catalog {}", catalog.display()))?;
    tracing::info!(components = registry.component_count(), "catalog loaded");

    let mut tables = RootOverrides::default();
    if let Some(path) = overrides {
        tables.extend(
            RootOverrides::load(path)
                .with_context(|| format!("failed to load overrides {}", path.display()))?,
        );
    }
    Ok(SchemaService::with_overrides(Arc::new(registry), tables))
}

/// Serialize a value as JSON, compact or indented.
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
