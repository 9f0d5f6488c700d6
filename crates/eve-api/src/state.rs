//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Every field is cheap to clone; the schema
//! service and board catalog own the process-lifetime caches.

use std::collections::BTreeSet;
use std::sync::Arc;

use eve_core::ComponentRef;
use eve_schema::SchemaService;

use crate::boards::BoardCatalog;
use crate::config::Settings;
use crate::projects::ProjectStore;
use crate::validate::ExternalValidator;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub schemas: Arc<SchemaService>,
    pub boards: Arc<BoardCatalog>,
    pub projects: ProjectStore,
    pub validator: ExternalValidator,
}

impl AppState {
    /// Assemble state; project storage and the validator command come from
    /// `settings`.
    pub fn new(settings: Settings, schemas: SchemaService, boards: BoardCatalog) -> Self {
        let projects = ProjectStore::new(settings.projects_dir.clone());
        let validator = ExternalValidator::new(&settings.validator_cmd);
        Self {
            settings: Arc::new(settings),
            schemas: Arc::new(schemas),
            boards: Arc::new(boards),
            projects,
            validator,
        }
    }

    /// Configured allowlist, if any.
    pub fn allowlist(&self) -> Option<&BTreeSet<ComponentRef>> {
        self.settings.allowlist.as_ref()
    }

    /// Whether a component may be served. Always true without an allowlist.
    pub fn is_allowed(&self, component: &ComponentRef) -> bool {
        self.allowlist().map_or(true, |only| only.contains(component))
    }
}
