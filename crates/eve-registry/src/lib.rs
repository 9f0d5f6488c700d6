//! # eve-registry — Component Registry Contract
//!
//! The registry is the collaborator that knows which components exist and
//! which validator graph each one exposes. eve never interprets a document
//! against these graphs; it only translates them into UI schemas.
//!
//! - [`ComponentRegistry`]: the contract consumed by the introspection layer.
//! - [`CatalogRegistry`]: a registry backed by a YAML catalog exported from
//!   the configuration framework (one file or a directory of files).
//!
//! ## Crate Policy
//!
//! - Depends only on `eve-core` internally.
//! - Resolution never panics; unknown names are `RegistryError::NotFound`.

pub mod catalog;

use std::sync::Arc;

use eve_core::{ComponentName, ComponentRef, RegistryError, ValidatorNode};

pub use catalog::{Catalog, CatalogError, CatalogRegistry, ComponentEntry, CoreEntry};

/// Name of the shared fragment holding per-entity MQTT options.
pub const MQTT_COMPONENT_FRAGMENT: &str = "mqtt_component";

/// Name of the shared fragment holding MQTT options for commandable entities.
pub const MQTT_COMMAND_COMPONENT_FRAGMENT: &str = "mqtt_command_component";

/// A validator graph resolved from the registry, with its documentation.
#[derive(Debug, Clone)]
pub struct ResolvedValidator {
    /// Root of the validator graph.
    pub validator: Arc<ValidatorNode>,
    /// Module documentation, if any.
    pub description: Option<String>,
}

/// Resolves components and core modules to validator graphs.
///
/// Implementations must be cheap to call repeatedly and safe to share
/// across request-handling tasks.
pub trait ComponentRegistry: Send + Sync {
    /// Resolve a (domain, platform) pair.
    ///
    /// Fails with [`RegistryError::NotFound`] when the pair is unknown or
    /// exposes no validator.
    fn resolve(&self, component: &ComponentRef) -> Result<ResolvedValidator, RegistryError>;

    /// Resolve a core (non-platform) module by name.
    fn resolve_core(&self, name: &ComponentName) -> Result<ResolvedValidator, RegistryError>;

    /// Every (domain, platform) pair the registry exposes.
    fn list_components(&self) -> Vec<ComponentRef>;

    /// A shared schema fragment by name (e.g. [`MQTT_COMPONENT_FRAGMENT`]).
    fn shared_fragment(&self, name: &str) -> Option<Arc<ValidatorNode>>;

    /// Version of the configuration framework the graphs were taken from.
    fn framework_version(&self) -> Option<String> {
        None
    }
}
