//! # Schema Service
//!
//! The introspection layer between the registry and API callers: lists
//! components, resolves validator graphs, translates them, and memoizes the
//! resulting documents for the life of the process.
//!
//! Cached documents are never invalidated. Translation runs outside the
//! cache lock; if two callers miss on the same key concurrently both
//! translate, and the second insert replaces the first with an identical
//! document.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, OnceLock};

use eve_core::{ComponentName, ComponentRef, RegistryError};
use eve_registry::{ComponentRegistry, ResolvedValidator};
use parking_lot::RwLock;
use serde::Serialize;

use crate::overrides::RootOverrides;
use crate::transport::transport_field_names;
use crate::translate::Translator;
use crate::ui::UiSchema;

/// Module documentation shown alongside a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Docs {
    /// Trimmed description, `null` when empty.
    pub description: Option<String>,
}

impl Docs {
    fn from_description(description: Option<&str>) -> Self {
        Self {
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        }
    }
}

/// A translated platform component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSchemaDocument {
    pub domain: String,
    pub platform: String,
    /// `<domain>.<platform>`.
    pub display_name: String,
    pub docs: Docs,
    pub schema: UiSchema,
}

/// A translated core module.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreSchemaDocument {
    pub name: String,
    pub display_name: String,
    pub docs: Docs,
    pub schema: UiSchema,
}

/// Lists components and serves memoized schema documents.
pub struct SchemaService {
    registry: Arc<dyn ComponentRegistry>,
    overrides: RootOverrides,
    translator: OnceLock<Translator>,
    components: RwLock<HashMap<ComponentRef, Arc<ComponentSchemaDocument>>>,
    core: RwLock<HashMap<ComponentName, Arc<CoreSchemaDocument>>>,
}

impl std::fmt::Debug for SchemaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaService")
            .field("cached_components", &self.components.read().len())
            .field("cached_core", &self.core.read().len())
            .finish_non_exhaustive()
    }
}

impl SchemaService {
    /// A service using the built-in override tables.
    pub fn new(registry: Arc<dyn ComponentRegistry>) -> Self {
        Self::with_overrides(registry, RootOverrides::default())
    }

    pub fn with_overrides(registry: Arc<dyn ComponentRegistry>, overrides: RootOverrides) -> Self {
        Self {
            registry,
            overrides,
            translator: OnceLock::new(),
            components: RwLock::new(HashMap::new()),
            core: RwLock::new(HashMap::new()),
        }
    }

    /// The translator, built on first use with the registry's transport
    /// field names.
    pub fn translator(&self) -> &Translator {
        self.translator.get_or_init(|| {
            Translator::new()
                .with_overrides(self.overrides.clone())
                .with_transport_fields(transport_field_names(self.registry.as_ref()))
        })
    }

    /// Components in (domain, platform) order. With a filter, exactly the
    /// filtered set is returned, whether or not the registry knows it.
    pub fn list_components(&self, filter: Option<&BTreeSet<ComponentRef>>) -> Vec<ComponentRef> {
        match filter {
            Some(only) => only.iter().cloned().collect(),
            None => {
                let mut all = self.registry.list_components();
                all.sort();
                all.dedup();
                all
            }
        }
    }

    /// Version of the framework the registry's graphs came from.
    pub fn framework_version(&self) -> Option<String> {
        self.registry.framework_version()
    }

    /// The translated schema document for a platform component.
    pub fn component_schema(
        &self,
        component: &ComponentRef,
    ) -> Result<Arc<ComponentSchemaDocument>, RegistryError> {
        if let Some(doc) = self.components.read().get(component) {
            return Ok(Arc::clone(doc));
        }

        let ResolvedValidator {
            validator,
            description,
        } = self.registry.resolve(component)?;
        let schema = self
            .translator()
            .translate(&validator, component.domain(), component.platform());
        let doc = Arc::new(ComponentSchemaDocument {
            domain: component.domain().to_string(),
            platform: component.platform().to_string(),
            display_name: component.display_name(),
            docs: Docs::from_description(description.as_deref()),
            schema,
        });
        tracing::debug!(component = %component, "translated component schema");

        self.components
            .write()
            .insert(component.clone(), Arc::clone(&doc));
        Ok(doc)
    }

    /// The translated schema document for a core module. The module is
    /// translated with domain and platform both set to its name.
    pub fn core_schema(&self, name: &ComponentName) -> Result<Arc<CoreSchemaDocument>, RegistryError> {
        if let Some(doc) = self.core.read().get(name) {
            return Ok(Arc::clone(doc));
        }

        let ResolvedValidator {
            validator,
            description,
        } = self.registry.resolve_core(name)?;
        let schema = self
            .translator()
            .translate(&validator, name.as_str(), name.as_str());
        let doc = Arc::new(CoreSchemaDocument {
            name: name.to_string(),
            display_name: name.to_string(),
            docs: Docs::from_description(description.as_deref()),
            schema,
        });
        tracing::debug!(core = %name, "translated core schema");

        self.core.write().insert(name.clone(), Arc::clone(&doc));
        Ok(doc)
    }

    /// Number of memoized documents (components, core modules).
    pub fn cached(&self) -> (usize, usize) {
        (self.components.read().len(), self.core.read().len())
    }
}
