//! # YAML Catalog Registry
//!
//! A registry backed by validator graphs exported from the configuration
//! framework. The catalog is a YAML document:
//!
//! ```yaml
//! version: "2025.6.0"
//! components:
//!   - domain: switch
//!     platform: gpio
//!     description: GPIO switch.
//!     schema: { kind: schema, entries: [...] }
//! core:
//!   - name: wifi
//!     schema: { kind: schema, entries: [...] }
//! fragments:
//!   mqtt_component: { kind: schema, entries: [...] }
//! ```
//!
//! A catalog may also be a directory; every `*.yaml` / `*.yml` file in it is
//! loaded in file-name order and merged, later entries replacing earlier
//! ones with the same key.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use eve_core::{ComponentName, ComponentRef, RegistryError, ValidationError, ValidatorNode};
use serde::Deserialize;
use thiserror::Error;

use crate::{ComponentRegistry, ResolvedValidator};

/// Error loading a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file or directory could not be read.
    #[error("cannot read catalog '{path}': {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A catalog file is not valid YAML or does not match the catalog shape.
    #[error("invalid catalog '{path}': {reason}")]
    Parse {
        /// Path that failed.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// A catalog entry names an invalid component.
    #[error("invalid catalog entry: {0}")]
    InvalidEntry(#[from] ValidationError),
}

/// Deserialized catalog document.
#[derive(Debug, Default, Deserialize)]
pub struct Catalog {
    /// Configuration framework version.
    #[serde(default)]
    pub version: Option<String>,
    /// Platform components.
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
    /// Core modules.
    #[serde(default)]
    pub core: Vec<CoreEntry>,
    /// Shared schema fragments by name.
    #[serde(default)]
    pub fragments: BTreeMap<String, ValidatorNode>,
}

/// A platform component in the catalog.
#[derive(Debug, Deserialize)]
pub struct ComponentEntry {
    /// Domain, e.g. `sensor`.
    pub domain: String,
    /// Platform, e.g. `dht`.
    pub platform: String,
    /// Module documentation.
    #[serde(default)]
    pub description: Option<String>,
    /// Configuration validator; absent when the module exposes none.
    #[serde(default)]
    pub schema: Option<ValidatorNode>,
}

/// A core module in the catalog.
#[derive(Debug, Deserialize)]
pub struct CoreEntry {
    /// Module name, e.g. `wifi`.
    pub name: String,
    /// Module documentation.
    #[serde(default)]
    pub description: Option<String>,
    /// Configuration validator; absent when the module exposes none.
    #[serde(default)]
    pub schema: Option<ValidatorNode>,
}

#[derive(Debug, Clone)]
struct Entry {
    description: Option<String>,
    schema: Option<Arc<ValidatorNode>>,
}

impl Entry {
    fn resolve(&self, what: impl FnOnce() -> String) -> Result<ResolvedValidator, RegistryError> {
        match &self.schema {
            Some(schema) => Ok(ResolvedValidator {
                validator: Arc::clone(schema),
                description: self.description.clone(),
            }),
            None => Err(RegistryError::NotFound(format!("configuration schema for {}", what()))),
        }
    }
}

/// Registry serving validator graphs from a loaded catalog.
#[derive(Debug, Default)]
pub struct CatalogRegistry {
    version: Option<String>,
    components: BTreeMap<ComponentRef, Entry>,
    core: BTreeMap<ComponentName, Entry>,
    fragments: BTreeMap<String, Arc<ValidatorNode>>,
}

impl CatalogRegistry {
    /// Build a registry from an in-memory catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidEntry`] if any entry names an invalid
    /// domain, platform, or core module.
    pub fn from_catalog(catalog: Catalog) -> Result<Self, CatalogError> {
        let mut registry = Self::default();
        registry.merge(catalog)?;
        Ok(registry)
    }

    /// Parse a catalog from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        Self::from_catalog(parse_catalog(yaml, "<inline>")?)
    }

    /// Load a catalog file, or every `*.yaml` / `*.yml` file in a directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let files = if path.is_dir() {
            catalog_files(path)?
        } else {
            vec![path.to_path_buf()]
        };

        let mut registry = Self::default();
        for file in &files {
            let text = std::fs::read_to_string(file).map_err(|source| CatalogError::Io {
                path: file.display().to_string(),
                source,
            })?;
            registry.merge(parse_catalog(&text, &file.display().to_string())?)?;
        }

        tracing::info!(
            path = %path.display(),
            files = files.len(),
            components = registry.components.len(),
            core = registry.core.len(),
            fragments = registry.fragments.len(),
            "loaded validator catalog"
        );
        Ok(registry)
    }

    fn merge(&mut self, catalog: Catalog) -> Result<(), CatalogError> {
        if self.version.is_none() {
            self.version = catalog.version;
        }
        for c in catalog.components {
            let key = ComponentRef::new(&c.domain, &c.platform)?;
            self.components.insert(
                key,
                Entry {
                    description: c.description,
                    schema: c.schema.map(Arc::new),
                },
            );
        }
        for c in catalog.core {
            let key = ComponentName::new(&c.name)?;
            self.core.insert(
                key,
                Entry {
                    description: c.description,
                    schema: c.schema.map(Arc::new),
                },
            );
        }
        for (name, fragment) in catalog.fragments {
            self.fragments.insert(name, Arc::new(fragment));
        }
        Ok(())
    }

    /// Number of platform components in the catalog.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Names of all core modules, sorted.
    pub fn core_names(&self) -> Vec<&str> {
        self.core.keys().map(|n| n.as_str()).collect()
    }
}

fn parse_catalog(yaml: &str, path: &str) -> Result<Catalog, CatalogError> {
    serde_yaml::from_str(yaml).map_err(|e| CatalogError::Parse {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

fn catalog_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let io_err = |source| CatalogError::Io {
        path: dir.display().to_string(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "yaml" || e == "yml");
        if is_yaml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

impl ComponentRegistry for CatalogRegistry {
    fn resolve(&self, component: &ComponentRef) -> Result<ResolvedValidator, RegistryError> {
        self.components
            .get(component)
            .ok_or_else(|| RegistryError::NotFound(format!("component {}", component.display_name())))?
            .resolve(|| component.display_name())
    }

    fn resolve_core(&self, name: &ComponentName) -> Result<ResolvedValidator, RegistryError> {
        self.core
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(format!("core component {name}")))?
            .resolve(|| name.to_string())
    }

    fn list_components(&self) -> Vec<ComponentRef> {
        self.components.keys().cloned().collect()
    }

    fn shared_fragment(&self, name: &str) -> Option<Arc<ValidatorNode>> {
        self.fragments.get(name).cloned()
    }

    fn framework_version(&self) -> Option<String> {
        self.version.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
version: "2025.6.0"
components:
  - domain: switch
    platform: gpio
    description: GPIO switch.
    schema:
      kind: schema
      entries:
        - key: { name: pin, required: true }
          validator: { kind: callable, name: esphome.pins.gpio_output_pin_schema }
  - domain: sensor
    platform: template
core:
  - name: wifi
    schema: { kind: schema, entries: [] }
fragments:
  mqtt_component:
    kind: schema
    entries:
      - key: retain
        validator: { kind: type, of: boolean }
"#;

    #[test]
    fn resolves_known_component() {
        let registry = CatalogRegistry::from_yaml_str(CATALOG).unwrap();
        let c = ComponentRef::new("switch", "gpio").unwrap();
        let resolved = registry.resolve(&c).unwrap();
        assert_eq!(resolved.description.as_deref(), Some("GPIO switch."));
        assert!(resolved.validator.entries().is_some());
    }

    #[test]
    fn unknown_component_is_not_found() {
        let registry = CatalogRegistry::from_yaml_str(CATALOG).unwrap();
        let c = ComponentRef::new("light", "rgb").unwrap();
        let err = registry.resolve(&c).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn component_without_schema_is_not_found() {
        let registry = CatalogRegistry::from_yaml_str(CATALOG).unwrap();
        let c = ComponentRef::new("sensor", "template").unwrap();
        assert!(registry.resolve(&c).unwrap_err().is_not_found());
    }

    #[test]
    fn lists_components_sorted() {
        let registry = CatalogRegistry::from_yaml_str(CATALOG).unwrap();
        let names: Vec<String> = registry
            .list_components()
            .iter()
            .map(|c| c.display_name())
            .collect();
        assert_eq!(names, ["sensor.template", "switch.gpio"]);
    }

    #[test]
    fn core_and_fragments_and_version() {
        let registry = CatalogRegistry::from_yaml_str(CATALOG).unwrap();
        let wifi = ComponentName::new("wifi").unwrap();
        assert!(registry.resolve_core(&wifi).is_ok());
        assert!(registry.shared_fragment(crate::MQTT_COMPONENT_FRAGMENT).is_some());
        assert!(registry.shared_fragment("nope").is_none());
        assert_eq!(registry.framework_version().as_deref(), Some("2025.6.0"));
    }

    #[test]
    fn invalid_entry_is_rejected() {
        let err = CatalogRegistry::from_yaml_str("components: [{domain: '', platform: x}]")
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidEntry(_)));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = CatalogRegistry::from_yaml_str("components: {").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }
}
