//! # Root Overrides
//!
//! Corrections applied to an object root after translation, keyed by
//! (domain, platform):
//!
//! - **required**: fields the framework fills in itself. They stay in the
//!   form but are dropped from `required`.
//! - **shapes**: nested properties whose validator renders poorly, replaced
//!   with a fixed schema.
//!
//! The built-in tables cover the framework's root module. More entries can
//! be loaded from YAML:
//!
//! ```yaml
//! required:
//!   - { domain: esphome, platform: esphome, drop: [build_path] }
//! shapes:
//!   - domain: esphome
//!     platform: esphome
//!     path: [advanced, areas]
//!     schema: { type: array, items: { type: string } }
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::ui::{UiSchema, UiType};

/// Error loading an overrides file.
#[derive(Error, Debug)]
pub enum OverridesError {
    #[error("cannot read overrides file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid overrides file '{path}': {reason}")]
    Parse { path: String, reason: String },
}

/// Drop framework-populated fields from `required`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequiredOverride {
    pub domain: String,
    pub platform: String,
    pub drop: Vec<String>,
}

/// Replace the property at `path` with a fixed schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShapeOverride {
    pub domain: String,
    pub platform: String,
    /// Property names from the root down; at least one.
    pub path: Vec<String>,
    pub schema: UiSchema,
}

/// Override tables applied to object roots.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RootOverrides {
    #[serde(default)]
    pub required: Vec<RequiredOverride>,
    #[serde(default)]
    pub shapes: Vec<ShapeOverride>,
}

impl Default for RootOverrides {
    fn default() -> Self {
        Self {
            required: vec![RequiredOverride {
                domain: "esphome".into(),
                platform: "esphome".into(),
                drop: vec!["build_path".into()],
            }],
            shapes: vec![ShapeOverride {
                domain: "esphome".into(),
                platform: "esphome".into(),
                path: vec!["advanced".into(), "areas".into()],
                schema: UiSchema::array(UiSchema::new(UiType::String)),
            }],
        }
    }
}

impl RootOverrides {
    /// Tables with no entries.
    pub fn empty() -> Self {
        Self {
            required: Vec::new(),
            shapes: Vec::new(),
        }
    }

    /// Parse override tables from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load override tables from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OverridesError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| OverridesError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text).map_err(|e| OverridesError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Append the entries of `other`. Later shape overrides for the same
    /// path are applied after, and so win over, earlier ones.
    pub fn extend(&mut self, other: RootOverrides) {
        self.required.extend(other.required);
        self.shapes.extend(other.shapes);
    }

    /// Apply every matching entry to an object root.
    pub fn apply(&self, root: &mut UiSchema, domain: &str, platform: &str) {
        for o in self
            .required
            .iter()
            .filter(|o| o.domain == domain && o.platform == platform)
        {
            root.required.retain(|k| !o.drop.contains(k));
        }

        for o in self
            .shapes
            .iter()
            .filter(|o| o.domain == domain && o.platform == platform)
        {
            if let Some(slot) = property_at_mut(root, &o.path) {
                *slot = o.schema.clone();
            }
        }
    }
}

/// The property at `path`, if every ancestor on the way is an object.
fn property_at_mut<'a>(root: &'a mut UiSchema, path: &[String]) -> Option<&'a mut UiSchema> {
    let (last, parents) = path.split_last()?;
    let mut node = root;
    for name in parents {
        node = node.properties.as_mut()?.get_mut(name)?;
        if node.kind() != UiType::Object {
            return None;
        }
    }
    node.properties.as_mut()?.get_mut(last)
}
