//! # Known Callables
//!
//! Named validators the framework exposes without richer structure, mapped
//! to the primitive they accept. Anything absent falls through to the key
//! name heuristic and then to the raw fallback.

use std::collections::BTreeMap;

use eve_core::PrimitiveType;

use crate::ui::{UiSchema, UiType};

/// Module path of the framework's config-validation helpers.
pub const CONFIG_VALIDATION: &str = "esphome.config_validation";

const BUILTIN: &[(&str, PrimitiveType)] = &[
    ("_validate_entity_name", PrimitiveType::String),
    ("_validate_icon", PrimitiveType::String),
    ("string", PrimitiveType::String),
    ("boolean", PrimitiveType::Boolean),
    ("boolean_", PrimitiveType::Boolean),
    ("int_", PrimitiveType::Int),
    ("int_range", PrimitiveType::Int),
    ("float_", PrimitiveType::Float),
];

/// Table of qualified callable names with a known primitive shape.
#[derive(Debug, Clone)]
pub struct KnownCallables {
    exact: BTreeMap<String, PrimitiveType>,
    by_segment: BTreeMap<String, PrimitiveType>,
}

impl Default for KnownCallables {
    fn default() -> Self {
        let mut table = Self::empty();
        for (name, of) in BUILTIN {
            table.insert(format!("{CONFIG_VALIDATION}.{name}"), *of);
        }
        table
    }
}

impl KnownCallables {
    /// A table with no entries.
    pub fn empty() -> Self {
        Self {
            exact: BTreeMap::new(),
            by_segment: BTreeMap::new(),
        }
    }

    /// Add a qualified name. The first entry for a final segment wins
    /// bare-name lookups.
    pub fn insert(&mut self, qualified: impl Into<String>, of: PrimitiveType) {
        let qualified = qualified.into();
        let segment = final_segment(&qualified).to_string();
        self.by_segment.entry(segment).or_insert(of);
        self.exact.insert(qualified, of);
    }

    /// Resolve a name. Qualified names must match exactly; a bare name
    /// matches the final segment of a qualified entry.
    pub fn lookup(&self, name: &str) -> Option<PrimitiveType> {
        if let Some(of) = self.exact.get(name) {
            return Some(*of);
        }
        if name.contains('.') {
            return None;
        }
        self.by_segment.get(name).copied()
    }
}

fn final_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Shape implied by the name of the key being translated, if any.
///
/// `id` / `*_id` keys reference another entity; `pin` / `*_pin` keys take
/// a GPIO pin.
pub fn key_heuristic(key: Option<&str>) -> Option<UiSchema> {
    let key = key?;
    if key == "id" || key.ends_with("_id") {
        return Some(UiSchema::new(UiType::Id));
    }
    if key == "pin" || key.ends_with("_pin") {
        let mut pin = UiSchema::new(UiType::Pin);
        pin.capabilities.push("gpio".to_string());
        return Some(pin);
    }
    None
}
