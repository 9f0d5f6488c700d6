//! # UI Schema Values
//!
//! The JSON-compatible description a generic form renderer consumes. Every
//! node has a `type`; the remaining fields are present only when they carry
//! information, so a serialized node reads like the hand-written schemas
//! the frontend was built against:
//!
//! ```json
//! { "type": "int", "minimum": 0, "maximum": 100,
//!   "ui": { "origin": "int_range", "origins": ["int_range"] } }
//! ```

use std::fmt;

use eve_core::PrimitiveType;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// The `type` of a UI schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiType {
    Boolean,
    Int,
    Float,
    String,
    Number,
    Array,
    Object,
    Enum,
    AnyOf,
    Const,
    Id,
    Pin,
    RawYaml,
}

impl From<PrimitiveType> for UiType {
    fn from(p: PrimitiveType) -> Self {
        match p {
            PrimitiveType::Boolean => Self::Boolean,
            PrimitiveType::Int => Self::Int,
            PrimitiveType::Float => Self::Float,
            PrimitiveType::String => Self::String,
        }
    }
}

/// Rendering metadata attached to a node under the `ui` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiMeta {
    /// First qualified validator name seen for this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Every qualified name seen, first-seen order, no duplicates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub origins: Vec<String>,
    /// Component whose presence enables this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_with: Option<String>,
    /// Group the field is rendered under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Root only: the component domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Root only: the component platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl UiMeta {
    /// True when no metadata is set; such a `ui` block is not serialized.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Record a qualified name. The first name recorded becomes `origin`
    /// and heads `origins`; later names are appended once.
    pub fn tag_origin(&mut self, origin: &str) {
        if origin.is_empty() {
            return;
        }
        if self.origin.is_none() {
            self.origin = Some(origin.to_string());
            self.origins.retain(|o| o != origin);
            self.origins.insert(0, origin.to_string());
        } else if !self.origins.iter().any(|o| o == origin) {
            self.origins.push(origin.to_string());
        }
    }

    /// Tag the node as belonging to a component group (set-if-absent).
    pub fn tag_group(&mut self, component: &str) {
        self.only_with.get_or_insert_with(|| component.to_string());
        self.group.get_or_insert_with(|| component.to_string());
    }

    /// Fold `other` into `self`: origins are concatenated and de-duplicated,
    /// every other key is taken from `other` only where `self` has none.
    pub fn union(&mut self, other: &UiMeta) {
        let mut merged: Vec<String> = Vec::new();
        let candidates = self
            .origin
            .iter()
            .chain(self.origins.iter())
            .chain(other.origin.iter())
            .chain(other.origins.iter());
        for o in candidates {
            if !o.is_empty() && !merged.contains(o) {
                merged.push(o.clone());
            }
        }
        if self.origin.is_none() {
            self.origin = merged.first().cloned();
        }
        self.origins = merged;

        fill(&mut self.only_with, &other.only_with);
        fill(&mut self.group, &other.group);
        fill(&mut self.domain, &other.domain);
        fill(&mut self.platform, &other.platform);
    }
}

pub(crate) fn fill<T: Clone>(slot: &mut Option<T>, from: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(from);
    }
}

/// One option of an enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumOption {
    /// Value written to the document.
    pub value: Value,
    /// Label shown to the user.
    pub label: String,
}

/// The `options` of a node: enumeration choices or alternative schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UiOptions {
    /// `enum` choices.
    Choices(Vec<EnumOption>),
    /// `any_of` alternatives.
    Alternatives(Vec<UiSchema>),
}

/// A node of the UI schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSchema {
    #[serde(rename = "type")]
    pub(crate) kind: UiType,
    /// Item schema of an `array`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<UiSchema>>,
    /// Fields of an `object`, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
    /// Required field names of an `object`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<UiOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Fixed value of a `const`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Hardware capabilities a `pin` must offer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    /// Why a `raw_yaml` node could not be rendered structurally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "UiMeta::is_empty")]
    pub ui: UiMeta,
}

impl UiSchema {
    /// A bare node of the given type.
    pub fn new(kind: UiType) -> Self {
        Self {
            kind,
            items: None,
            properties: None,
            required: Vec::new(),
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
            pattern: None,
            options: None,
            default: None,
            value: None,
            capabilities: Vec::new(),
            reason: None,
            ui: UiMeta::default(),
        }
    }

    pub fn primitive(of: PrimitiveType) -> Self {
        Self::new(of.into())
    }

    /// The free-text fallback, with a diagnostic.
    pub fn raw_yaml(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::new(UiType::RawYaml)
        }
    }

    pub fn array(items: UiSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::new(UiType::Array)
        }
    }

    pub fn object(properties: Properties, required: Vec<String>) -> Self {
        Self {
            properties: Some(properties),
            required,
            ..Self::new(UiType::Object)
        }
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(UiType::Const)
        }
    }

    pub fn enumeration(choices: Vec<EnumOption>) -> Self {
        Self {
            options: Some(UiOptions::Choices(choices)),
            ..Self::new(UiType::Enum)
        }
    }

    pub fn any_of(alternatives: Vec<UiSchema>) -> Self {
        Self {
            options: Some(UiOptions::Alternatives(alternatives)),
            ..Self::new(UiType::AnyOf)
        }
    }

    /// Tag with a qualified validator name, if there is one.
    pub fn with_origin(mut self, origin: Option<&str>) -> Self {
        if let Some(origin) = origin {
            self.ui.tag_origin(origin);
        }
        self
    }

    /// The node type. Fixed at construction.
    pub fn kind(&self) -> UiType {
        self.kind
    }

    pub fn is_raw_yaml(&self) -> bool {
        self.kind == UiType::RawYaml
    }

    /// Look up a direct child of an `object` node.
    pub fn property(&self, name: &str) -> Option<&UiSchema> {
        self.properties.as_ref()?.get(name)
    }

    /// Serialize to a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Ordered object fields. Serializes as a JSON object in insertion order;
/// inserting an existing name replaces its schema in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<(String, UiSchema)>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, name: impl Into<String>, schema: UiSchema) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = schema,
            None => self.0.push((name, schema)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&UiSchema> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut UiSchema> {
        self.0.iter_mut().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UiSchema)> {
        self.0.iter().map(|(n, s)| (n.as_str(), s))
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in &self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = Properties;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to UI schemas")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Properties, A::Error> {
                let mut props = Properties::new();
                while let Some((name, schema)) = access.next_entry::<String, UiSchema>()? {
                    props.insert(name, schema);
                }
                Ok(props)
            }
        }

        deserializer.deserialize_map(PropertiesVisitor)
    }
}
