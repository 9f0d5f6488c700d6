//! # Validator Graph
//!
//! The polymorphic validation tree a component registry exposes for each
//! component. Nodes compose: an object schema maps keys to validators, a
//! conjunction applies several validators to the same value, a list wraps
//! the validator for each item, and so on.
//!
//! Registries export graphs in this form, internally tagged by `kind`:
//!
//! ```yaml
//! kind: schema
//! entries:
//!   - key: { name: pin, required: true }
//!     validator: { kind: callable, name: esphome.pins.gpio_output_pin_schema }
//!   - key: { name: update_interval, default: { $seconds: 60 } }
//!     validator: { kind: callable, name: esphome.config_validation.update_interval }
//!   - key: inverted
//!     validator: { kind: type, of: boolean }
//! ```
//!
//! The graph is read-only data owned by the registry. Nothing in eve mutates
//! it, so one graph can be translated from many threads at once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::literal::Literal;

/// A node in a validator graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidatorNode {
    /// A wrapped object schema.
    Schema {
        /// Key descriptor / validator pairs, in declaration order.
        entries: Vec<SchemaEntry>,
    },
    /// A plain key → validator mapping.
    Mapping {
        /// Key descriptor / validator pairs, in declaration order.
        entries: Vec<SchemaEntry>,
    },
    /// A list literal. A single-element list means "list of that item".
    List {
        /// The embedded validators.
        items: Vec<ValidatorNode>,
    },
    /// A primitive type coercer.
    Type {
        /// The primitive target type.
        of: PrimitiveType,
        /// Qualified name of the coercer, when known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// A coercion wrapper around an arbitrary target type.
    Coerce {
        /// Name of the target type (e.g. `int`, `float`, `TimePeriod`).
        target: String,
        /// Qualified name of the wrapper, when known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// An opaque named validator, identified by a stable qualified name.
    Callable {
        /// Qualified name (e.g. `esphome.config_validation.int_range`).
        name: String,
    },
    /// A membership constraint: the value must be one of `members`.
    In {
        /// Allowed values, in declaration order.
        members: Vec<Literal>,
    },
    /// A disjunction: any one of the alternatives must accept the value.
    Any {
        /// Alternatives, in declaration order.
        validators: Vec<ValidatorNode>,
    },
    /// A conjunction: every validator applies to the same value.
    All {
        /// Validators, in application order.
        validators: Vec<ValidatorNode>,
    },
    /// A numeric or duration range.
    Range {
        /// Inclusive lower bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<Literal>,
        /// Inclusive upper bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<Literal>,
    },
    /// A string or sequence length constraint.
    Length {
        /// Minimum length.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<u64>,
        /// Maximum length.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<u64>,
    },
    /// A regular expression constraint.
    Match {
        /// Raw pattern text.
        pattern: String,
    },
    /// Any other validator, identified only by its runtime kind.
    Opaque {
        /// Runtime kind name (e.g. `Invalid`, `Lambda`).
        type_name: String,
        /// Qualified name, when one can be derived.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

/// Primitive value types a type coercer can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    /// `true` / `false`.
    Boolean,
    /// Whole numbers.
    Int,
    /// Floating point numbers.
    Float,
    /// Text.
    String,
}

impl PrimitiveType {
    /// Resolve a coercion target type name to a primitive, if it is one.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "bool" | "boolean" => Some(Self::Boolean),
            "int" | "integer" => Some(Self::Int),
            "float" => Some(Self::Float),
            "str" | "string" => Some(Self::String),
            _ => None,
        }
    }

    /// The canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValidatorNode {
    /// Build a named callable node.
    pub fn callable(name: impl Into<String>) -> Self {
        Self::Callable { name: name.into() }
    }

    /// Build an unnamed primitive type coercer.
    pub fn primitive(of: PrimitiveType) -> Self {
        Self::Type { of, name: None }
    }

    /// Build a single-element list ("list of `item`").
    pub fn list_of(item: ValidatorNode) -> Self {
        Self::List { items: vec![item] }
    }

    /// The stable qualified name of this validator, if it has one.
    pub fn origin(&self) -> Option<&str> {
        match self {
            Self::Callable { name } => Some(name.as_str()).filter(|n| !n.is_empty()),
            Self::Type { name, .. } | Self::Coerce { name, .. } | Self::Opaque { name, .. } => {
                name.as_deref().filter(|n| !n.is_empty())
            }
            _ => None,
        }
    }

    /// The runtime kind of this validator, used in diagnostics.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Schema { .. } => "Schema",
            Self::Mapping { .. } => "dict",
            Self::List { .. } => "list",
            Self::Type { .. } => "type",
            Self::Coerce { .. } => "Coerce",
            Self::Callable { .. } => "function",
            Self::In { .. } => "In",
            Self::Any { .. } => "Any",
            Self::All { .. } => "All",
            Self::Range { .. } => "Range",
            Self::Length { .. } => "Length",
            Self::Match { .. } => "Match",
            Self::Opaque { type_name, .. } => type_name.as_str(),
        }
    }

    /// Object schema entries, if this node is an object schema.
    pub fn entries(&self) -> Option<&[SchemaEntry]> {
        match self {
            Self::Schema { entries } | Self::Mapping { entries } => Some(entries),
            _ => None,
        }
    }
}

/// One key of an object schema and the validator for its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    /// How the key is declared.
    pub key: KeySpec,
    /// Validator applied to the key's value.
    pub validator: ValidatorNode,
}

impl SchemaEntry {
    /// Build an entry from a key spec and validator.
    pub fn new(key: impl Into<KeySpec>, validator: ValidatorNode) -> Self {
        Self {
            key: key.into(),
            validator,
        }
    }
}

/// A key as declared in an object schema: either a bare key or a marker
/// carrying required/default/only-with information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySpec {
    /// A bare key: optional, no default.
    Bare(String),
    /// A marker key.
    Marker(KeyDescriptor),
}

/// A normalized key descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDescriptor {
    /// Bare key name.
    pub name: String,
    /// Whether the key must be present.
    #[serde(default)]
    pub required: bool,
    /// Default value applied when the key is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Literal>,
    /// Component that must be configured for this key to be accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_with: Option<String>,
}

impl KeyDescriptor {
    /// An optional key with no default.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            default: None,
            only_with: None,
        }
    }

    /// A required key with no default.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            required: true,
            ..Self::optional(name)
        }
    }

    /// Attach a default value.
    pub fn with_default(mut self, default: impl Into<Literal>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Attach an only-with component tag.
    pub fn only_with(mut self, component: impl Into<String>) -> Self {
        self.only_with = Some(component.into());
        self
    }
}

impl KeySpec {
    /// Normalize to a descriptor. Bare keys are optional with no default;
    /// a `null` default counts as no default.
    pub fn normalize(&self) -> KeyDescriptor {
        match self {
            Self::Bare(name) => KeyDescriptor::optional(name.clone()),
            Self::Marker(desc) => KeyDescriptor {
                default: desc.default.clone().filter(|d| *d != Literal::Null),
                only_with: desc.only_with.clone().filter(|c| !c.is_empty()),
                ..desc.clone()
            },
        }
    }

    /// The bare key name.
    pub fn name(&self) -> &str {
        match self {
            Self::Bare(name) => name,
            Self::Marker(desc) => &desc.name,
        }
    }
}

impl From<&str> for KeySpec {
    fn from(name: &str) -> Self {
        Self::Bare(name.to_string())
    }
}

impl From<KeyDescriptor> for KeySpec {
    fn from(desc: KeyDescriptor) -> Self {
        Self::Marker(desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::TimePeriod;

    #[test]
    fn deserialize_tagged_graph() {
        let yaml = r#"
kind: schema
entries:
  - key: { name: pin, required: true }
    validator: { kind: callable, name: esphome.pins.gpio_output_pin_schema }
  - key: { name: update_interval, default: { $seconds: 60 } }
    validator: { kind: callable, name: esphome.config_validation.update_interval }
  - key: inverted
    validator: { kind: type, of: boolean }
  - key: mode
    validator:
      kind: all
      validators:
        - { kind: coerce, target: str }
        - { kind: in, members: [fast, slow] }
  - key: tags
    validator: { kind: list, items: [{ kind: type, of: string }] }
"#;
        let node: ValidatorNode = serde_yaml::from_str(yaml).unwrap();
        let entries = node.entries().unwrap();
        assert_eq!(entries.len(), 5);

        let pin = entries[0].key.normalize();
        assert_eq!(pin.name, "pin");
        assert!(pin.required);

        let interval = entries[1].key.normalize();
        assert_eq!(
            interval.default,
            Some(Literal::Period(TimePeriod::from_seconds(60.0)))
        );

        assert_eq!(entries[2].key, KeySpec::Bare("inverted".into()));
        assert_eq!(entries[2].validator, ValidatorNode::primitive(PrimitiveType::Boolean));
        assert!(matches!(entries[3].validator, ValidatorNode::All { .. }));
        assert!(matches!(entries[4].validator, ValidatorNode::List { .. }));
    }

    #[test]
    fn origin_only_for_named_kinds() {
        assert_eq!(ValidatorNode::callable("a.b").origin(), Some("a.b"));
        assert_eq!(
            ValidatorNode::Coerce {
                target: "int".into(),
                name: Some("cv.int_".into())
            }
            .origin(),
            Some("cv.int_")
        );
        assert_eq!(ValidatorNode::Match { pattern: "x".into() }.origin(), None);
        assert_eq!(
            ValidatorNode::Opaque {
                type_name: "Lambda".into(),
                name: Some(String::new())
            }
            .origin(),
            None
        );
    }

    #[test]
    fn kind_name_of_opaque_is_runtime_type() {
        let node = ValidatorNode::Opaque {
            type_name: "Invalid".into(),
            name: None,
        };
        assert_eq!(node.kind_name(), "Invalid");
        assert_eq!(ValidatorNode::List { items: vec![] }.kind_name(), "list");
    }

    #[test]
    fn null_default_normalizes_to_none() {
        let spec = KeySpec::Marker(KeyDescriptor::optional("x").with_default(Literal::Null));
        assert_eq!(spec.normalize().default, None);
    }

    #[test]
    fn primitive_from_type_name() {
        assert_eq!(PrimitiveType::from_type_name("str"), Some(PrimitiveType::String));
        assert_eq!(PrimitiveType::from_type_name("bool"), Some(PrimitiveType::Boolean));
        assert_eq!(PrimitiveType::from_type_name("TimePeriod"), None);
    }
}
