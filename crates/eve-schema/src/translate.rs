//! # Validator-to-UI Translation
//!
//! Walks a validator graph and produces the UI schema a form renderer
//! needs. Translation is a pure function of the graph and the translator's
//! tables. It never fails: a validator it cannot interpret becomes a
//! `raw_yaml` node carrying a diagnostic, so one unrenderable field falls
//! back to a YAML editor without taking the rest of the form with it.
//!
//! ## Dispatch
//!
//! Nodes are matched in a fixed priority order:
//!
//! 1. object schema / mapping → `object`
//! 2. single-element list → `array` of the element
//! 3. primitive type coercer → the primitive
//! 4. known callable → the primitive, else the `id` / `pin` key heuristic
//! 5. coercion to a primitive → the primitive
//! 6. membership → `enum`
//! 7. disjunction → `any_of`
//! 8. conjunction → [merged](crate::merge)
//! 9. range → `number`
//! 10. length → `string` with length bounds
//! 11. pattern → `string` with `pattern`
//! 12. anything else → `raw_yaml`

use std::collections::BTreeSet;

use eve_core::{Literal, PrimitiveType, SchemaEntry, ValidatorNode};

use crate::known::{key_heuristic, KnownCallables};
use crate::merge::merge_conjunction;
use crate::overrides::RootOverrides;
use crate::transport::TRANSPORT_GROUP;
use crate::ui::{EnumOption, Properties, UiSchema, UiType};

/// Translate with the built-in tables and no transport fields.
pub fn translate(root: &ValidatorNode, domain: &str, platform: &str) -> UiSchema {
    Translator::default().translate(root, domain, platform)
}

/// Validator graph translator.
///
/// Holds the lookup tables translation depends on. A translator is
/// immutable once built and can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    known: KnownCallables,
    overrides: RootOverrides,
    transport_fields: BTreeSet<String>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the known-callable table.
    pub fn with_known_callables(mut self, known: KnownCallables) -> Self {
        self.known = known;
        self
    }

    /// Replace the root override tables.
    pub fn with_overrides(mut self, overrides: RootOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Field names to group under the transport block.
    pub fn with_transport_fields(mut self, fields: impl IntoIterator<Item = String>) -> Self {
        self.transport_fields = fields.into_iter().collect();
        self
    }

    /// Translate a component's root validator.
    ///
    /// Object roots always declare a required `platform` constant and get
    /// the override tables for (`domain`, `platform`) applied. Every root is
    /// stamped with `ui.domain` / `ui.platform`.
    pub fn translate(&self, root: &ValidatorNode, domain: &str, platform: &str) -> UiSchema {
        let mut schema = self.convert(root, None);

        if schema.kind() == UiType::Object {
            let props = schema.properties.get_or_insert_with(Properties::new);
            if !props.contains("platform") {
                props.insert("platform", UiSchema::constant(platform));
            }
            if !schema.required.iter().any(|k| k == "platform") {
                schema.required.push("platform".to_string());
            }
            self.overrides.apply(&mut schema, domain, platform);
        }

        schema.ui.domain.get_or_insert_with(|| domain.to_string());
        schema.ui.platform.get_or_insert_with(|| platform.to_string());
        schema
    }

    /// Translate one node. `key` is the name of the object key whose value
    /// this node validates, if any.
    fn convert(&self, node: &ValidatorNode, key: Option<&str>) -> UiSchema {
        let origin = node.origin();
        match node {
            ValidatorNode::Schema { entries } | ValidatorNode::Mapping { entries } => {
                self.convert_object(entries)
            }
            ValidatorNode::List { items } if items.len() == 1 => {
                UiSchema::array(self.convert(&items[0], key))
            }
            ValidatorNode::Type { of, .. } => UiSchema::primitive(*of).with_origin(origin),
            _ => {
                if let Some(known) = self.known_or_heuristic(node, key) {
                    return known;
                }
                self.convert_constraint(node, key)
            }
        }
    }

    fn known_or_heuristic(&self, node: &ValidatorNode, key: Option<&str>) -> Option<UiSchema> {
        if let Some(name) = node.origin() {
            if let Some(of) = self.known.lookup(name) {
                return Some(UiSchema::primitive(of).with_origin(Some(name)));
            }
        }
        key_heuristic(key)
    }

    fn convert_constraint(&self, node: &ValidatorNode, key: Option<&str>) -> UiSchema {
        match node {
            ValidatorNode::Coerce { target, name } => {
                match PrimitiveType::from_type_name(target) {
                    Some(of) => UiSchema::primitive(of).with_origin(name.as_deref()),
                    None => degrade(node),
                }
            }
            ValidatorNode::In { members } => UiSchema::enumeration(
                members
                    .iter()
                    .map(|m| EnumOption {
                        value: m.to_json_scalar(),
                        label: m.to_string(),
                    })
                    .collect(),
            ),
            ValidatorNode::Any { validators } => {
                UiSchema::any_of(validators.iter().map(|v| self.convert(v, key)).collect())
            }
            ValidatorNode::All { validators } => {
                merge_conjunction(validators.iter().map(|v| self.convert(v, key)).collect())
            }
            ValidatorNode::Range { min, max } => UiSchema {
                minimum: min.as_ref().map(Literal::to_json_scalar),
                maximum: max.as_ref().map(Literal::to_json_scalar),
                ..UiSchema::new(UiType::Number)
            },
            ValidatorNode::Length { min, max } => UiSchema {
                min_length: *min,
                max_length: *max,
                ..UiSchema::new(UiType::String)
            },
            ValidatorNode::Match { pattern } => UiSchema {
                pattern: Some(pattern.clone()),
                ..UiSchema::new(UiType::String)
            },
            _ => degrade(node),
        }
    }

    fn convert_object(&self, entries: &[SchemaEntry]) -> UiSchema {
        let mut properties = Properties::new();
        let mut required: Vec<String> = Vec::new();

        for entry in entries {
            let key = entry.key.normalize();
            let mut field = self.convert(&entry.validator, Some(&key.name));

            if let Some(component) = &key.only_with {
                field.ui.tag_group(component);
            }
            if self.transport_fields.contains(&key.name) {
                field.ui.tag_group(TRANSPORT_GROUP);
            }
            if !field.is_raw_yaml() && field.default.is_none() {
                field.default = key.default.as_ref().and_then(Literal::to_json);
            }

            if key.required && !required.contains(&key.name) {
                required.push(key.name.clone());
            }
            properties.insert(key.name, field);
        }

        UiSchema::object(properties, required)
    }
}

/// The raw fallback for a node nothing else matched.
fn degrade(node: &ValidatorNode) -> UiSchema {
    let origin = node.origin();
    let label = origin.unwrap_or_else(|| node.kind_name());
    tracing::debug!(validator = label, "unsupported validator rendered as raw_yaml");
    UiSchema::raw_yaml(format!("Unsupported validator: {label}")).with_origin(origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eve_core::{KeyDescriptor, TimePeriod};
    use serde_json::json;

    fn object(entries: Vec<SchemaEntry>) -> ValidatorNode {
        ValidatorNode::Schema { entries }
    }

    fn field<'a>(schema: &'a UiSchema, name: &str) -> &'a UiSchema {
        schema.property(name).unwrap()
    }

    #[test]
    fn primitive_type_coercer() {
        let node = ValidatorNode::Type {
            of: PrimitiveType::Float,
            name: Some("builtins.float".into()),
        };
        assert_eq!(
            translate(&node, "d", "p").to_value(),
            json!({"type": "float", "ui": {
                "origin": "builtins.float", "origins": ["builtins.float"],
                "domain": "d", "platform": "p"}})
        );
    }

    #[test]
    fn single_element_list_is_array() {
        let node = ValidatorNode::list_of(ValidatorNode::primitive(PrimitiveType::String));
        let schema = Translator::new().convert(&node, None);
        assert_eq!(schema.to_value(), json!({"type": "array", "items": {"type": "string"}}));
    }

    #[test]
    fn multi_element_list_degrades_by_kind() {
        let node = ValidatorNode::List { items: vec![] };
        let schema = Translator::new().convert(&node, None);
        assert_eq!(
            schema.to_value(),
            json!({"type": "raw_yaml", "reason": "Unsupported validator: list"})
        );
    }

    #[test]
    fn known_callable_is_tagged_primitive() {
        let node = ValidatorNode::callable("esphome.config_validation._validate_icon");
        let schema = Translator::new().convert(&node, None);
        assert_eq!(schema.kind(), UiType::String);
        assert_eq!(
            schema.ui.origin.as_deref(),
            Some("esphome.config_validation._validate_icon")
        );
    }

    #[test]
    fn heuristic_applies_to_unknown_callables_by_key() {
        let t = Translator::new();
        let node = ValidatorNode::callable("esphome.core.ID");
        assert_eq!(t.convert(&node, Some("id")).kind(), UiType::Id);
        let pin = t.convert(&ValidatorNode::callable("pins.gpio_output_pin_schema"), Some("pin"));
        assert_eq!(pin.to_value(), json!({"type": "pin", "capabilities": ["gpio"]}));
        assert_eq!(t.convert(&node, Some("name")).kind(), UiType::RawYaml);
    }

    #[test]
    fn known_table_beats_heuristic() {
        let node = ValidatorNode::callable("esphome.config_validation.string");
        assert_eq!(Translator::new().convert(&node, Some("device_id")).kind(), UiType::String);
    }

    #[test]
    fn coerce_to_primitive_and_non_primitive() {
        let t = Translator::new();
        let int = ValidatorNode::Coerce {
            target: "int".into(),
            name: None,
        };
        assert_eq!(t.convert(&int, None).to_value(), json!({"type": "int"}));
        let period = ValidatorNode::Coerce {
            target: "TimePeriod".into(),
            name: None,
        };
        assert_eq!(
            t.convert(&period, None).reason.as_deref(),
            Some("Unsupported validator: Coerce")
        );
    }

    #[test]
    fn membership_becomes_enum() {
        let node = ValidatorNode::In {
            members: vec!["fast".into(), Literal::Int(3), Literal::Bool(true)],
        };
        assert_eq!(
            Translator::new().convert(&node, None).to_value(),
            json!({"type": "enum", "options": [
                {"value": "fast", "label": "fast"},
                {"value": 3, "label": "3"},
                {"value": true, "label": "true"},
            ]})
        );
    }

    #[test]
    fn whole_float_members_get_distinct_labels() {
        let node = ValidatorNode::In {
            members: vec![Literal::Float(1.0), Literal::Int(1), Literal::Float(2.5)],
        };
        assert_eq!(
            Translator::new().convert(&node, None).to_value(),
            json!({"type": "enum", "options": [
                {"value": 1.0, "label": "1.0"},
                {"value": 1, "label": "1"},
                {"value": 2.5, "label": "2.5"},
            ]})
        );
    }

    #[test]
    fn disjunction_preserves_order() {
        let node = ValidatorNode::Any {
            validators: vec![
                ValidatorNode::primitive(PrimitiveType::Int),
                ValidatorNode::primitive(PrimitiveType::String),
            ],
        };
        assert_eq!(
            Translator::new().convert(&node, None).to_value(),
            json!({"type": "any_of", "options": [{"type": "int"}, {"type": "string"}]})
        );
    }

    #[test]
    fn range_length_and_pattern() {
        let t = Translator::new();
        let range = ValidatorNode::Range {
            min: Some(TimePeriod::from_millis(500).into()),
            max: None,
        };
        assert_eq!(t.convert(&range, None).to_value(), json!({"type": "number", "minimum": 0.5}));
        let length = ValidatorNode::Length {
            min: Some(1),
            max: Some(31),
        };
        assert_eq!(
            t.convert(&length, None).to_value(),
            json!({"type": "string", "minLength": 1, "maxLength": 31})
        );
        let pattern = ValidatorNode::Match {
            pattern: "^[a-z]+$".into(),
        };
        assert_eq!(
            t.convert(&pattern, None).to_value(),
            json!({"type": "string", "pattern": "^[a-z]+$"})
        );
    }

    #[test]
    fn opaque_with_name_degrades_with_origin() {
        let node = ValidatorNode::Opaque {
            type_name: "Lambda".into(),
            name: Some("esphome.config_validation.lambda_".into()),
        };
        let schema = Translator::new().convert(&node, None);
        assert_eq!(
            schema.reason.as_deref(),
            Some("Unsupported validator: esphome.config_validation.lambda_")
        );
        assert_eq!(schema.ui.origins, ["esphome.config_validation.lambda_"]);
    }

    #[test]
    fn object_fields_required_defaults_and_groups() {
        let root = object(vec![
            SchemaEntry::new(
                KeyDescriptor::required("name"),
                ValidatorNode::primitive(PrimitiveType::String),
            ),
            SchemaEntry::new(
                KeyDescriptor::optional("interval").with_default(TimePeriod::from_seconds(60.0)),
                ValidatorNode::primitive(PrimitiveType::Float),
            ),
            SchemaEntry::new(
                KeyDescriptor::optional("inverted").with_default(false),
                ValidatorNode::primitive(PrimitiveType::Boolean),
            ),
            SchemaEntry::new(
                KeyDescriptor::optional("lambda").with_default("x"),
                ValidatorNode::callable("unknown.lambda"),
            ),
            SchemaEntry::new(
                KeyDescriptor::optional("qos").only_with("mqtt"),
                ValidatorNode::primitive(PrimitiveType::Int),
            ),
            SchemaEntry::new("retain", ValidatorNode::primitive(PrimitiveType::Boolean)),
        ]);
        let t = Translator::new().with_transport_fields(["retain".to_string()]);
        let schema = t.convert(&root, None);

        assert_eq!(schema.required, ["name"]);
        assert_eq!(field(&schema, "interval").default, None);
        assert_eq!(field(&schema, "inverted").default, Some(json!(false)));
        assert_eq!(field(&schema, "lambda").default, None);
        assert_eq!(field(&schema, "qos").ui.only_with.as_deref(), Some("mqtt"));
        assert_eq!(field(&schema, "qos").ui.group.as_deref(), Some("mqtt"));
        assert_eq!(field(&schema, "retain").ui.group.as_deref(), Some("mqtt"));
        let names: Vec<&str> = schema.properties.as_ref().unwrap().names().collect();
        assert_eq!(names, ["name", "interval", "inverted", "lambda", "qos", "retain"]);
    }

    #[test]
    fn only_with_tag_wins_over_transport_tag() {
        let root = object(vec![SchemaEntry::new(
            KeyDescriptor::optional("topic").only_with("api"),
            ValidatorNode::primitive(PrimitiveType::String),
        )]);
        let t = Translator::new().with_transport_fields(["topic".to_string()]);
        let schema = t.convert(&root, None);
        assert_eq!(field(&schema, "topic").ui.only_with.as_deref(), Some("api"));
    }

    #[test]
    fn root_gets_platform_constant_and_tags() {
        let schema = translate(&object(vec![]), "switch", "relay1");
        assert_eq!(
            schema.to_value(),
            json!({
                "type": "object",
                "properties": {"platform": {"type": "const", "value": "relay1"}},
                "required": ["platform"],
                "ui": {"domain": "switch", "platform": "relay1"}
            })
        );
    }

    #[test]
    fn existing_platform_field_is_kept() {
        let root = object(vec![SchemaEntry::new(
            KeyDescriptor::required("platform"),
            ValidatorNode::primitive(PrimitiveType::String),
        )]);
        let schema = translate(&root, "sensor", "dht");
        assert_eq!(field(&schema, "platform").kind(), UiType::String);
        assert_eq!(schema.required, ["platform"]);
    }

    #[test]
    fn non_object_root_still_tagged() {
        let schema = translate(&ValidatorNode::callable("x.y"), "d", "p");
        assert_eq!(schema.kind(), UiType::RawYaml);
        assert_eq!(schema.ui.domain.as_deref(), Some("d"));
        assert!(schema.properties.is_none());
    }

    #[test]
    fn custom_tables_replace_builtins() {
        let mut known = KnownCallables::empty();
        known.insert("mylib.validators.percent", PrimitiveType::Float);
        let t = Translator::new()
            .with_known_callables(known)
            .with_overrides(RootOverrides::empty());

        let root = object(vec![
            SchemaEntry::new(
                KeyDescriptor::required("build_path"),
                ValidatorNode::callable("mylib.validators.percent"),
            ),
            SchemaEntry::new(
                "name",
                ValidatorNode::callable("esphome.config_validation.string"),
            ),
        ]);
        let schema = t.translate(&root, "esphome", "esphome");
        assert_eq!(field(&schema, "build_path").kind(), UiType::Float);
        assert_eq!(field(&schema, "name").kind(), UiType::RawYaml);
        assert_eq!(schema.required, ["build_path", "platform"]);
        assert_eq!(
            t.convert(&ValidatorNode::callable("percent"), None).kind(),
            UiType::Float
        );
    }
}
