//! Behavioural properties of the validator-to-UI translator.

use eve_core::{KeyDescriptor, Literal, PrimitiveType, SchemaEntry, TimePeriod, ValidatorNode};
use eve_schema::{translate, Translator, UiType};
use serde_json::json;

fn all(validators: Vec<ValidatorNode>) -> ValidatorNode {
    ValidatorNode::All { validators }
}

fn schema(entries: Vec<SchemaEntry>) -> ValidatorNode {
    ValidatorNode::Schema { entries }
}

#[test]
fn int_range_with_bounds_over_threshold_key() {
    let root = schema(vec![SchemaEntry::new(
        "threshold",
        all(vec![
            ValidatorNode::callable("int_range"),
            ValidatorNode::Range {
                min: Some(Literal::Int(0)),
                max: Some(Literal::Int(100)),
            },
        ]),
    )]);
    let out = translate(&root, "sensor", "adc").to_value();
    assert_eq!(
        out["properties"]["threshold"],
        json!({
            "type": "int",
            "minimum": 0,
            "maximum": 100,
            "ui": {"origin": "int_range", "origins": ["int_range"]}
        })
    );
}

#[test]
fn structural_member_wins_regardless_of_position() {
    let unknown = ValidatorNode::callable("esphome.config_validation.ensure_list");
    let list = ValidatorNode::list_of(ValidatorNode::primitive(PrimitiveType::String));
    let t = Translator::new();

    for members in [vec![unknown.clone(), list.clone()], vec![list, unknown]] {
        let root = schema(vec![SchemaEntry::new("areas", all(members))]);
        let out = t.translate(&root, "d", "p");
        let areas = out.property("areas").unwrap();
        assert_eq!(areas.kind(), UiType::Array);
        assert_eq!(areas.items.as_deref().map(|i| i.kind()), Some(UiType::String));
        assert!(areas
            .ui
            .origins
            .contains(&"esphome.config_validation.ensure_list".to_string()));
    }
}

#[test]
fn origins_deduplicated_across_nested_merges() {
    let inner = all(vec![
        ValidatorNode::callable("esphome.config_validation.int_"),
        ValidatorNode::callable("x.check"),
    ]);
    let outer = all(vec![
        inner,
        ValidatorNode::callable("esphome.config_validation.int_"),
        ValidatorNode::callable("y.other"),
    ]);
    let root = schema(vec![SchemaEntry::new("n", outer)]);
    let out = translate(&root, "d", "p");
    let n = out.property("n").unwrap();
    assert_eq!(n.kind(), UiType::Int);
    assert_eq!(
        n.ui.origins,
        ["esphome.config_validation.int_", "x.check", "y.other"]
    );
    assert_eq!(n.ui.origin.as_deref(), Some("esphome.config_validation.int_"));
}

#[test]
fn platform_constant_injected_on_object_roots() {
    let root = schema(vec![SchemaEntry::new(
        KeyDescriptor::required("name"),
        ValidatorNode::primitive(PrimitiveType::String),
    )]);
    let out = translate(&root, "switch", "relay1").to_value();
    assert_eq!(out["properties"]["platform"], json!({"type": "const", "value": "relay1"}));
    assert_eq!(out["required"], json!(["name", "platform"]));
}

#[test]
fn build_path_never_required_for_root_module() {
    let root = schema(vec![
        SchemaEntry::new(
            KeyDescriptor::required("build_path"),
            ValidatorNode::primitive(PrimitiveType::String),
        ),
        SchemaEntry::new(
            KeyDescriptor::required("name"),
            ValidatorNode::primitive(PrimitiveType::String),
        ),
    ]);
    let out = translate(&root, "esphome", "esphome");
    assert!(!out.required.iter().any(|k| k == "build_path"));
    assert!(out.property("build_path").is_some());
}

#[test]
fn duration_enum_members_become_seconds() {
    let node = ValidatorNode::In {
        members: vec![
            TimePeriod::from_seconds(30.0).into(),
            TimePeriod::from_seconds(60.0).into(),
        ],
    };
    let out = translate(&schema(vec![SchemaEntry::new("interval", node)]), "d", "p").to_value();
    assert_eq!(
        out["properties"]["interval"],
        json!({"type": "enum", "options": [
            {"value": 30.0, "label": "30s"},
            {"value": 60.0, "label": "60s"},
        ]})
    );
}

#[test]
fn unknown_validator_degrades_without_affecting_siblings() {
    let root = schema(vec![
        SchemaEntry::new(
            "lambda",
            ValidatorNode::Opaque {
                type_name: "Lambda".into(),
                name: None,
            },
        ),
        SchemaEntry::new("enabled", ValidatorNode::primitive(PrimitiveType::Boolean)),
    ]);
    let out = translate(&root, "d", "p").to_value();
    assert_eq!(
        out["properties"]["lambda"],
        json!({"type": "raw_yaml", "reason": "Unsupported validator: Lambda"})
    );
    assert_eq!(out["properties"]["enabled"], json!({"type": "boolean"}));
}

#[test]
fn translates_catalog_yaml_graph() {
    let yaml = r#"
kind: schema
entries:
  - key: { name: id, required: false }
    validator: { kind: callable, name: esphome.core.declare_id }
  - key: { name: update_interval, default: { $seconds: 60 } }
    validator: { kind: callable, name: esphome.config_validation.update_interval }
  - key: { name: mode, default: fast }
    validator:
      kind: all
      validators:
        - { kind: coerce, target: str, name: esphome.config_validation.string }
        - { kind: in, members: [fast, slow] }
  - key: { name: tags }
    validator: { kind: list, items: [{ kind: type, of: string }] }
"#;
    let node: ValidatorNode = serde_yaml::from_str(yaml).unwrap();
    let out = translate(&node, "sensor", "custom").to_value();
    let props = &out["properties"];
    assert_eq!(props["id"], json!({"type": "id"}));
    assert_eq!(props["update_interval"]["type"], json!("raw_yaml"));
    assert!(props["update_interval"].get("default").is_none());
    assert_eq!(props["mode"]["type"], json!("string"));
    assert_eq!(props["mode"]["default"], json!("fast"));
    assert_eq!(props["mode"]["options"][1], json!({"value": "slow", "label": "slow"}));
    assert_eq!(props["tags"], json!({"type": "array", "items": {"type": "string"}}));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn literal() -> impl Strategy<Value = Literal> {
        prop_oneof![
            any::<i32>().prop_map(|i| Literal::Int(i64::from(i))),
            "[a-z]{1,8}".prop_map(Literal::String),
            (0u32..3600).prop_map(|s| Literal::Period(TimePeriod::from_seconds(f64::from(s)))),
        ]
    }

    fn leaf() -> impl Strategy<Value = ValidatorNode> {
        prop_oneof![
            prop_oneof![
                Just(PrimitiveType::Boolean),
                Just(PrimitiveType::Int),
                Just(PrimitiveType::Float),
                Just(PrimitiveType::String),
            ]
            .prop_map(ValidatorNode::primitive),
            "[a-z_]{1,12}(\\.[a-z_]{1,12}){0,2}".prop_map(ValidatorNode::callable),
            prop::collection::vec(literal(), 0..4).prop_map(|members| ValidatorNode::In { members }),
            (prop::option::of(literal()), prop::option::of(literal()))
                .prop_map(|(min, max)| ValidatorNode::Range { min, max }),
            (prop::option::of(0u64..10), prop::option::of(10u64..100))
                .prop_map(|(min, max)| ValidatorNode::Length { min, max }),
            "[a-z^$]{0,8}".prop_map(|pattern| ValidatorNode::Match { pattern }),
            "[A-Z][a-z]{1,8}".prop_map(|type_name| ValidatorNode::Opaque { type_name, name: None }),
        ]
    }

    fn graph() -> impl Strategy<Value = ValidatorNode> {
        leaf().prop_recursive(4, 48, 5, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4)
                    .prop_map(|validators| ValidatorNode::All { validators }),
                prop::collection::vec(inner.clone(), 0..4)
                    .prop_map(|validators| ValidatorNode::Any { validators }),
                inner.clone().prop_map(ValidatorNode::list_of),
                prop::collection::vec(("[a-z_]{1,10}", any::<bool>(), inner), 0..5).prop_map(
                    |fields| ValidatorNode::Schema {
                        entries: fields
                            .into_iter()
                            .map(|(name, required, v)| {
                                let key = if required {
                                    KeyDescriptor::required(name)
                                } else {
                                    KeyDescriptor::optional(name)
                                };
                                SchemaEntry::new(key, v)
                            })
                            .collect(),
                    }
                ),
            ]
        })
    }

    /// Scalar refinements that never set the same constraint field.
    fn range_refinement() -> impl Strategy<Value = ValidatorNode> {
        (prop::option::of(any::<i32>()), prop::option::of(any::<i32>())).prop_map(|(min, max)| {
            ValidatorNode::Range {
                min: min.map(|m| Literal::Int(i64::from(m))),
                max: max.map(|m| Literal::Int(i64::from(m))),
            }
        })
    }

    fn text_refinement() -> impl Strategy<Value = ValidatorNode> {
        prop_oneof![
            (prop::option::of(0u64..10), prop::option::of(10u64..100))
                .prop_map(|(min, max)| ValidatorNode::Length { min, max }),
            "[a-z]{1,6}".prop_map(|pattern| ValidatorNode::Match { pattern }),
            prop::collection::vec("[a-z]{1,6}".prop_map(Literal::String), 1..4)
                .prop_map(|members| ValidatorNode::In { members }),
        ]
    }

    proptest! {
        /// The same graph always yields the same bytes.
        #[test]
        fn translation_is_idempotent(node in graph()) {
            let t = Translator::new();
            let a = serde_json::to_string(&t.translate(&node, "d", "p")).unwrap();
            let b = serde_json::to_string(&t.translate(&node, "d", "p")).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Origins never repeat and `origin` heads `origins`.
        #[test]
        fn origins_unique_and_headed_by_origin(node in graph()) {
            fn check(value: &serde_json::Value) -> Result<(), TestCaseError> {
                if let Some(ui) = value.get("ui") {
                    if let Some(origins) = ui.get("origins").and_then(|o| o.as_array()) {
                        let mut seen = std::collections::HashSet::new();
                        for o in origins {
                            prop_assert!(seen.insert(o.to_string()), "duplicate origin {}", o);
                        }
                        prop_assert_eq!(ui.get("origin"), origins.first());
                    }
                }
                match value {
                    serde_json::Value::Object(map) => {
                        for (k, v) in map {
                            if k != "ui" {
                                check(v)?;
                            }
                        }
                    }
                    serde_json::Value::Array(items) => {
                        for v in items {
                            check(v)?;
                        }
                    }
                    _ => {}
                }
                Ok(())
            }
            check(&translate(&node, "d", "p").to_value())?;
        }

        /// Object roots always require their platform constant.
        #[test]
        fn object_roots_self_identify(
            fields in prop::collection::vec(("[a-z_]{1,10}", leaf()), 0..6),
            platform in "[a-z0-9_]{1,12}",
        ) {
            let root = ValidatorNode::Schema {
                entries: fields.into_iter().map(|(k, v)| SchemaEntry::new(k.as_str(), v)).collect(),
            };
            let out = translate(&root, "switch", &platform);
            prop_assert!(out.required.iter().any(|k| k == "platform"));
            let props = out.properties.as_ref().unwrap();
            for name in &out.required {
                prop_assert!(props.contains(name));
            }
        }

        /// Swapping two conflict-free refinements changes only the order
        /// of origins, never the constraint values.
        #[test]
        fn scalar_refinements_commute(a in range_refinement(), b in text_refinement()) {
            let t = Translator::new();
            let ab = t.translate(&all(vec![a.clone(), b.clone()]), "d", "p");
            let ba = t.translate(&all(vec![b, a]), "d", "p");
            prop_assert_eq!(&ab.minimum, &ba.minimum);
            prop_assert_eq!(&ab.maximum, &ba.maximum);
            prop_assert_eq!(&ab.min_length, &ba.min_length);
            prop_assert_eq!(&ab.max_length, &ba.max_length);
            prop_assert_eq!(&ab.pattern, &ba.pattern);
            prop_assert_eq!(&ab.default, &ba.default);
            prop_assert_eq!(&ab.options, &ba.options);
        }
    }
}
