//! Loading a catalog and override tables from disk.

use std::fs;

use eve_cli::load_service;
use eve_cli::schema::{run_schema, SchemaArgs};

const CATALOG: &str = r#"
components:
  - domain: sensor
    platform: dht
    schema:
      kind: schema
      entries:
        - key: { name: model, required: true }
          validator: { kind: type, of: string }
"#;

fn dht() -> SchemaArgs {
    SchemaArgs {
        domain: "sensor".into(),
        platform: "dht".into(),
        pretty: false,
    }
}

#[test]
fn overrides_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("catalog.yaml");
    let overrides = dir.path().join("overrides.yaml");
    fs::write(&catalog, CATALOG).unwrap();
    fs::write(
        &overrides,
        "required:\n  - { domain: sensor, platform: dht, drop: [model] }\n",
    )
    .unwrap();

    let plain = load_service(&catalog, None).unwrap();
    let json: serde_json::Value = serde_json::from_str(&run_schema(&plain, &dht()).unwrap()).unwrap();
    assert_eq!(json["schema"]["required"], serde_json::json!(["model", "platform"]));

    let tuned = load_service(&catalog, Some(&overrides)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&run_schema(&tuned, &dht()).unwrap()).unwrap();
    assert_eq!(json["schema"]["required"], serde_json::json!(["platform"]));
}

#[test]
fn missing_catalog_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_service(&dir.path().join("absent.yaml"), None).unwrap_err();
    assert!(format!("{err:#}").contains("absent.yaml"));
}

#[test]
fn malformed_overrides_fail() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("catalog.yaml");
    let overrides = dir.path().join("overrides.yaml");
    fs::write(&catalog, CATALOG).unwrap();
    fs::write(&overrides, "required: nope\n").unwrap();
    let err = load_service(&catalog, Some(&overrides)).unwrap_err();
    assert!(format!("{err:#}").contains("overrides"));
}
