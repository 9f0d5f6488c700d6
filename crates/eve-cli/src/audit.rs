//! # Audit Subcommand
//!
//! Translates every component in the catalog and reports each field that
//! degraded to `raw_yaml`, with the reason. Used to find validators the
//! known-callable table should learn about.

use clap::Args;
use eve_schema::{SchemaService, UiOptions, UiSchema};
use serde::Serialize;

/// Arguments for `eve audit`.
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Print findings as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// One degraded field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// `domain.platform`.
    pub component: String,
    /// Dotted path from the root; `[]` marks array items, `|n` the n-th alternative.
    pub path: String,
    pub reason: String,
}

/// Audit summary.
#[derive(Debug, Default, Serialize)]
pub struct AuditReport {
    pub components: usize,
    /// Components the registry could not resolve.
    pub failed: Vec<String>,
    pub findings: Vec<Finding>,
}

/// Collect `raw_yaml` nodes below `node`.
pub fn raw_fields(node: &UiSchema, path: &str, out: &mut Vec<(String, String)>) {
    if node.is_raw_yaml() {
        out.push((path.to_string(), node.reason.clone().unwrap_or_default()));
        return;
    }
    if let Some(props) = &node.properties {
        for (name, child) in props.iter() {
            let child_path = if path.is_empty() {
                name.to_string()
            } else {
                format!("{path}.{name}")
            };
            raw_fields(child, &child_path, out);
        }
    }
    if let Some(items) = &node.items {
        raw_fields(items, &format!("{path}[]"), out);
    }
    if let Some(UiOptions::Alternatives(alternatives)) = &node.options {
        for (i, alt) in alternatives.iter().enumerate() {
            raw_fields(alt, &format!("{path}|{i}"), out);
        }
    }
}

/// Translate every component and collect degraded fields.
pub fn run_audit(service: &SchemaService) -> AuditReport {
    let mut report = AuditReport::default();
    for component in service.list_components(None) {
        report.components += 1;
        let doc = match service.component_schema(&component) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(component = %component, error = %e, "component failed to load");
                report.failed.push(component.display_name());
                continue;
            }
        };
        let mut raw = Vec::new();
        raw_fields(&doc.schema, "", &mut raw);
        report.findings.extend(raw.into_iter().map(|(path, reason)| Finding {
            component: doc.display_name.clone(),
            path,
            reason,
        }));
    }
    report
}

/// Render findings as text lines.
pub fn render_text(report: &AuditReport) -> String {
    let mut out = String::new();
    for f in &report.findings {
        let path = if f.path.is_empty() { "<root>" } else { &f.path };
        out.push_str(&format!("{}  {}  {}\n", f.component, path, f.reason));
    }
    for c in &report.failed {
        out.push_str(&format!("{c}  FAILED TO LOAD\n"));
    }
    out.push_str(&format!(
        "{} component(s), {} raw field(s), {} failed\n",
        report.components,
        report.findings.len(),
        report.failed.len()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use eve_registry::CatalogRegistry;
    use std::sync::Arc;

    const CATALOG: &str = r#"
components:
  - domain: display
    platform: lcd
    schema:
      kind: schema
      entries:
        - key: lambda
          validator: { kind: opaque, type_name: Lambda }
        - key: pages
          validator:
            kind: list
            items:
              - kind: schema
                entries:
                  - key: lambda
                    validator: { kind: callable, name: mystery.validator }
        - key: mode
          validator:
            kind: any
            validators:
              - { kind: type, of: string }
              - { kind: opaque, type_name: Invalid }
  - domain: switch
    platform: gpio
    schema:
      kind: schema
      entries:
        - key: inverted
          validator: { kind: type, of: boolean }
"#;

    fn service() -> SchemaService {
        SchemaService::new(Arc::new(CatalogRegistry::from_yaml_str(CATALOG).unwrap()))
    }

    #[test]
    fn finds_nested_raw_fields() {
        let report = run_audit(&service());
        assert_eq!(report.components, 2);
        assert!(report.failed.is_empty());
        let paths: Vec<&str> = report.findings.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["lambda", "pages[].lambda", "mode|1"]);
        assert_eq!(report.findings[0].reason, "Unsupported validator: Lambda");
        assert_eq!(report.findings[1].reason, "Unsupported validator: mystery.validator");
        assert!(report.findings.iter().all(|f| f.component == "display.lcd"));
    }

    #[test]
    fn text_summary() {
        let text = render_text(&run_audit(&service()));
        assert!(text.contains("display.lcd  pages[].lambda  Unsupported validator: mystery.validator"));
        assert!(text.ends_with("2 component(s), 3 raw field(s), 0 failed\n"));
    }
}
