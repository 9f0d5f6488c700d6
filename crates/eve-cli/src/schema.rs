//! # Listing and Schema Subcommands

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use clap::Args;
use eve_core::{ComponentName, ComponentRef};
use eve_schema::SchemaService;

/// Arguments for `eve components`.
#[derive(Args, Debug)]
pub struct ComponentsArgs {
    /// Limit the listing to these `domain:platform` pairs (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

/// Arguments for `eve schema`.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Component domain, e.g. `sensor`.
    pub domain: String,
    /// Platform within the domain, e.g. `dht`.
    pub platform: String,
    /// Indent the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for `eve core-schema`.
#[derive(Args, Debug)]
pub struct CoreSchemaArgs {
    /// Core module name, e.g. `esphome` or `wifi`.
    pub name: String,
    /// Indent the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Component lines (`domain:platform`), sorted.
pub fn run_components(service: &SchemaService, args: &ComponentsArgs) -> Result<Vec<String>> {
    let filter = if args.only.is_empty() {
        None
    } else {
        let pairs = args
            .only
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<ComponentRef>().with_context(|| format!("invalid component '{s}'")))
            .collect::<Result<BTreeSet<_>>>()?;
        Some(pairs)
    };
    Ok(service
        .list_components(filter.as_ref())
        .iter()
        .map(ToString::to_string)
        .collect())
}

/// The component schema document as JSON.
pub fn run_schema(service: &SchemaService, args: &SchemaArgs) -> Result<String> {
    let component = ComponentRef::new(&args.domain, &args.platform)?;
    let doc = service
        .component_schema(&component)
        .with_context(|| format!("cannot load schema for {}", component.display_name()))?;
    crate::to_json(doc.as_ref(), args.pretty)
}

/// The core module schema document as JSON.
pub fn run_core_schema(service: &SchemaService, args: &CoreSchemaArgs) -> Result<String> {
    let name = ComponentName::new(&args.name)?;
    let doc = service
        .core_schema(&name)
        .with_context(|| format!("cannot load core schema for {name}"))?;
    crate::to_json(doc.as_ref(), args.pretty)
}
