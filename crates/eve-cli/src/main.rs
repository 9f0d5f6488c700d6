//! # eve CLI entry point
//!
//! Parses command-line arguments, loads the catalog, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use eve_cli::audit::{render_text, run_audit, AuditArgs};
use eve_cli::schema::{
    run_components, run_core_schema, run_schema, ComponentsArgs, CoreSchemaArgs, SchemaArgs,
};
use eve_cli::{load_service, to_json};

/// Translate ESPHome component validators into UI schemas from the command line.
#[derive(Parser, Debug)]
#[command(name = "eve", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Catalog file or directory of catalog files.
    #[arg(long, global = true, env = "EVE_CATALOG_PATH", default_value = "catalog.yaml")]
    catalog: PathBuf,

    /// Extra root override tables (YAML).
    #[arg(long, global = true, env = "EVE_OVERRIDES_FILE")]
    overrides: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List catalog components as `domain:platform`.
    Components(ComponentsArgs),

    /// Print the UI schema document for one component.
    Schema(SchemaArgs),

    /// Print the UI schema document for a core module.
    #[command(name = "core-schema")]
    CoreSchema(CoreSchemaArgs),

    /// Report every field that falls back to raw YAML.
    Audit(AuditArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<u8> {
    let service = load_service(&cli.catalog, cli.overrides.as_deref())?;

    match &cli.command {
        Commands::Components(args) => {
            for line in run_components(&service, args)? {
                println!("{line}");
            }
        }
        Commands::Schema(args) => println!("{}", run_schema(&service, args)?),
        Commands::CoreSchema(args) => println!("{}", run_core_schema(&service, args)?),
        Commands::Audit(args) => {
            let report = run_audit(&service);
            if args.json {
                println!("{}", to_json(&report, true)?);
            } else {
                print!("{}", render_text(&report));
            }
            if !report.failed.is_empty() {
                return Ok(2);
            }
        }
    }
    Ok(0)
}
