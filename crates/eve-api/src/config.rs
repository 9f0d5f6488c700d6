//! # Service Settings
//!
//! Process configuration read from the environment. Each setting is looked
//! up under its plain name first and then with an `EVE_` prefix:
//!
//! | Variable               | Default                 |
//! |------------------------|-------------------------|
//! | `HOST`                 | `0.0.0.0`               |
//! | `PORT`                 | `6056`                  |
//! | `PROJECTS_DIR`         | `./projects`            |
//! | `COMPONENTS_ALLOWLIST` | unset (all components)  |
//! | `CORS_ORIGINS`         | `http://localhost:5174` |
//! | `STATIC_DIR`           | unset                   |
//! | `CATALOG_PATH`         | `./catalog.yaml`        |
//! | `OVERRIDES_FILE`       | unset                   |
//! | `VALIDATOR_CMD`        | `esphome`               |
//!
//! When running as a Home Assistant add-on, the Supervisor mounts options
//! at `/data/options.json`; its `projects_dir` and `allowlist` keys take
//! precedence over the environment.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use eve_core::ComponentRef;
use serde::Deserialize;
use thiserror::Error;

/// Default location of add-on options.
pub const ADDON_OPTIONS_PATH: &str = "/data/options.json";

/// Error in process configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `COMPONENTS_ALLOWLIST` is not `domain:platform,...`.
    #[error("COMPONENTS_ALLOWLIST must be 'domain:platform,...': {0}")]
    Allowlist(String),

    /// `PORT` is not a valid port number.
    #[error("invalid PORT '{0}'")]
    Port(String),
}

/// Resolved service settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub projects_dir: PathBuf,
    /// `None` serves every component the registry knows.
    pub allowlist: Option<BTreeSet<ComponentRef>>,
    pub cors_origins: Vec<String>,
    pub static_dir: Option<PathBuf>,
    pub catalog_path: PathBuf,
    pub overrides_file: Option<PathBuf>,
    pub validator_cmd: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 6056,
            projects_dir: PathBuf::from("./projects"),
            allowlist: None,
            cors_origins: vec!["http://localhost:5174".to_string()],
            static_dir: None,
            catalog_path: PathBuf::from("./catalog.yaml"),
            overrides_file: None,
            validator_cmd: "esphome".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AddonOptions {
    #[serde(default)]
    projects_dir: Option<String>,
    #[serde(default)]
    allowlist: Option<String>,
}

impl Settings {
    /// Read settings from the process environment and add-on options.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::from_lookup(|name| std::env::var(name).ok())?;
        settings.apply_addon_options(Path::new(ADDON_OPTIONS_PATH))?;
        Ok(settings)
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| lookup(&format!("EVE_{name}")))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Port(raw))?,
            None => defaults.port,
        };
        let allowlist = match var("COMPONENTS_ALLOWLIST") {
            Some(raw) => parse_allowlist(&raw)?,
            None => None,
        };
        let cors_origins = match var("CORS_ORIGINS") {
            Some(raw) => split_list(&raw),
            None => defaults.cors_origins,
        };

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            projects_dir: var("PROJECTS_DIR").map(PathBuf::from).unwrap_or(defaults.projects_dir),
            allowlist,
            cors_origins,
            static_dir: var("STATIC_DIR").map(PathBuf::from),
            catalog_path: var("CATALOG_PATH").map(PathBuf::from).unwrap_or(defaults.catalog_path),
            overrides_file: var("OVERRIDES_FILE").map(PathBuf::from),
            validator_cmd: var("VALIDATOR_CMD").unwrap_or(defaults.validator_cmd),
        })
    }

    /// Overlay add-on options if the file exists. An unreadable or
    /// malformed file is ignored with a warning.
    pub fn apply_addon_options(&mut self, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Ok(());
        }
        let options: AddonOptions = match std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
        {
            Ok(options) => options,
            Err(reason) => {
                tracing::warn!(path = %path.display(), %reason, "ignoring add-on options");
                return Ok(());
            }
        };

        if let Some(dir) = options.projects_dir.filter(|d| !d.trim().is_empty()) {
            self.projects_dir = PathBuf::from(dir.trim());
        }
        if let Some(raw) = options.allowlist {
            self.allowlist = parse_allowlist(&raw)?;
        }
        Ok(())
    }

    /// Socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse `domain:platform,...`. Blank input means "no allowlist".
pub fn parse_allowlist(raw: &str) -> Result<Option<BTreeSet<ComponentRef>>, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let mut items = BTreeSet::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let component: ComponentRef = entry
            .parse()
            .map_err(|e: eve_core::ValidationError| ConfigError::Allowlist(e.to_string()))?;
        items.insert(component);
    }
    Ok(Some(items))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
