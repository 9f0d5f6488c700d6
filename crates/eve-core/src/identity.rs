//! # Identifier Newtypes
//!
//! Validated wrappers for the names callers hand to eve: component
//! (domain, platform) pairs, core module names, and project document names.
//! Construction is the only validation point; a value of these types is
//! always well-formed.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

static COMPONENT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").expect("valid regex"));

static PROJECT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.-]{0,63}$").expect("valid regex"));

fn check_component_part(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if !COMPONENT_NAME_RE.is_match(trimmed) {
        return Err(ValidationError::Malformed {
            field,
            message: format!("invalid {field} '{trimmed}'; use letters/numbers/_.- (max 128)"),
        });
    }
    Ok(trimmed.to_string())
}

/// A (domain, platform) pair, e.g. `sensor` / `dht`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawComponentRef")]
pub struct ComponentRef {
    domain: String,
    platform: String,
}

#[derive(Deserialize)]
struct RawComponentRef {
    domain: String,
    platform: String,
}

impl TryFrom<RawComponentRef> for ComponentRef {
    type Error = ValidationError;

    fn try_from(raw: RawComponentRef) -> Result<Self, Self::Error> {
        Self::new(&raw.domain, &raw.platform)
    }
}

impl ComponentRef {
    /// Create a validated component reference.
    pub fn new(domain: &str, platform: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            domain: check_component_part("domain", domain)?,
            platform: check_component_part("platform", platform)?,
        })
    }

    /// The domain (e.g. `sensor`).
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The platform (e.g. `dht`).
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Display name as shown in the UI: `<domain>.<platform>`.
    pub fn display_name(&self) -> String {
        format!("{}.{}", self.domain, self.platform)
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.platform)
    }
}

/// Parses `domain:platform`.
impl FromStr for ComponentRef {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (domain, platform) = s.split_once(':').ok_or_else(|| ValidationError::Malformed {
            field: "component",
            message: format!("expected 'domain:platform', got '{}'", s.trim()),
        })?;
        Self::new(domain, platform)
    }
}

/// The name of a core (non-platform) module, e.g. `wifi` or `esphome`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentName(String);

impl ComponentName {
    /// Create a validated core module name.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        check_component_part("name", name).map(Self)
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ComponentName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ComponentName> for String {
    fn from(name: ComponentName) -> Self {
        name.0
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The name of a stored project document (file stem).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Create a validated project name.
    ///
    /// Names start with a letter or digit and contain only letters, digits,
    /// `_`, `.`, and `-`, up to 64 characters. Path separators can never
    /// appear, so a project name cannot escape its directory.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let trimmed = name.trim();
        if !PROJECT_NAME_RE.is_match(trimmed) {
            return Err(ValidationError::Malformed {
                field: "project name",
                message: "Invalid project name; use letters/numbers/._- (max 64).".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
