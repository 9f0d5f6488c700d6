//! # Error Types
//!
//! Error taxonomy shared by every eve crate. All errors use `thiserror`.
//!
//! ## Design
//!
//! - Translation never produces an error. A validator the translator cannot
//!   interpret degrades to a `raw_yaml` node carrying a reason string.
//! - Registry resolution failures are the only errors that cross the
//!   translator boundary, and they are never retried.
//! - Malformed caller identifiers are rejected at construction.

use thiserror::Error;

/// A caller-supplied identifier failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The identifier was empty after trimming.
    #[error("{field} must not be empty")]
    Empty {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The identifier contained characters outside the allowed set.
    #[error("{message}")]
    Malformed {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable explanation.
        message: String,
    },
}

/// The component registry failed to produce a validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No component, platform, or core module with that name exists, or it
    /// exposes no validator.
    #[error("{0} not found")]
    NotFound(String),

    /// The registry exists but could not load the requested validator.
    #[error("{0}")]
    Load(String),
}

impl RegistryError {
    /// Whether this error means the requested item does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_not_found_display() {
        let err = RegistryError::NotFound("component sensor.nope".to_string());
        assert_eq!(err.to_string(), "component sensor.nope not found");
        assert!(err.is_not_found());
        assert!(!RegistryError::Load("boom".into()).is_not_found());
    }
}
