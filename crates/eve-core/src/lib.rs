//! # eve-core — Foundational Types for eve
//!
//! eve exposes a configuration framework's validator objects as UI-renderable
//! schema documents. This crate is the leaf of the workspace DAG: it defines
//! the data every other crate agrees on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **The validator graph is a tagged union.** [`ValidatorNode`] enumerates
//!    every validator shape the translator distinguishes. Registries export
//!    graphs in this form (YAML or JSON, tagged by `kind`), so dispatch is a
//!    `match` rather than runtime type inspection.
//!
//! 2. **Literals keep their non-JSON forms.** Durations and opaque values are
//!    distinct [`Literal`] variants. JSON conversion is explicit and fallible
//!    ([`Literal::to_json`]), which is how "JSON-compatible default" is decided.
//!
//! 3. **Validated identifiers.** [`ComponentRef`], [`ComponentName`], and
//!    [`ProjectName`] only exist in validated form. Malformed caller input is
//!    rejected at construction with a [`ValidationError`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `eve-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod literal;
pub mod validator;

pub use error::{RegistryError, ValidationError};
pub use identity::{ComponentName, ComponentRef, ProjectName};
pub use literal::{Literal, OpaqueLiteral, TimePeriod};
pub use validator::{KeyDescriptor, KeySpec, PrimitiveType, SchemaEntry, ValidatorNode};
