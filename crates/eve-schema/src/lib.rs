//! # eve-schema — Validator-to-UI Schema Translation
//!
//! Turns the validator graphs a [`ComponentRegistry`](eve_registry::ComponentRegistry)
//! exposes into declarative UI schemas a generic form renderer can build an
//! editor from.
//!
//! ## Translation (`translate`)
//!
//! - [`Translator::translate`]: recursive conversion of one validator
//!   graph, with root post-processing (platform constant, override tables,
//!   domain/platform tags).
//! - [`translate`]: the same with the built-in tables.
//!
//! Conjunctions are merged by [`merge`]; named validators are looked up in
//! [`known`]; per-(domain, platform) corrections live in [`overrides`].
//!
//! ## Introspection (`service`)
//!
//! [`SchemaService`] lists components and serves memoized schema documents
//! for platform components and core modules.
//!
//! ## Crate Policy
//!
//! - Depends on `eve-core` and `eve-registry` internally.
//! - Translation never fails. Unrecognized validators degrade to
//!   `raw_yaml` nodes; only registry resolution returns errors.
//! - Translation reads no document instance and performs no I/O.

pub mod known;
pub mod merge;
pub mod overrides;
pub mod service;
pub mod translate;
pub mod transport;
pub mod ui;

pub use known::KnownCallables;
pub use overrides::{OverridesError, RequiredOverride, RootOverrides, ShapeOverride};
pub use service::{ComponentSchemaDocument, CoreSchemaDocument, Docs, SchemaService};
pub use translate::{translate, Translator};
pub use ui::{EnumOption, Properties, UiMeta, UiOptions, UiSchema, UiType};
