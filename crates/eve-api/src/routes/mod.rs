//! # API Route Modules
//!
//! - `meta`: service and framework version.
//! - `components`: component listing and translated UI schemas for
//!   platform components and core modules, filtered by the allowlist.
//! - `projects`: named YAML documents in the projects directory.
//! - `boards`: development-board catalog and pin tables.
//! - `validate`: full validation through the framework CLI.

pub mod boards;
pub mod components;
pub mod meta;
pub mod projects;
pub mod validate;
