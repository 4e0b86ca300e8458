//! # drs-schema — Schema Handling for the DRS Conformance Harness
//!
//! Provides the three schema-side building blocks the endpoint validator
//! needs:
//!
//! - [`SchemaCatalog`] — the status-code → schema-name dispatch table.
//!   The catalog enforces its partition invariant at construction time:
//!   no status code may be claimed by two schema names, and a lookup for
//!   an unmapped status code is a configuration error, never a silent
//!   first match.
//! - [`SchemaStore`] — loads `<name>.json` from a flat schema directory
//!   on every validation call (no caching; call volume is one test suite
//!   run, not a hot path) and validates instances with cross-file `$ref`s
//!   resolved against that same directory.
//! - [`convert`] — the upstream YAML→JSON preprocessor: converts a
//!   directory of YAML schema sources to JSON, rewriting `$ref` strings
//!   that point at YAML files so downstream JSON Schema tooling can
//!   resolve them.

pub mod catalog;
pub mod convert;
pub mod store;

pub use catalog::SchemaCatalog;
pub use convert::convert_dir;
pub use store::{SchemaError, SchemaStore, Violation, Violations};
