//! # stsync-schema
//!
//! JSON Schema registry for stsync.
//!
//! - Source-record schemas describe the minimum shape the mapper needs from a
//!   production document of each kind. They are hand-written because source
//!   documents stay untyped field bags.
//! - Payload schemas are generated from the typed create structs in
//!   `stsync-core` with [`schemars::schema_for!`] and exported by the
//!   `stsync schema` command.

mod error;
mod registry;
mod sources;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
