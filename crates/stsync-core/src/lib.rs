//! # stsync-core
//!
//! Core types shared by every stsync crate:
//! - [`EntityKind`]: the symbolic kinds synchronized or referenced by the engine
//! - [`Environment`]: the production (source) and integration (target) sides
//! - [`CrosswalkEntry`] and [`EntityDescriptor`]: the persisted identity mapping
//!   and the per-kind listing/creation description
//! - Typed target payloads (`ItemCreate`, `PoCreate`, `JobCreate`)
//! - Run outcome and summary types
//! - Cross-cutting error types

pub mod entities;
pub mod environment;
pub mod errors;
pub mod kinds;
pub mod payloads;
pub mod summary;

pub use entities::{CrosswalkEntry, EntityDescriptor};
pub use environment::Environment;
pub use errors::CoreError;
pub use kinds::EntityKind;
pub use summary::{RecordOutcome, SkipReason, SyncSummary};
