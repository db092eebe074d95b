//! # stsync-engine
//!
//! Copies records of one kind from the production tenant into the integration
//! tenant, using the crosswalk store to stay idempotent across runs and to
//! translate foreign keys.
//!
//! - [`lister`]: lazy pagination over a source collection
//! - [`mapper`]: source document → create payload, with FK resolution
//! - [`SyncContext::sync_kind`]: the per-record state machine and summary
//!
//! Network access goes through the [`SyncTransport`] trait so the engine can
//! be driven by [`HttpTransport`] in production and by in-memory fakes in tests.

mod context;
pub mod error;
pub mod lister;
pub mod mapper;
mod orchestrator;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use context::{SyncContext, SyncOptions};
pub use error::{SyncError, SyncPhase};
pub use lister::{Lister, SyncCursor};
pub use mapper::{EntityMapper, MapOutcome, MapperDefaults};
pub use orchestrator::SyncObserver;
pub use transport::{HttpTransport, SyncTransport};
