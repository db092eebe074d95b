//! Cross-cutting error types for stsync.
//!
//! Domain-specific errors (`DatabaseError`, `TransportError`, `SyncError`) are
//! defined in their respective crates and converge in `stsync-cli`.

use thiserror::Error;

/// Errors that can be raised by any stsync crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A kind name did not match any known entity kind.
    #[error("Unknown entity kind: {0}")]
    UnknownKind(String),
}
