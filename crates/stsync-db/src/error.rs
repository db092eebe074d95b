//! Database error types for stsync-db.

use thiserror::Error;

/// Errors from crosswalk store operations.
///
/// Any of these aborts a sync run: without the store there is no
/// idempotency protection.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}
