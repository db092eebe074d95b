//! # stsync-db
//!
//! libSQL-backed crosswalk store.
//!
//! A single table maps `(kind, source_id)` to the identifier the record was
//! given in the integration tenant. It is both the idempotency guard for
//! creation and the translation index for foreign keys.
//!
//! Uses the `libsql` crate in local-only mode (a plain `SQLite` file).

pub mod crosswalk;
pub mod error;
mod helpers;
mod migrations;

pub use crosswalk::InsertOutcome;
pub use error::DatabaseError;

use libsql::Builder;

/// Handle to the crosswalk database.
pub struct CrosswalkDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl CrosswalkDb {
    /// Open (creating if needed) a local database at the given path.
    ///
    /// Runs migrations automatically. Pass `":memory:"` for a throwaway store.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let crosswalk = Self { db, conn };
        crosswalk.run_migrations().await?;
        tracing::debug!(path, "crosswalk store opened");
        Ok(crosswalk)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
