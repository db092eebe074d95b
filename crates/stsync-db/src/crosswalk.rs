//! Crosswalk repository: the only reads and writes of persisted state.

use chrono::{DateTime, Utc};
use stsync_core::{CrosswalkEntry, EntityKind};

use crate::CrosswalkDb;
use crate::error::DatabaseError;
use crate::helpers::{from_unix_seconds, to_unix_seconds};

/// Result of [`CrosswalkDb::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// An entry for `(kind, source_id)` was already present and was left untouched.
    AlreadyExists,
}

fn row_to_entry(row: &libsql::Row) -> Result<CrosswalkEntry, DatabaseError> {
    let kind = row.get::<String>(0)?;
    Ok(CrosswalkEntry {
        kind: kind
            .parse()
            .map_err(|_| DatabaseError::InvalidState(format!("unknown kind in crosswalk: {kind}")))?,
        source_id: row.get::<String>(1)?,
        target_id: row.get::<String>(2)?,
        created_at: from_unix_seconds(row.get::<f64>(3)?)?,
    })
}

impl CrosswalkDb {
    /// Target id for a source record, if it has been migrated.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn lookup(
        &self,
        kind: EntityKind,
        source_id: &str,
    ) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT target_id FROM crosswalk WHERE kind = ?1 AND source_id = ?2",
                libsql::params![kind.as_str(), source_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    /// Full entry for a source record.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the row is malformed.
    pub async fn get_entry(
        &self,
        kind: EntityKind,
        source_id: &str,
    ) -> Result<Option<CrosswalkEntry>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT kind, source_id, target_id, created_at
                 FROM crosswalk WHERE kind = ?1 AND source_id = ?2",
                libsql::params![kind.as_str(), source_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_entry(&row)?)),
            None => Ok(None),
        }
    }

    /// Record a mapping. Never overwrites: a second insert for the same
    /// `(kind, source_id)` is a no-op that reports `AlreadyExists`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the statement fails.
    pub async fn insert(
        &self,
        kind: EntityKind,
        source_id: &str,
        target_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<InsertOutcome, DatabaseError> {
        let changed = self
            .conn()
            .execute(
                "INSERT INTO crosswalk (kind, source_id, target_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (kind, source_id) DO NOTHING",
                libsql::params![kind.as_str(), source_id, target_id, to_unix_seconds(created_at)],
            )
            .await?;

        if changed == 0 {
            tracing::debug!(kind = %kind, source_id, "crosswalk entry already present");
            Ok(InsertOutcome::AlreadyExists)
        } else {
            tracing::debug!(kind = %kind, source_id, target_id, "crosswalk entry recorded");
            Ok(InsertOutcome::Inserted)
        }
    }

    /// Entries, optionally restricted to one kind, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn list(
        &self,
        kind: Option<EntityKind>,
        limit: u32,
    ) -> Result<Vec<CrosswalkEntry>, DatabaseError> {
        let mut rows = match kind {
            Some(kind) => {
                self.conn()
                    .query(
                        "SELECT kind, source_id, target_id, created_at FROM crosswalk
                         WHERE kind = ?1 ORDER BY created_at, source_id LIMIT ?2",
                        libsql::params![kind.as_str(), i64::from(limit)],
                    )
                    .await?
            }
            None => {
                self.conn()
                    .query(
                        "SELECT kind, source_id, target_id, created_at FROM crosswalk
                         ORDER BY kind, created_at, source_id LIMIT ?1",
                        libsql::params![i64::from(limit)],
                    )
                    .await?
            }
        };

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }

    /// Number of entries for a kind.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count(&self, kind: EntityKind) -> Result<u64, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT COUNT(*) FROM crosswalk WHERE kind = ?1",
                [kind.as_str()],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::InvalidState("COUNT returned no row".into()))?;
        u64::try_from(row.get::<i64>(0)?)
            .map_err(|e| DatabaseError::InvalidState(format!("negative count: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn test_db() -> CrosswalkDb {
        CrosswalkDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn lookup_absent_returns_none() {
        let db = test_db().await;
        assert_eq!(db.lookup(EntityKind::Items, "1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn insert_then_lookup() {
        let db = test_db().await;
        let outcome = db
            .insert(EntityKind::Items, "1", "901", Utc::now())
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);
        assert_eq!(
            db.lookup(EntityKind::Items, "1").await.unwrap().as_deref(),
            Some("901")
        );
    }

    #[tokio::test]
    async fn duplicate_insert_keeps_first_target() {
        let db = test_db().await;
        db.insert(EntityKind::Items, "1", "901", Utc::now())
            .await
            .unwrap();
        let outcome = db
            .insert(EntityKind::Items, "1", "999", Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome, InsertOutcome::AlreadyExists);
        assert_eq!(
            db.lookup(EntityKind::Items, "1").await.unwrap().as_deref(),
            Some("901")
        );
        assert_eq!(db.count(EntityKind::Items).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn kinds_are_separate_namespaces() {
        let db = test_db().await;
        db.insert(EntityKind::Items, "7", "100", Utc::now())
            .await
            .unwrap();
        db.insert(EntityKind::Vendors, "7", "200", Utc::now())
            .await
            .unwrap();

        assert_eq!(
            db.lookup(EntityKind::Vendors, "7").await.unwrap().as_deref(),
            Some("200")
        );
        assert_eq!(db.lookup(EntityKind::Jobs, "7").await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_filters_by_kind() {
        let db = test_db().await;
        let at = DateTime::from_timestamp(1_754_000_000, 0).unwrap();
        db.insert(EntityKind::Items, "1", "10", at).await.unwrap();
        db.insert(EntityKind::Items, "2", "20", at).await.unwrap();
        db.insert(EntityKind::Customers, "3", "30", at).await.unwrap();

        let items = db.list(Some(EntityKind::Items), 100).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source_id, "1");
        assert_eq!(items[0].created_at, at);

        let all = db.list(None, 100).await.unwrap();
        assert_eq!(all.len(), 3);

        let limited = db.list(None, 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn get_entry_round_trips_kind() {
        let db = test_db().await;
        db.insert(EntityKind::JobTypes, "5", "55", Utc::now())
            .await
            .unwrap();
        let entry = db
            .get_entry(EntityKind::JobTypes, "5")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.kind, EntityKind::JobTypes);
        assert_eq!(entry.target_id, "55");
    }
}
