//! Per-kind sync run.
//!
//! Every listed record walks the same path:
//!
//! ```text
//! LIST → CHECK_MAPPED → RESOLVE_FKS → MAP → CREATE → RECORD
//!             │                        │       │
//!             └── skip (mapped)        │       └── failed (record-level)
//!                                      ├── skip (missing dep / invalid)
//!                                      └── failed (target lacks a required id)
//! ```
//!
//! Dry runs stop after MAP. A record is only ever created after a crosswalk
//! miss, and its entry is written before the next record is looked at.
//! [`SyncContext::copy_record`] runs one record, fetched by id, down the same path.

use chrono::Utc;
use serde_json::Value;
use stsync_core::{EntityDescriptor, EntityKind, RecordOutcome, SkipReason, SyncSummary};
use stsync_db::InsertOutcome;

use crate::context::{SyncContext, SyncOptions};
use crate::error::{SyncError, SyncPhase};
use crate::lister::Lister;
use crate::mapper::{MapOutcome, PO_TYPES_PATH, ResolvedKeys, pick_po_type, record_id};
use crate::transport::SyncTransport;

/// Receives each record outcome as it happens. Used for progress display.
pub trait SyncObserver {
    fn on_record(&mut self, kind: EntityKind, outcome: &RecordOutcome) {
        let _ = (kind, outcome);
    }
}

impl SyncObserver for () {}

impl<T: SyncTransport> SyncContext<T> {
    /// Synchronize one kind from production to integration.
    ///
    /// Record-level problems are counted in the summary; only listing failures,
    /// store failures, and authorization failures while creating abort the run.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` naming the phase that failed.
    pub async fn sync_kind(
        &self,
        kind: EntityKind,
        options: &SyncOptions,
        observer: &mut impl SyncObserver,
    ) -> Result<SyncSummary, SyncError> {
        let (descriptor, create_path) = self.plan(kind, options.dry_run)?;
        self.warn_unseeded_dependencies(kind).await?;

        tracing::info!(
            kind = %kind,
            dry_run = options.dry_run,
            limit = options.limit,
            since = options.since.as_deref().unwrap_or("-"),
            "sync started"
        );

        let mut summary = SyncSummary::new(kind, options.dry_run);
        let mut lister = Lister::new(
            &self.transport,
            descriptor,
            options.since.as_deref(),
            options.limit,
        );

        while let Some(record) = lister.next_record().await? {
            let outcome = self
                .process_record(descriptor, create_path, &record, options)
                .await?;
            log_outcome(kind, &outcome);
            summary.record(&outcome);
            observer.on_record(kind, &outcome);
        }

        tracing::info!(
            kind = %kind,
            listed = summary.listed,
            created = summary.created,
            would_create = summary.would_create,
            skipped = summary.skipped(),
            failed = summary.failed,
            pages = lister.cursor().pages_fetched(),
            "sync finished"
        );
        Ok(summary)
    }

    /// Copy a single source record, fetched by id, through the same
    /// check, map, create and record steps as [`Self::sync_kind`].
    ///
    /// # Errors
    ///
    /// Fetching failures abort with [`SyncPhase::Fetching`]; the rest as for
    /// `sync_kind`.
    pub async fn copy_record(
        &self,
        kind: EntityKind,
        source_id: &str,
        options: &SyncOptions,
        observer: &mut impl SyncObserver,
    ) -> Result<RecordOutcome, SyncError> {
        let (descriptor, create_path) = self.plan(kind, options.dry_run)?;
        let path = descriptor.record_path(source_id);
        tracing::info!(
            kind = %kind,
            source_id,
            path = %path,
            dry_run = options.dry_run,
            "copying one record"
        );

        let record = self
            .transport
            .fetch_record(&path)
            .await
            .map_err(|source| SyncError::Transport {
                kind,
                phase: SyncPhase::Fetching,
                source,
            })?;

        let outcome = self
            .process_record(descriptor, create_path, &record, options)
            .await?;
        log_outcome(kind, &outcome);
        observer.on_record(kind, &outcome);
        Ok(outcome)
    }

    /// Descriptor and create path for a run, or the setup error that prevents it.
    fn plan(
        &self,
        kind: EntityKind,
        dry_run: bool,
    ) -> Result<(&EntityDescriptor, Option<&str>), SyncError> {
        if !kind.is_syncable() {
            return Err(SyncError::NotSyncable { kind });
        }
        let descriptor = self
            .descriptor(kind)
            .ok_or(SyncError::NotConfigured { kind })?;
        let create_path = match (&descriptor.create_path, dry_run) {
            (Some(path), _) => Some(path.as_str()),
            (None, true) => None,
            (None, false) => return Err(SyncError::NotCreatable { kind }),
        };
        Ok((descriptor, create_path))
    }

    /// Warn about dependency kinds with no crosswalk entries at all: every
    /// record referencing them will be skipped or sent unmapped.
    async fn warn_unseeded_dependencies(&self, kind: EntityKind) -> Result<(), SyncError> {
        for dependency in kind.dependencies() {
            let entries = self
                .store
                .count(*dependency)
                .await
                .map_err(SyncError::store(kind, SyncPhase::Setup))?;
            if entries == 0 {
                tracing::warn!(
                    kind = %kind,
                    dependency = %dependency,
                    "dependency kind has no crosswalk entries yet"
                );
            }
        }
        Ok(())
    }

    async fn process_record(
        &self,
        descriptor: &EntityDescriptor,
        create_path: Option<&str>,
        record: &Value,
        options: &SyncOptions,
    ) -> Result<RecordOutcome, SyncError> {
        let kind = descriptor.kind;
        let Some(source_id) = record_id(record) else {
            return Ok(RecordOutcome::Skipped {
                source_id: None,
                reason: SkipReason::Invalid {
                    detail: "record has no id, guid or externalId".into(),
                },
            });
        };

        if let Some(target_id) = self
            .store
            .lookup(kind, &source_id)
            .await
            .map_err(SyncError::store(kind, SyncPhase::CheckMapped))?
        {
            return Ok(RecordOutcome::Skipped {
                source_id: Some(source_id),
                reason: SkipReason::AlreadyMapped { target_id },
            });
        }

        let mut resolved = self.resolve_foreign_keys(kind, record).await?;
        if kind == EntityKind::Pos && self.mapper.defaults().po_type_id.is_none() {
            resolved.set_po_type_id(self.po_type_id(kind).await?);
        }
        let payload = match self.mapper.map(kind, record, &resolved) {
            MapOutcome::Create(payload) => payload,
            MapOutcome::Skip(reason) => {
                return Ok(RecordOutcome::Skipped {
                    source_id: Some(source_id),
                    reason,
                });
            }
            MapOutcome::Fail(error) => return Ok(RecordOutcome::Failed { source_id, error }),
        };

        let Some(create_path) = create_path.filter(|_| !options.dry_run) else {
            return Ok(RecordOutcome::WouldCreate { source_id, payload });
        };

        let created = self.transport.create(create_path, &payload).await;
        if !options.record_delay.is_zero() {
            tokio::time::sleep(options.record_delay).await;
        }

        let body = match created {
            Ok(body) => body,
            Err(source) if source.is_unauthorized() => {
                return Err(SyncError::Transport {
                    kind,
                    phase: SyncPhase::Creating,
                    source,
                });
            }
            Err(e) => {
                return Ok(RecordOutcome::Failed {
                    source_id,
                    error: e.to_string(),
                });
            }
        };

        let Some(target_id) = record_id(&body) else {
            return Ok(RecordOutcome::Failed {
                source_id,
                error: "create response carried no id".into(),
            });
        };

        let inserted = self
            .store
            .insert(kind, &source_id, &target_id, Utc::now())
            .await
            .map_err(SyncError::store(kind, SyncPhase::Recording))?;
        if inserted == InsertOutcome::AlreadyExists {
            tracing::warn!(
                kind = %kind,
                source_id,
                target_id,
                "crosswalk entry appeared during creation; kept the existing mapping"
            );
        }

        Ok(RecordOutcome::Created {
            source_id,
            target_id,
        })
    }

    async fn resolve_foreign_keys(
        &self,
        kind: EntityKind,
        record: &Value,
    ) -> Result<ResolvedKeys, SyncError> {
        let mut resolved = ResolvedKeys::default();
        for fk in self.mapper.foreign_keys(kind, record) {
            if resolved.get(fk.kind, &fk.source_id).is_some() {
                continue;
            }
            let hit = self
                .store
                .lookup(fk.kind, &fk.source_id)
                .await
                .map_err(SyncError::store(kind, SyncPhase::Mapping))?;
            if let Some(target_id) = hit {
                resolved.insert(fk.kind, &fk.source_id, target_id);
            }
        }
        Ok(resolved)
    }

    /// Purchase-order type from the target's type list, fetched once per context.
    ///
    /// A failed lookup is remembered as "none", which fails each PO; only a
    /// rejected token aborts.
    async fn po_type_id(&self, kind: EntityKind) -> Result<Option<String>, SyncError> {
        let found = self
            .po_type
            .get_or_try_init(|| async {
                let query = [
                    ("page".to_string(), "1".to_string()),
                    ("pageSize".to_string(), "200".to_string()),
                ];
                match self.transport.fetch_target(PO_TYPES_PATH, &query).await {
                    Ok(body) => {
                        let id = pick_po_type(&body);
                        tracing::info!(
                            po_type_id = id.as_deref().unwrap_or("-"),
                            "purchase-order type lookup"
                        );
                        Ok(id)
                    }
                    Err(source) if source.is_unauthorized() => Err(SyncError::Transport {
                        kind,
                        phase: SyncPhase::Mapping,
                        source,
                    }),
                    Err(error) => {
                        tracing::warn!(%error, "purchase-order type lookup failed");
                        Ok(None)
                    }
                }
            })
            .await?;
        Ok(found.clone())
    }
}

fn log_outcome(kind: EntityKind, outcome: &RecordOutcome) {
    match outcome {
        RecordOutcome::Created {
            source_id,
            target_id,
        } => tracing::info!(kind = %kind, source_id, target_id, "created"),
        RecordOutcome::WouldCreate { source_id, .. } => {
            tracing::info!(kind = %kind, source_id, "would create");
        }
        RecordOutcome::Skipped { source_id, reason } => tracing::debug!(
            kind = %kind,
            source_id = source_id.as_deref().unwrap_or("-"),
            %reason,
            "skipped"
        ),
        RecordOutcome::Failed { source_id, error } => {
            tracing::warn!(kind = %kind, source_id, error, "create failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use stsync_core::RecordOutcome;
    use stsync_db::CrosswalkDb;

    use super::*;
    use crate::mapper::{EntityMapper, MapperDefaults};
    use crate::test_support::{CreateReply, FakeTransport, descriptor, numbered};

    async fn context_with(
        transport: FakeTransport,
        kind: EntityKind,
        page_size: u64,
        defaults: MapperDefaults,
    ) -> SyncContext<FakeTransport> {
        let store = CrosswalkDb::open_local(":memory:").await.unwrap();
        SyncContext::new(store, transport, EntityMapper::new(defaults))
            .with_descriptor(descriptor(kind, page_size))
    }

    async fn context(transport: FakeTransport, kind: EntityKind, page_size: u64) -> SyncContext<FakeTransport> {
        context_with(transport, kind, page_size, MapperDefaults::default()).await
    }

    fn po_defaults() -> MapperDefaults {
        MapperDefaults {
            warehouse_id: Some("30".into()),
            business_unit_id: None,
            po_type_id: Some("2".into()),
        }
    }

    fn options(limit: u64, dry_run: bool) -> SyncOptions {
        SyncOptions {
            since: None,
            limit,
            dry_run,
            record_delay: Duration::ZERO,
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<RecordOutcome>);

    impl SyncObserver for Recorder {
        fn on_record(&mut self, _kind: EntityKind, outcome: &RecordOutcome) {
            self.0.push(outcome.clone());
        }
    }

    fn five_items() -> FakeTransport {
        FakeTransport::with_pages(vec![
            json!({"data": numbered(1..=3), "hasMore": true}),
            json!({"data": numbered(4..=5), "hasMore": false}),
        ])
    }

    #[tokio::test]
    async fn limit_bounds_creates_and_page_calls() {
        let ctx = context(five_items(), EntityKind::Items, 3).await;

        let summary = ctx
            .sync_kind(EntityKind::Items, &options(4, false), &mut ())
            .await
            .unwrap();

        assert_eq!(summary.listed, 4);
        assert_eq!(summary.created, 4);
        let codes: Vec<_> = ctx
            .transport()
            .creates()
            .iter()
            .map(|(_, payload)| payload["code"].clone())
            .collect();
        assert_eq!(codes, vec![json!("C1"), json!("C2"), json!("C3"), json!("C4")]);
        assert_eq!(ctx.transport().page_calls(), 2);
        assert_eq!(ctx.store().count(EntityKind::Items).await.unwrap(), 4);
        assert_eq!(
            ctx.store().lookup(EntityKind::Items, "5").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn second_run_creates_nothing() {
        let ctx = context(five_items().repeating(), EntityKind::Items, 3).await;

        let first = ctx
            .sync_kind(EntityKind::Items, &options(0, false), &mut ())
            .await
            .unwrap();
        let second = ctx
            .sync_kind(EntityKind::Items, &options(0, false), &mut ())
            .await
            .unwrap();

        assert_eq!(first.created, 5);
        assert_eq!(second.created, 0);
        assert_eq!(second.skipped_existing, 5);
        assert_eq!(ctx.transport().creates().len(), 5);
        assert_eq!(ctx.store().count(EntityKind::Items).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn created_payload_carries_external_number() {
        let ctx = context(five_items(), EntityKind::Items, 3).await;
        ctx.sync_kind(EntityKind::Items, &options(1, false), &mut ())
            .await
            .unwrap();

        let (path, payload) = ctx.transport().creates().remove(0);
        assert_eq!(path, "/target/items");
        assert_eq!(payload["code"], json!("C1"));
        assert_eq!(payload["name"], json!("Item 1"));
        assert_eq!(
            ctx.store().lookup(EntityKind::Items, "1").await.unwrap(),
            Some("1001".to_string())
        );
    }

    #[tokio::test]
    async fn dry_run_touches_neither_target_nor_store() {
        let ctx = context(five_items(), EntityKind::Items, 3).await;
        let mut recorder = Recorder::default();

        let summary = ctx
            .sync_kind(EntityKind::Items, &options(0, true), &mut recorder)
            .await
            .unwrap();

        assert!(summary.dry_run);
        assert_eq!(summary.would_create, 5);
        assert_eq!(summary.created, 0);
        assert!(ctx.transport().creates().is_empty());
        assert_eq!(ctx.store().count(EntityKind::Items).await.unwrap(), 0);
        assert!(matches!(
            recorder.0.first(),
            Some(RecordOutcome::WouldCreate { .. })
        ));
    }

    #[tokio::test]
    async fn dry_run_needs_no_create_path() {
        let store = CrosswalkDb::open_local(":memory:").await.unwrap();
        let mut desc = descriptor(EntityKind::Items, 3);
        desc.create_path = None;
        let ctx = SyncContext::new(store, five_items(), EntityMapper::new(MapperDefaults::default()))
            .with_descriptor(desc);

        let summary = ctx
            .sync_kind(EntityKind::Items, &options(0, true), &mut ())
            .await
            .unwrap();
        assert_eq!(summary.would_create, 5);

        let err = ctx
            .sync_kind(EntityKind::Items, &options(0, false), &mut ())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::NotCreatable { .. }));
        assert_eq!(err.phase(), SyncPhase::Setup);
    }

    fn po_record(id: u64, item_ref: &str) -> Value {
        json!({
            "id": id,
            "vendorId": 5,
            "items": [{"itemId": item_ref, "quantity": "2.5", "unitCost": 3.5}]
        })
    }

    fn one_po(item_ref: &str) -> FakeTransport {
        FakeTransport::with_pages(vec![json!({
            "data": [po_record(77, item_ref)],
            "hasMore": false
        })])
    }

    async fn seed_item(ctx: &SyncContext<FakeTransport>, source_id: &str, target_id: &str) {
        ctx.store()
            .insert(EntityKind::Items, source_id, target_id, Utc::now())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn po_item_uses_mapped_sku_target() {
        let ctx = context_with(one_po("X"), EntityKind::Pos, 50, po_defaults()).await;
        seed_item(&ctx, "X", "9001").await;

        let summary = ctx
            .sync_kind(EntityKind::Pos, &options(0, false), &mut ())
            .await
            .unwrap();

        assert_eq!(summary.created, 1);
        let (_, payload) = ctx.transport().creates().remove(0);
        assert_eq!(payload["items"][0]["skuId"], json!(9001));
        assert_eq!(payload["items"][0]["quantityOrdered"], json!(2.5));
        assert_eq!(payload["vendorId"], json!(5));
        assert_eq!(payload["typeId"], json!(2));
        assert_eq!(payload["inventoryLocationId"], json!(30));
        assert_eq!(payload["shipTo"]["inventoryLocationId"], json!(30));
        assert_eq!(payload["externalNumber"], json!("PROD-77"));
        assert!(ctx.transport().target_calls().is_empty());
    }

    #[tokio::test]
    async fn po_without_warehouse_fails_and_is_not_recorded() {
        let defaults = MapperDefaults {
            warehouse_id: None,
            ..po_defaults()
        };
        let ctx = context_with(one_po("X"), EntityKind::Pos, 50, defaults).await;
        seed_item(&ctx, "X", "9001").await;

        let summary = ctx
            .sync_kind(EntityKind::Pos, &options(0, false), &mut ())
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert!(ctx.transport().creates().is_empty());
        assert_eq!(ctx.store().count(EntityKind::Pos).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn po_type_is_looked_up_once_when_not_configured() {
        let transport = FakeTransport::with_pages(vec![json!({
            "data": [po_record(77, "X"), po_record(78, "X")],
            "hasMore": false
        })])
        .with_target(
            PO_TYPES_PATH,
            json!({"data": [{"id": 4, "name": "Drop Ship"}, {"id": 6, "name": "Stock"}]}),
        );
        let defaults = MapperDefaults {
            po_type_id: None,
            ..po_defaults()
        };
        let ctx = context_with(transport, EntityKind::Pos, 50, defaults).await;
        seed_item(&ctx, "X", "9001").await;

        let summary = ctx
            .sync_kind(EntityKind::Pos, &options(0, false), &mut ())
            .await
            .unwrap();

        assert_eq!(summary.created, 2);
        assert_eq!(ctx.transport().target_calls(), vec![PO_TYPES_PATH.to_string()]);
        let types: Vec<_> = ctx
            .transport()
            .creates()
            .iter()
            .map(|(_, payload)| payload["typeId"].clone())
            .collect();
        assert_eq!(types, vec![json!(6), json!(6)]);
    }

    #[tokio::test]
    async fn failed_po_type_lookup_fails_each_po() {
        let defaults = MapperDefaults {
            po_type_id: None,
            ..po_defaults()
        };
        let ctx = context_with(one_po("X"), EntityKind::Pos, 50, defaults).await;
        seed_item(&ctx, "X", "9001").await;

        let summary = ctx
            .sync_kind(EntityKind::Pos, &options(0, false), &mut ())
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert!(ctx.transport().creates().is_empty());
    }

    #[tokio::test]
    async fn po_with_unmapped_item_is_skipped() {
        let ctx = context_with(one_po("X"), EntityKind::Pos, 50, po_defaults()).await;

        let summary = ctx
            .sync_kind(EntityKind::Pos, &options(0, false), &mut ())
            .await
            .unwrap();

        assert_eq!(summary.skipped_missing_dependency, 1);
        assert!(ctx.transport().creates().is_empty());
        assert_eq!(ctx.store().count(EntityKind::Pos).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn job_with_unmapped_location_is_skipped() {
        let transport = FakeTransport::with_pages(vec![json!({
            "data": [{"id": 31, "customerId": 1, "locationId": 2, "jobTypeId": 3}],
            "hasMore": false
        })]);
        let ctx = context(transport, EntityKind::Jobs, 50).await;
        for (kind, source, target) in [
            (EntityKind::Customers, "1", "101"),
            (EntityKind::JobTypes, "3", "103"),
        ] {
            ctx.store().insert(kind, source, target, Utc::now()).await.unwrap();
        }
        let mut recorder = Recorder::default();

        let summary = ctx
            .sync_kind(EntityKind::Jobs, &options(0, false), &mut recorder)
            .await
            .unwrap();

        assert_eq!(summary.skipped_missing_dependency, 1);
        assert!(ctx.transport().creates().is_empty());
        assert_eq!(ctx.store().count(EntityKind::Jobs).await.unwrap(), 0);
        assert_eq!(
            recorder.0,
            vec![RecordOutcome::Skipped {
                source_id: Some("31".into()),
                reason: SkipReason::MissingDependency {
                    kind: EntityKind::Locations,
                    source_id: "2".into(),
                },
            }]
        );
    }

    #[tokio::test]
    async fn copy_record_creates_then_is_idempotent() {
        let transport = FakeTransport::default().with_record("/source/pos/77", po_record(77, "X"));
        let ctx = context_with(transport, EntityKind::Pos, 50, po_defaults()).await;
        seed_item(&ctx, "X", "9001").await;

        let first = ctx
            .copy_record(EntityKind::Pos, "77", &options(0, false), &mut ())
            .await
            .unwrap();
        assert_eq!(
            first,
            RecordOutcome::Created {
                source_id: "77".into(),
                target_id: "1001".into(),
            }
        );

        let second = ctx
            .copy_record(EntityKind::Pos, "77", &options(0, false), &mut ())
            .await
            .unwrap();
        assert!(matches!(
            second,
            RecordOutcome::Skipped {
                reason: SkipReason::AlreadyMapped { .. },
                ..
            }
        ));
        assert_eq!(ctx.transport().creates().len(), 1);
        assert_eq!(ctx.transport().page_calls(), 0);
    }

    #[tokio::test]
    async fn copy_record_dry_run_only_maps() {
        let transport = FakeTransport::default().with_record("/source/pos/77", po_record(77, "X"));
        let ctx = context_with(transport, EntityKind::Pos, 50, po_defaults()).await;
        seed_item(&ctx, "X", "9001").await;

        let outcome = ctx
            .copy_record(EntityKind::Pos, "77", &options(0, true), &mut ())
            .await
            .unwrap();

        assert!(matches!(outcome, RecordOutcome::WouldCreate { .. }));
        assert!(ctx.transport().creates().is_empty());
        assert_eq!(ctx.store().count(EntityKind::Pos).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn copy_record_of_unknown_id_aborts_in_fetching() {
        let ctx = context_with(FakeTransport::default(), EntityKind::Pos, 50, po_defaults()).await;

        let err = ctx
            .copy_record(EntityKind::Pos, "404", &options(0, false), &mut ())
            .await
            .unwrap_err();
        assert_eq!(err.phase(), SyncPhase::Fetching);
    }

    #[tokio::test]
    async fn rejected_create_is_counted_and_run_continues() {
        let transport = five_items().with_create_reply(2, CreateReply::Status(400));
        let ctx = context(transport, EntityKind::Items, 3).await;

        let summary = ctx
            .sync_kind(EntityKind::Items, &options(0, false), &mut ())
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.created, 4);
        assert_eq!(ctx.store().lookup(EntityKind::Items, "2").await.unwrap(), None);
        assert_eq!(ctx.store().count(EntityKind::Items).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn unauthorized_create_aborts_the_run() {
        let transport = five_items().with_create_reply(2, CreateReply::Status(401));
        let ctx = context(transport, EntityKind::Items, 3).await;

        let err = ctx
            .sync_kind(EntityKind::Items, &options(0, false), &mut ())
            .await
            .unwrap_err();

        assert_eq!(err.phase(), SyncPhase::Creating);
        assert_eq!(ctx.transport().creates().len(), 2);
        assert_eq!(ctx.store().count(EntityKind::Items).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn listing_failure_aborts_in_listing() {
        let ctx = context(FakeTransport::with_pages(vec![]).failing_list(), EntityKind::Items, 3).await;

        let err = ctx
            .sync_kind(EntityKind::Items, &options(0, false), &mut ())
            .await
            .unwrap_err();
        assert_eq!(err.phase(), SyncPhase::Listing);
    }

    #[tokio::test]
    async fn response_without_id_is_a_failure() {
        let transport = five_items().with_create_reply(1, CreateReply::NoId);
        let ctx = context(transport, EntityKind::Items, 3).await;

        let summary = ctx
            .sync_kind(EntityKind::Items, &options(1, false), &mut ())
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(ctx.store().count(EntityKind::Items).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn record_without_identifier_is_invalid() {
        let transport = FakeTransport::with_pages(vec![json!({
            "data": [{"name": "anonymous"}, {"id": 2, "name": "Two"}],
            "hasMore": false
        })]);
        let ctx = context(transport, EntityKind::Items, 50).await;

        let summary = ctx
            .sync_kind(EntityKind::Items, &options(0, false), &mut ())
            .await
            .unwrap();

        assert_eq!(summary.listed, 2);
        assert_eq!(summary.skipped_invalid, 1);
        assert_eq!(summary.created, 1);
    }

    #[tokio::test]
    async fn reference_kinds_are_rejected_up_front() {
        let ctx = context(five_items(), EntityKind::Items, 3).await;
        let err = ctx
            .sync_kind(EntityKind::Vendors, &options(0, false), &mut ())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::NotSyncable { .. }));
        assert_eq!(ctx.transport().page_calls(), 0);
    }

    #[tokio::test]
    async fn missing_descriptor_is_not_configured() {
        let ctx = context(five_items(), EntityKind::Items, 3).await;
        let err = ctx
            .sync_kind(EntityKind::Jobs, &options(0, false), &mut ())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::NotConfigured { .. }));
    }

    #[tokio::test]
    async fn observer_sees_every_listed_record() {
        let ctx = context(five_items(), EntityKind::Items, 3).await;
        let mut recorder = Recorder::default();

        let summary = ctx
            .sync_kind(EntityKind::Items, &options(0, false), &mut recorder)
            .await
            .unwrap();
        assert_eq!(recorder.0.len() as u64, summary.listed);
    }
}
