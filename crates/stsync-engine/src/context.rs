use std::collections::HashMap;
use std::time::Duration;

use stsync_core::{EntityDescriptor, EntityKind};
use stsync_db::CrosswalkDb;
use tokio::sync::OnceCell;

use crate::mapper::EntityMapper;

/// Per-run switches for one `sync <kind>` invocation.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Passed to the listing endpoint's since-filter, when it has one.
    pub since: Option<String>,
    /// Maximum records to list; 0 means unlimited.
    pub limit: u64,
    /// Map and report without creating anything or touching the crosswalk.
    pub dry_run: bool,
    /// Pause after every creation call.
    pub record_delay: Duration,
}

/// Everything a run needs, constructed once by the caller and passed by reference.
pub struct SyncContext<T> {
    pub(crate) store: CrosswalkDb,
    pub(crate) transport: T,
    pub(crate) mapper: EntityMapper,
    /// Purchase-order type found on the target, looked up at most once.
    pub(crate) po_type: OnceCell<Option<String>>,
    descriptors: HashMap<EntityKind, EntityDescriptor>,
}

impl<T> SyncContext<T> {
    #[must_use]
    pub fn new(store: CrosswalkDb, transport: T, mapper: EntityMapper) -> Self {
        Self {
            store,
            transport,
            mapper,
            po_type: OnceCell::new(),
            descriptors: HashMap::new(),
        }
    }

    /// Register how to list and create one kind. Replaces any earlier descriptor.
    #[must_use]
    pub fn with_descriptor(mut self, descriptor: EntityDescriptor) -> Self {
        self.descriptors.insert(descriptor.kind, descriptor);
        self
    }

    #[must_use]
    pub fn descriptor(&self, kind: EntityKind) -> Option<&EntityDescriptor> {
        self.descriptors.get(&kind)
    }

    #[must_use]
    pub const fn store(&self) -> &CrosswalkDb {
        &self.store
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub const fn mapper(&self) -> &EntityMapper {
        &self.mapper
    }
}
