use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::kinds::EntityKind;

/// Identity mapping from a production record to its integration counterpart.
///
/// At most one entry exists per `(kind, source_id)`; `target_id` never changes
/// once written.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CrosswalkEntry {
    pub kind: EntityKind,
    pub source_id: String,
    pub target_id: String,
    pub created_at: DateTime<Utc>,
}

/// How to list one kind from the source API and create it in the target API.
///
/// Built from the entity configuration file with tenant placeholders already
/// substituted. Immutable for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    /// Source collection path, relative to the production API base.
    pub list_path: String,
    /// Target creation path, relative to the integration API base.
    pub create_path: Option<String>,
    /// Initial query parameters for the first list call (`page`, `pageSize`, ...).
    pub list_params: BTreeMap<String, serde_json::Value>,
    /// Field of the list response holding the page of records.
    pub data_key: String,
    /// Field of the list response signalling more pages.
    pub more_pages_key: String,
    /// Query parameter carrying the since-filter, if the endpoint supports one.
    pub since_param: Option<String>,
}

impl EntityDescriptor {
    /// Page size declared in the list parameters, if any.
    #[must_use]
    pub fn page_size(&self) -> Option<u64> {
        self.list_params.get("pageSize").and_then(value_as_u64)
    }

    /// Path of one source record: the collection path followed by its id.
    #[must_use]
    pub fn record_path(&self, source_id: &str) -> String {
        format!("{}/{source_id}", self.list_path.trim_end_matches('/'))
    }
}

fn value_as_u64(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
