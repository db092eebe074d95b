//! Entity descriptor file (`stsync.config.json`).
//!
//! ```json
//! {
//!   "entities": {
//!     "items": {
//!       "prod_list_path": "/pricebook/v2/tenant/{tenant}/materials",
//!       "int_create_path": "/pricebook/v2/tenant/{tenant}/materials",
//!       "list_params": { "page": 1, "pageSize": 0 },
//!       "list_data_key": "data",
//!       "next_page_key": "hasMore",
//!       "since_param": "modifiedOnOrAfter"
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Format, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stsync_core::{EntityDescriptor, EntityKind};

use crate::error::ConfigError;

fn default_data_key() -> String {
    "items".into()
}

fn default_next_page_key() -> Option<String> {
    Some("hasMore".into())
}

/// One entry of the `entities` map, as written in the file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntityEntry {
    pub prod_list_path: String,
    #[serde(default)]
    pub int_create_path: Option<String>,
    #[serde(default)]
    pub list_params: BTreeMap<String, Value>,
    #[serde(default = "default_data_key")]
    pub list_data_key: String,
    #[serde(default = "default_next_page_key")]
    pub next_page_key: Option<String>,
    #[serde(default)]
    pub since_param: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct EntitiesFile {
    entities: BTreeMap<String, EntityEntry>,
}

/// Parsed entity file plus the values needed to resolve it into descriptors.
#[derive(Debug, Clone)]
pub struct EntitiesConfig {
    path: PathBuf,
    entries: BTreeMap<EntityKind, EntityEntry>,
}

/// Values substituted into entries when building descriptors.
#[derive(Debug, Clone)]
pub struct DescriptorContext<'a> {
    pub prod_tenant: &'a str,
    pub int_tenant: &'a str,
    pub page_size_default: u64,
}

impl EntitiesConfig {
    /// Load and validate the entity file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EntityFileMissing` if `path` does not exist,
    /// `ConfigError::Figment` if it is not valid JSON of the expected shape,
    /// and `ConfigError::InvalidValue` for an unknown kind key.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ConfigError::EntityFileMissing { path });
        }

        let file: EntitiesFile = Figment::from(Json::file(&path)).extract()?;

        let mut entries = BTreeMap::new();
        for (name, entry) in file.entities {
            let kind: EntityKind = name.parse().map_err(|_| ConfigError::InvalidValue {
                field: format!("entities.{name}"),
                reason: "unknown entity kind".into(),
            })?;
            entries.insert(kind, entry);
        }

        Ok(Self { path, entries })
    }

    /// Kinds with an entry, in `EntityKind` order.
    #[must_use]
    pub fn kinds(&self) -> Vec<EntityKind> {
        self.entries.keys().copied().collect()
    }

    #[must_use]
    pub fn entry(&self, kind: EntityKind) -> Option<&EntityEntry> {
        self.entries.get(&kind)
    }

    /// Build the immutable descriptor the engine runs with.
    ///
    /// `{tenant}` in the list path is the production tenant; in the create path
    /// it is the integration tenant. A `pageSize` of `0`, `null` or `""` becomes
    /// `page_size_default`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EntityNotConfigured` if the file has no entry for `kind`.
    pub fn descriptor(
        &self,
        kind: EntityKind,
        ctx: &DescriptorContext<'_>,
    ) -> Result<EntityDescriptor, ConfigError> {
        let entry = self
            .entry(kind)
            .ok_or_else(|| ConfigError::EntityNotConfigured {
                kind: kind.to_string(),
                path: self.path.clone(),
            })?;

        let mut list_params = entry.list_params.clone();
        if let Some(size) = list_params.get_mut("pageSize") {
            if is_unset(size) {
                *size = Value::from(ctx.page_size_default);
            }
        }

        Ok(EntityDescriptor {
            kind,
            list_path: resolve_tenant(&entry.prod_list_path, ctx.prod_tenant),
            create_path: entry
                .int_create_path
                .as_deref()
                .map(|p| resolve_tenant(p, ctx.int_tenant)),
            list_params,
            data_key: entry.list_data_key.clone(),
            more_pages_key: entry
                .next_page_key
                .clone()
                .unwrap_or_else(|| "hasMore".into()),
            since_param: entry.since_param.clone(),
        })
    }
}

fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Number(n) => n.as_u64() == Some(0),
        Value::String(s) => s.is_empty() || s == "0",
        _ => false,
    }
}

/// Replace the `{tenant}` placeholder in a path.
#[must_use]
pub fn resolve_tenant(path: &str, tenant: &str) -> String {
    path.replace("{tenant}", tenant)
}
