//! Central schema registry for source documents and target payloads.

use std::collections::HashMap;

use schemars::schema_for;
use stsync_core::EntityKind;

use crate::error::SchemaError;
use crate::sources;

/// Central store of every JSON Schema stsync validates against or exports.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Insert a `schemars`-generated schema, converting it to a `serde_json::Value`.
/// Panics if `serde_json::to_value` fails (infallible for valid `schemars` output).
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty)).unwrap());
    };
}

impl SchemaRegistry {
    /// Build a registry containing the source, payload, and report schemas.
    ///
    /// # Panics
    ///
    /// Panics if `serde_json::to_value` fails on a `schemars`-generated schema,
    /// which does not happen for derived schemas.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // --- Source documents (3) ---
        schemas.insert("item_source", sources::item_source());
        schemas.insert("po_source", sources::po_source());
        schemas.insert("job_source", sources::job_source());

        // --- Target payloads (3) ---
        register!(schemas, "item_create", stsync_core::payloads::ItemCreate);
        register!(schemas, "po_create", stsync_core::payloads::PoCreate);
        register!(schemas, "job_create", stsync_core::payloads::JobCreate);

        // --- Persisted state and reports (2) ---
        register!(schemas, "crosswalk_entry", stsync_core::CrosswalkEntry);
        register!(schemas, "sync_summary", stsync_core::SyncSummary);

        Self { schemas }
    }

    /// Name of the source-document schema for a kind, if the kind is syncable.
    #[must_use]
    pub const fn source_schema_name(kind: EntityKind) -> Option<&'static str> {
        match kind {
            EntityKind::Items => Some("item_source"),
            EntityKind::Pos => Some("po_source"),
            EntityKind::Jobs => Some("job_source"),
            _ => None,
        }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Compilation(format!("{e}")))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// Validate a source document of the given kind.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` for kinds without a source schema, or
    /// `SchemaError::ValidationFailed` if the document does not conform.
    pub fn validate_source(
        &self,
        kind: EntityKind,
        instance: &serde_json::Value,
    ) -> Result<(), SchemaError> {
        let name = Self::source_schema_name(kind)
            .ok_or_else(|| SchemaError::NotFound(format!("{kind} source")))?;
        self.validate(name, instance)
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
