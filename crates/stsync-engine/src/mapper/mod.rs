//! Entity mapper: source document + resolved foreign keys → create payload.
//!
//! Mapping is split in two pure steps around the crosswalk lookups:
//!
//! 1. [`EntityMapper::foreign_keys`] lists the references a record carries,
//!    each with the crosswalk kind it resolves through and a [`FkPolicy`].
//! 2. The orchestrator looks those up and passes the hits as [`ResolvedKeys`]
//!    to [`EntityMapper::map`], which validates the record, enforces required
//!    references, and builds the kind-specific payload.
//!
//! Neither step touches the network or the store.

mod fields;
mod items;
mod jobs;
mod pos;

use std::collections::HashMap;

use serde_json::Value;
use stsync_core::payloads::id_value;
use stsync_core::{EntityKind, SkipReason};
use stsync_schema::{SchemaError, SchemaRegistry};

pub use fields::record_id;
pub use pos::PO_TYPES_PATH;
pub(crate) use pos::pick_po_type;

/// How an unresolved reference is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FkPolicy {
    /// The record is skipped with a missing-dependency reason.
    Required,
    /// The field is left out of the payload (or filled from a configured default).
    Optional,
    /// The source value is sent unchanged.
    Passthrough,
}

/// One foreign-key reference found in a source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub kind: EntityKind,
    pub source_id: String,
    pub policy: FkPolicy,
}

impl ForeignKey {
    fn new(kind: EntityKind, source_id: String, policy: FkPolicy) -> Self {
        Self {
            kind,
            source_id,
            policy,
        }
    }
}

/// Crosswalk hits for a record's foreign keys, plus the purchase-order type
/// looked up on the target when none is configured.
#[derive(Debug, Clone, Default)]
pub struct ResolvedKeys {
    targets: HashMap<(EntityKind, String), String>,
    po_type_id: Option<String>,
}

impl ResolvedKeys {
    pub fn set_po_type_id(&mut self, id: Option<String>) {
        self.po_type_id = id;
    }

    #[must_use]
    pub fn po_type_id(&self) -> Option<&str> {
        self.po_type_id.as_deref()
    }

    pub fn insert(&mut self, kind: EntityKind, source_id: &str, target_id: String) {
        self.targets.insert((kind, source_id.to_string()), target_id);
    }

    #[must_use]
    pub fn get(&self, kind: EntityKind, source_id: &str) -> Option<&str> {
        self.targets
            .get(&(kind, source_id.to_string()))
            .map(String::as_str)
    }

    /// Payload value for a reference: the target id when resolved; the source
    /// id for unresolved passthrough references; `None` otherwise.
    fn value_for(&self, kind: EntityKind, source_id: &str, policy: FkPolicy) -> Option<Value> {
        match (self.get(kind, source_id), policy) {
            (Some(target), _) => Some(id_value(target)),
            (None, FkPolicy::Passthrough) => Some(id_value(source_id)),
            (None, _) => None,
        }
    }
}

/// Result of mapping one record.
#[derive(Debug, Clone, PartialEq)]
pub enum MapOutcome {
    Create(Value),
    Skip(SkipReason),
    /// The record is usable but the target lacks something the payload
    /// requires; counted as a failed record.
    Fail(String),
}

#[derive(Debug)]
pub(crate) enum Rejection {
    Skip(SkipReason),
    Fail(String),
}

impl From<SkipReason> for Rejection {
    fn from(reason: SkipReason) -> Self {
        Self::Skip(reason)
    }
}

/// Target-side fallbacks used when a purchase order lacks a mapped reference.
#[derive(Debug, Clone, Default)]
pub struct MapperDefaults {
    pub warehouse_id: Option<String>,
    pub business_unit_id: Option<String>,
    pub po_type_id: Option<String>,
}

pub struct EntityMapper {
    schemas: SchemaRegistry,
    defaults: MapperDefaults,
}

impl EntityMapper {
    #[must_use]
    pub fn new(defaults: MapperDefaults) -> Self {
        Self {
            schemas: SchemaRegistry::new(),
            defaults,
        }
    }

    #[must_use]
    pub const fn defaults(&self) -> &MapperDefaults {
        &self.defaults
    }

    /// Check a source document against its kind's schema.
    ///
    /// # Errors
    ///
    /// Returns `SkipReason::Invalid` describing every violation.
    pub fn validate(&self, kind: EntityKind, record: &Value) -> Result<(), SkipReason> {
        match self.schemas.validate_source(kind, record) {
            Ok(()) => Ok(()),
            Err(SchemaError::ValidationFailed { errors }) => Err(SkipReason::Invalid {
                detail: errors.join("; "),
            }),
            Err(e) => Err(SkipReason::Invalid {
                detail: e.to_string(),
            }),
        }
    }

    /// References the record carries, in payload order.
    #[must_use]
    pub fn foreign_keys(&self, kind: EntityKind, record: &Value) -> Vec<ForeignKey> {
        match kind {
            EntityKind::Pos => pos::foreign_keys(record),
            EntityKind::Jobs => jobs::foreign_keys(record),
            _ => Vec::new(),
        }
    }

    /// Build the create payload, or decide to skip.
    #[must_use]
    pub fn map(&self, kind: EntityKind, record: &Value, resolved: &ResolvedKeys) -> MapOutcome {
        match self.try_map(kind, record, resolved) {
            Ok(payload) => MapOutcome::Create(payload),
            Err(Rejection::Skip(reason)) => MapOutcome::Skip(reason),
            Err(Rejection::Fail(detail)) => MapOutcome::Fail(detail),
        }
    }

    fn try_map(
        &self,
        kind: EntityKind,
        record: &Value,
        resolved: &ResolvedKeys,
    ) -> Result<Value, Rejection> {
        self.validate(kind, record)?;
        let source_id = record_id(record).ok_or_else(|| SkipReason::Invalid {
            detail: "record has no id, guid or externalId".into(),
        })?;

        let unresolved = self.foreign_keys(kind, record).into_iter().find(|fk| {
            fk.policy == FkPolicy::Required && resolved.get(fk.kind, &fk.source_id).is_none()
        });
        if let Some(missing) = unresolved {
            return Err(SkipReason::MissingDependency {
                kind: missing.kind,
                source_id: missing.source_id,
            }
            .into());
        }

        let payload = match kind {
            EntityKind::Items => to_value(&items::build(record, &source_id))?,
            EntityKind::Pos => to_value(&pos::build(record, &source_id, resolved, &self.defaults)?)?,
            EntityKind::Jobs => to_value(&jobs::build(record, &source_id, resolved)?)?,
            other => {
                return Err(SkipReason::Invalid {
                    detail: format!("{other} records cannot be created"),
                }
                .into());
            }
        };
        Ok(payload)
    }
}

fn to_value<T: serde::Serialize>(payload: &T) -> Result<Value, SkipReason> {
    serde_json::to_value(payload).map_err(|e| SkipReason::Invalid {
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn mapper() -> EntityMapper {
        EntityMapper::new(MapperDefaults::default())
    }

    #[test]
    fn invalid_record_is_skipped_not_raised() {
        let outcome = mapper().map(
            EntityKind::Jobs,
            &json!({"id": 1, "customerId": 2}),
            &ResolvedKeys::default(),
        );
        assert!(matches!(
            outcome,
            MapOutcome::Skip(SkipReason::Invalid { .. })
        ));
    }

    #[test]
    fn first_unmapped_required_reference_is_reported() {
        let mut resolved = ResolvedKeys::default();
        resolved.insert(EntityKind::Customers, "1", "101".into());
        let outcome = mapper().map(
            EntityKind::Jobs,
            &json!({"id": 9, "customerId": 1, "locationId": 2, "jobTypeId": 3}),
            &resolved,
        );
        assert_eq!(
            outcome,
            MapOutcome::Skip(SkipReason::MissingDependency {
                kind: EntityKind::Locations,
                source_id: "2".into(),
            })
        );
    }

    #[test]
    fn unconfigured_po_target_is_a_failure_not_a_skip() {
        let mut resolved = ResolvedKeys::default();
        resolved.insert(EntityKind::Items, "4", "40".into());
        let outcome = mapper().map(
            EntityKind::Pos,
            &json!({"id": 1, "vendorId": 7, "items": [{"itemId": 4, "qty": "3"}]}),
            &resolved,
        );
        assert!(matches!(outcome, MapOutcome::Fail(_)));
    }

    #[test]
    fn reference_kinds_are_not_creatable() {
        let outcome = mapper().map(
            EntityKind::Customers,
            &json!({"id": 1}),
            &ResolvedKeys::default(),
        );
        assert!(matches!(outcome, MapOutcome::Skip(SkipReason::Invalid { .. })));
    }

    #[test]
    fn resolved_value_prefers_target_then_passthrough() {
        let mut resolved = ResolvedKeys::default();
        resolved.insert(EntityKind::Vendors, "5", "500".into());

        assert_eq!(
            resolved.value_for(EntityKind::Vendors, "5", FkPolicy::Passthrough),
            Some(json!(500))
        );
        assert_eq!(
            resolved.value_for(EntityKind::Vendors, "6", FkPolicy::Passthrough),
            Some(json!(6))
        );
        assert_eq!(
            resolved.value_for(EntityKind::Warehouses, "6", FkPolicy::Optional),
            None
        );
    }
}
