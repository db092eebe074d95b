//! Jobs. Customer, location and job type must already be mapped; campaign is optional.

use serde_json::Value;
use stsync_core::payloads::{JobCreate, external_number};
use stsync_core::{EntityKind, SkipReason};

use super::fields::first_id;
use super::{FkPolicy, ForeignKey, ResolvedKeys};

const REFERENCES: [(&str, EntityKind, FkPolicy); 4] = [
    ("customerId", EntityKind::Customers, FkPolicy::Required),
    ("locationId", EntityKind::Locations, FkPolicy::Required),
    ("jobTypeId", EntityKind::JobTypes, FkPolicy::Required),
    ("campaignId", EntityKind::Campaigns, FkPolicy::Optional),
];

pub(super) fn foreign_keys(record: &Value) -> Vec<ForeignKey> {
    REFERENCES
        .iter()
        .filter_map(|(field, kind, policy)| {
            first_id(record, &[*field]).map(|id| ForeignKey::new(*kind, id, *policy))
        })
        .collect()
}

pub(super) fn build(
    record: &Value,
    source_id: &str,
    resolved: &ResolvedKeys,
) -> Result<JobCreate, SkipReason> {
    let reference = |field: &str, kind: EntityKind, policy: FkPolicy| {
        first_id(record, &[field]).and_then(|id| resolved.value_for(kind, &id, policy))
    };
    let required = |field: &str, kind: EntityKind| {
        reference(field, kind, FkPolicy::Required).ok_or_else(|| SkipReason::Invalid {
            detail: format!("job has no {field}"),
        })
    };

    Ok(JobCreate {
        customer_id: required("customerId", EntityKind::Customers)?,
        location_id: required("locationId", EntityKind::Locations)?,
        job_type_id: required("jobTypeId", EntityKind::JobTypes)?,
        campaign_id: reference("campaignId", EntityKind::Campaigns, FkPolicy::Optional),
        source: "stsync".into(),
        external_number: external_number(source_id),
        notes: format!("Cloned from Prod {source_id}"),
    })
}
