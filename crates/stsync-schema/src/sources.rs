//! Hand-written schemas for production source documents.
//!
//! Every source document must carry some identifier (`id`, `guid` or
//! `externalId`). Beyond that the schemas only pin the fields the mapper reads,
//! and only their types; extra fields are always allowed.

use serde_json::{Value, json};

fn id_type() -> Value {
    json!({ "type": ["integer", "string"] })
}

fn nullable_id_type() -> Value {
    json!({ "type": ["integer", "string", "null"] })
}

/// A number, or a string holding one (some tenants send `"2.5"`).
fn numeric() -> Value {
    json!({
        "anyOf": [
            { "type": ["number", "null"] },
            { "type": "string", "pattern": "^\\s*-?[0-9]+(\\.[0-9]+)?\\s*$" }
        ]
    })
}

fn any_identifier() -> Value {
    json!([
        { "required": ["id"] },
        { "required": ["guid"] },
        { "required": ["externalId"] }
    ])
}

pub(crate) fn item_source() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "ItemSource",
        "type": "object",
        "anyOf": any_identifier(),
        "properties": {
            "id": id_type(),
            "code": { "type": ["string", "null"] },
            "itemCode": { "type": ["string", "null"] },
            "name": { "type": ["string", "null"] },
            "description": { "type": ["string", "null"] },
            "active": { "type": ["boolean", "null"] }
        }
    })
}

pub(crate) fn po_source() -> Value {
    let line = json!({
        "type": "object",
        "properties": {
            "itemId": nullable_id_type(),
            "pricebookItemId": nullable_id_type(),
            "materialId": nullable_id_type(),
            "equipmentId": nullable_id_type(),
            "skuId": nullable_id_type(),
            "quantity": numeric(),
            "qty": numeric(),
            "unitCost": numeric(),
            "unitPrice": numeric(),
            "cost": numeric()
        }
    });
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "PurchaseOrderSource",
        "type": "object",
        "anyOf": any_identifier(),
        "properties": {
            "id": id_type(),
            "vendorId": nullable_id_type(),
            "vendor": { "type": ["object", "null"] },
            "warehouseId": nullable_id_type(),
            "warehouse": { "type": ["object", "null"] },
            "items": { "type": ["array", "null"], "items": line.clone() },
            "lines": { "type": ["array", "null"], "items": line }
        }
    })
}

pub(crate) fn job_source() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "JobSource",
        "type": "object",
        "anyOf": any_identifier(),
        "required": ["customerId", "locationId", "jobTypeId"],
        "properties": {
            "id": id_type(),
            "customerId": id_type(),
            "locationId": id_type(),
            "jobTypeId": id_type(),
            "campaignId": nullable_id_type()
        }
    })
}
