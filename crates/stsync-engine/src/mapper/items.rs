//! Catalog items (pricebook materials). No foreign keys.

use serde_json::Value;
use stsync_core::payloads::{ItemCreate, external_number};

use super::fields::first_str;

const UNKNOWN_ITEM: &str = "Unknown Item";

pub(super) fn build(record: &Value, source_id: &str) -> ItemCreate {
    let name = first_str(record, &["name", "description"]).unwrap_or_else(|| UNKNOWN_ITEM.into());
    let description =
        first_str(record, &["description", "name"]).unwrap_or_else(|| UNKNOWN_ITEM.into());
    ItemCreate {
        code: first_str(record, &["code", "itemCode"])
            .unwrap_or_else(|| external_number(source_id)),
        name,
        description,
        active: record.get("active").and_then(Value::as_bool).unwrap_or(true),
    }
}
