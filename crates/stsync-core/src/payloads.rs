//! Typed creation payloads for the integration API.
//!
//! Field names follow the remote API (camelCase). Foreign keys are
//! `serde_json::Value` because the target API accepts numeric ids while the
//! crosswalk stores opaque strings; see [`id_value`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pricebook item (material) creation body.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemCreate {
    pub code: String,
    pub name: String,
    pub description: String,
    pub active: bool,
}

/// One purchase-order item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PoItemCreate {
    pub sku_id: Value,
    pub quantity_ordered: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_part_number: Option<String>,
}

/// Delivery target of a purchase order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PoShipTo {
    pub inventory_location_id: Value,
    pub description: String,
}

/// Purchase-order creation body for the v2 inventory API.
///
/// `typeId` and the receiving warehouse (`inventoryLocationId`, repeated under
/// `shipTo`) are mandatory on the target side.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PoCreate {
    pub vendor_id: Value,
    pub type_id: Value,
    pub inventory_location_id: Value,
    pub ship_to: PoShipTo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_unit_id: Option<Value>,
    pub external_number: String,
    pub date: String,
    pub required_on: String,
    pub tax: f64,
    pub shipping: f64,
    pub impacts_technician_payroll: bool,
    pub items: Vec<PoItemCreate>,
}

/// Job creation body.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobCreate {
    pub customer_id: Value,
    pub location_id: Value,
    pub job_type_id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<Value>,
    pub source: String,
    pub external_number: String,
    pub notes: String,
}

/// Render a stored identifier as the JSON value the target API expects:
/// a number when it parses as one, otherwise the string unchanged.
#[must_use]
pub fn id_value(id: &str) -> Value {
    id.parse::<i64>()
        .map_or_else(|_| Value::String(id.to_string()), Value::from)
}

/// External number stamped on every created record, pointing back at production.
#[must_use]
pub fn external_number(source_id: &str) -> String {
    format!("PROD-{source_id}")
}
