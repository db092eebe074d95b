//! Purchase orders, posted as the v2 inventory body.
//!
//! Every item's SKU must already be mapped. The vendor is translated when
//! mapped and sent as-is otherwise. The receiving warehouse is translated when
//! mapped, else falls back to the configured default. A PO that ends up with
//! no purchase-order type or no warehouse fails instead of being posted
//! without them.

use chrono::Utc;
use serde_json::Value;
use stsync_core::payloads::{PoCreate, PoItemCreate, PoShipTo, external_number, id_value};
use stsync_core::{EntityKind, SkipReason};

use super::fields::{first_f64, first_id, first_str, nested_id};
use super::{FkPolicy, ForeignKey, MapperDefaults, Rejection, ResolvedKeys};

/// Target-side list of purchase-order types, used when no type is configured.
pub const PO_TYPES_PATH: &str = "/inventory/v2/tenant/{tenant}/purchase-order-types";

const LINE_ITEM_KEYS: [&str; 5] = [
    "itemId",
    "pricebookItemId",
    "materialId",
    "equipmentId",
    "skuId",
];

const SHIP_TO_FALLBACK: &str = "Ship to Integration Warehouse";

fn lines(record: &Value) -> &[Value] {
    ["items", "lines"]
        .iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_array))
        .find(|lines| !lines.is_empty())
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn vendor_id(record: &Value) -> Option<String> {
    first_id(record, &["vendorId"]).or_else(|| nested_id(record, "vendor"))
}

fn warehouse_id(record: &Value) -> Option<String> {
    first_id(record, &["warehouseId"]).or_else(|| nested_id(record, "warehouse"))
}

pub(super) fn foreign_keys(record: &Value) -> Vec<ForeignKey> {
    let mut keys: Vec<ForeignKey> = lines(record)
        .iter()
        .filter_map(|line| first_id(line, &LINE_ITEM_KEYS))
        .map(|id| ForeignKey::new(EntityKind::Items, id, FkPolicy::Required))
        .collect();
    if let Some(id) = vendor_id(record) {
        keys.push(ForeignKey::new(EntityKind::Vendors, id, FkPolicy::Passthrough));
    }
    if let Some(id) = warehouse_id(record) {
        keys.push(ForeignKey::new(EntityKind::Warehouses, id, FkPolicy::Optional));
    }
    keys
}

pub(super) fn build(
    record: &Value,
    source_id: &str,
    resolved: &ResolvedKeys,
    defaults: &MapperDefaults,
) -> Result<PoCreate, Rejection> {
    let items: Vec<PoItemCreate> = lines(record)
        .iter()
        .filter_map(|line| build_item(line, resolved))
        .collect();
    if items.is_empty() {
        return Err(SkipReason::Invalid {
            detail: "purchase order has no items with a SKU reference".into(),
        }
        .into());
    }

    let vendor_id = vendor_id(record)
        .and_then(|id| resolved.value_for(EntityKind::Vendors, &id, FkPolicy::Passthrough))
        .ok_or_else(|| SkipReason::Invalid {
            detail: "purchase order has no vendor".into(),
        })?;

    let type_id = defaults
        .po_type_id
        .as_deref()
        .or_else(|| resolved.po_type_id())
        .map(id_value)
        .ok_or_else(|| {
            Rejection::Fail(
                "could not determine a purchase order type; set defaults.po_type_id".into(),
            )
        })?;

    let warehouse = warehouse_id(record)
        .and_then(|id| resolved.value_for(EntityKind::Warehouses, &id, FkPolicy::Optional))
        .or_else(|| defaults.warehouse_id.as_deref().map(id_value))
        .ok_or_else(|| {
            Rejection::Fail(
                "no integration warehouse resolved; map the warehouse or set defaults.warehouse_id"
                    .into(),
            )
        })?;

    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let date = first_str(record, &["createdOn", "orderedOn", "modifiedOn"])
        .unwrap_or_else(|| now.clone());
    let required_on =
        first_str(record, &["requiredOn", "expectedOn", "createdOn"]).unwrap_or(now);

    Ok(PoCreate {
        vendor_id,
        type_id,
        inventory_location_id: warehouse.clone(),
        ship_to: PoShipTo {
            inventory_location_id: warehouse,
            description: record
                .get("warehouse")
                .and_then(|w| first_str(w, &["name", "displayName"]))
                .unwrap_or_else(|| SHIP_TO_FALLBACK.to_string()),
        },
        business_unit_id: defaults.business_unit_id.as_deref().map(id_value),
        external_number: external_number(source_id),
        date,
        required_on,
        tax: 0.0,
        shipping: 0.0,
        impacts_technician_payroll: false,
        items,
    })
}

fn build_item(line: &Value, resolved: &ResolvedKeys) -> Option<PoItemCreate> {
    let source_item = first_id(line, &LINE_ITEM_KEYS)?;
    let sku_id = resolved.value_for(EntityKind::Items, &source_item, FkPolicy::Required)?;
    Some(PoItemCreate {
        sku_id,
        quantity_ordered: first_f64(line, &["quantity", "qty"]).unwrap_or(0.0),
        cost: first_f64(line, &["unitCost", "unitPrice", "cost"]),
        description: first_str(line, &["name", "skuName", "description"]),
        vendor_part_number: first_str(line, &["vendorPartNumber"]),
    })
}

/// Pick a purchase-order type from a target list response: the first whose
/// name mentions stock or inventory, else the first listed.
pub(crate) fn pick_po_type(body: &Value) -> Option<String> {
    let types = ["data", "items"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_array))?;
    let named = |t: &&Value| {
        t.get("name")
            .and_then(Value::as_str)
            .map(str::to_lowercase)
            .is_some_and(|name| name.contains("stock") || name.contains("inventory"))
    };
    types
        .iter()
        .find(named)
        .or_else(|| types.first())
        .and_then(|t| first_id(t, &["id"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn po() -> Value {
        json!({
            "id": 55,
            "vendorId": 7,
            "warehouseId": 3,
            "createdOn": "2025-08-01T00:00:00Z",
            "items": [
                {"itemId": 900, "quantity": 2, "unitCost": 4.5, "vendorPartNumber": "VP-1"},
                {"skuId": 901, "qty": 1},
                {"description": "freight"}
            ]
        })
    }

    fn resolved_items() -> ResolvedKeys {
        let mut resolved = ResolvedKeys::default();
        resolved.insert(EntityKind::Items, "900", "9900".into());
        resolved.insert(EntityKind::Items, "901", "9901".into());
        resolved
    }

    fn defaults() -> MapperDefaults {
        MapperDefaults {
            warehouse_id: Some("12".into()),
            business_unit_id: None,
            po_type_id: Some("2".into()),
        }
    }

    fn failure(rejection: Rejection) -> String {
        match rejection {
            Rejection::Fail(detail) => detail,
            Rejection::Skip(reason) => panic!("expected a failure, got skip: {reason}"),
        }
    }

    #[test]
    fn foreign_keys_cover_lines_vendor_and_warehouse() {
        let keys = foreign_keys(&po());
        let summary: Vec<_> = keys
            .iter()
            .map(|k| (k.kind, k.source_id.as_str(), k.policy))
            .collect();
        assert_eq!(
            summary,
            vec![
                (EntityKind::Items, "900", FkPolicy::Required),
                (EntityKind::Items, "901", FkPolicy::Required),
                (EntityKind::Vendors, "7", FkPolicy::Passthrough),
                (EntityKind::Warehouses, "3", FkPolicy::Optional),
            ]
        );
        assert!(keys
            .iter()
            .all(|k| EntityKind::Pos.dependencies().contains(&k.kind)));
    }

    #[test]
    fn builds_items_with_translated_skus() {
        let po = build(&po(), "55", &resolved_items(), &defaults()).unwrap();

        assert_eq!(po.items.len(), 2);
        assert_eq!(po.items[0].sku_id, json!(9900));
        assert_eq!(po.items[0].quantity_ordered, 2.0);
        assert_eq!(po.items[0].cost, Some(4.5));
        assert_eq!(po.items[0].vendor_part_number.as_deref(), Some("VP-1"));
        assert_eq!(po.items[1].sku_id, json!(9901));
        assert_eq!(po.items[1].quantity_ordered, 1.0);
        assert_eq!(po.external_number, "PROD-55");
        assert_eq!(po.date, "2025-08-01T00:00:00Z");
        assert_eq!(po.required_on, "2025-08-01T00:00:00Z");
        assert_eq!(po.tax, 0.0);
        assert!(!po.impacts_technician_payroll);
    }

    #[test]
    fn vendor_passes_through_and_warehouse_falls_back() {
        let po = build(&po(), "55", &resolved_items(), &defaults()).unwrap();
        assert_eq!(po.vendor_id, json!(7));
        assert_eq!(po.type_id, json!(2));
        assert_eq!(po.inventory_location_id, json!(12));
        assert_eq!(po.ship_to.inventory_location_id, json!(12));
        assert_eq!(po.ship_to.description, SHIP_TO_FALLBACK);
        assert_eq!(po.business_unit_id, None);
    }

    #[test]
    fn mapped_vendor_and_warehouse_are_translated() {
        let mut resolved = resolved_items();
        resolved.insert(EntityKind::Vendors, "7", "70".into());
        resolved.insert(EntityKind::Warehouses, "3", "30".into());
        let po = build(&po(), "55", &resolved, &defaults()).unwrap();
        assert_eq!(po.vendor_id, json!(70));
        assert_eq!(po.inventory_location_id, json!(30));
    }

    #[test]
    fn looked_up_type_fills_in_when_none_is_configured() {
        let mut resolved = resolved_items();
        resolved.set_po_type_id(Some("8".into()));
        let defaults = MapperDefaults {
            po_type_id: None,
            ..defaults()
        };
        let po = build(&po(), "55", &resolved, &defaults).unwrap();
        assert_eq!(po.type_id, json!(8));
    }

    #[test]
    fn missing_type_fails_the_record() {
        let defaults = MapperDefaults {
            po_type_id: None,
            ..defaults()
        };
        let err = build(&po(), "55", &resolved_items(), &defaults).unwrap_err();
        assert!(failure(err).contains("purchase order type"));
    }

    #[test]
    fn missing_warehouse_fails_the_record() {
        let defaults = MapperDefaults {
            warehouse_id: None,
            ..defaults()
        };
        let err = build(&po(), "55", &resolved_items(), &defaults).unwrap_err();
        assert!(failure(err).contains("warehouse"));
    }

    #[test]
    fn undated_po_gets_the_current_time() {
        let record = json!({"id": 1, "vendorId": 7, "lines": [{"itemId": 900}]});
        let po = build(&record, "1", &resolved_items(), &defaults()).unwrap();
        assert!(po.date.ends_with('Z'));
        assert_eq!(po.date.len(), "2025-08-01T00:00:00Z".len());
        assert_eq!(po.required_on, po.date);
    }

    #[test]
    fn nested_vendor_and_warehouse_objects_are_read() {
        let record = json!({
            "id": 1,
            "vendor": {"id": 8},
            "warehouse": {"id": 3, "name": "Main Yard"},
            "lines": [{"itemId": 900}]
        });
        let mut resolved = resolved_items();
        resolved.insert(EntityKind::Warehouses, "3", "33".into());
        let po = build(&record, "1", &resolved, &defaults()).unwrap();
        assert_eq!(po.vendor_id, json!(8));
        assert_eq!(po.inventory_location_id, json!(33));
        assert_eq!(po.ship_to.description, "Main Yard");
    }

    #[test]
    fn no_usable_items_is_invalid() {
        let record = json!({"id": 1, "vendorId": 7, "items": [{"description": "freight"}]});
        let err = build(&record, "1", &ResolvedKeys::default(), &defaults()).unwrap_err();
        assert!(matches!(err, Rejection::Skip(SkipReason::Invalid { .. })));
    }

    #[test]
    fn missing_vendor_is_invalid() {
        let record = json!({"id": 1, "items": [{"itemId": 900}]});
        let err = build(&record, "1", &resolved_items(), &defaults()).unwrap_err();
        assert!(matches!(
            err,
            Rejection::Skip(SkipReason::Invalid { ref detail }) if detail.contains("vendor")
        ));
    }

    #[test]
    fn po_type_prefers_stock_then_first() {
        let body = json!({"data": [
            {"id": 4, "name": "Drop Ship"},
            {"id": 6, "name": "Stock Replenishment"}
        ]});
        assert_eq!(pick_po_type(&body).as_deref(), Some("6"));

        let body = json!({"items": [{"id": 4, "name": "Drop Ship"}]});
        assert_eq!(pick_po_type(&body).as_deref(), Some("4"));

        assert_eq!(pick_po_type(&json!({"data": []})), None);
    }
}
