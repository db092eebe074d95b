//! Fallback identifiers in the integration tenant used when mapping purchase orders.

use serde::{Deserialize, Serialize};

use crate::lenient;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DefaultsConfig {
    /// Used when a PO's warehouse has no crosswalk entry.
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub warehouse_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub business_unit_id: Option<String>,

    /// Purchase-order type stamped on every created PO.
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub po_type_id: Option<String>,
}
