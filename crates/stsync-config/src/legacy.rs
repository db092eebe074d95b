//! Flat `ST_*` environment variable names from existing `.env` files.
//!
//! These map onto the nested settings tree so a `.env` written for the old
//! tool keeps working unchanged. `ST_APP_KEY` is a shared fallback for both
//! environments and sits below the environment-specific keys.

use figment::providers::Env;

const LEGACY_KEYS: &[(&str, &str)] = &[
    ("ST_AUTH_URL_PROD", "prod.auth_url"),
    ("ST_AUTH_URL_INT", "int.auth_url"),
    ("ST_API_BASE_PROD", "prod.api_base"),
    ("ST_API_BASE_INT", "int.api_base"),
    ("ST_CLIENT_ID_PROD", "prod.client_id"),
    ("ST_CLIENT_ID_INT", "int.client_id"),
    ("ST_CLIENT_SECRET_PROD", "prod.client_secret"),
    ("ST_CLIENT_SECRET_INT", "int.client_secret"),
    ("ST_TENANT_ID_PROD", "prod.tenant_id"),
    ("ST_TENANT_ID_INT", "int.tenant_id"),
    ("ST_APP_KEY_PROD", "prod.app_key"),
    ("ST_APP_KEY_INT", "int.app_key"),
    ("ST_SCOPE_PROD", "prod.scope"),
    ("ST_SCOPE_INT", "int.scope"),
    ("STSYNC_DB", "sync.db_path"),
    ("ST_PAGE_SIZE", "sync.page_size_default"),
    ("ST_HTTP_TIMEOUT", "sync.http_timeout_secs"),
    ("ST_DEFAULT_WAREHOUSE_ID_INT", "defaults.warehouse_id"),
    ("ST_DEFAULT_BUSINESS_UNIT_ID_INT", "defaults.business_unit_id"),
    ("ST_PO_TYPE_ID_INT", "defaults.po_type_id"),
];

/// Settings key for a legacy variable name, case-insensitively.
pub fn settings_key(var: &str) -> Option<&'static str> {
    LEGACY_KEYS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(var))
        .map(|(_, key)| *key)
}

/// `ST_APP_KEY` applied to one section's `app_key`.
pub fn shared_app_key(section: &'static str) -> Env {
    Env::raw()
        .only(&["ST_APP_KEY"])
        .map(move |_| format!("{section}.app_key").into())
}

/// Every environment-specific legacy variable.
pub fn provider() -> Env {
    Env::raw().filter_map(|var| settings_key(var.as_str()).map(Into::into))
}
