//! Engine tuning: storage location, paging, timeouts and retry policy.

use serde::{Deserialize, Serialize};

fn default_db_path() -> String {
    "stsync.sqlite3".into()
}

fn default_entities_path() -> String {
    "stsync.config.json".into()
}

const fn default_page_size() -> u64 {
    200
}

const fn default_http_timeout_secs() -> u64 {
    30
}

const fn default_record_delay_ms() -> u64 {
    100
}

const fn default_max_attempts() -> u32 {
    4
}

const fn default_base_delay_ms() -> u64 {
    1000
}

const fn default_max_delay_ms() -> u64 {
    5000
}

const fn default_max_retry_after_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncSettings {
    /// Crosswalk database file.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Entity descriptor JSON file.
    #[serde(default = "default_entities_path")]
    pub entities_path: String,

    /// Substituted when an entity's `list_params.pageSize` is `0` or `null`.
    #[serde(default = "default_page_size")]
    pub page_size_default: u64,

    /// Per-request timeout.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Pause after each creation call.
    #[serde(default = "default_record_delay_ms")]
    pub record_delay_ms: u64,

    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            entities_path: default_entities_path(),
            page_size_default: default_page_size(),
            http_timeout_secs: default_http_timeout_secs(),
            record_delay_ms: default_record_delay_ms(),
            retry: RetrySettings::default(),
        }
    }
}

/// Backoff for transient HTTP failures.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RetrySettings {
    /// Total attempts including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Upper bound on a server-provided `Retry-After`.
    #[serde(default = "default_max_retry_after_secs")]
    pub max_retry_after_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            max_retry_after_secs: default_max_retry_after_secs(),
        }
    }
}
