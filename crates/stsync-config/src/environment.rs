//! Per-environment API credentials and endpoints.

use serde::{Deserialize, Serialize};
use stsync_core::Environment;

use crate::lenient;

/// Connection settings for one API environment (`[prod]` or `[int]`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EnvironmentConfig {
    /// OAuth token endpoint.
    #[serde(default)]
    pub auth_url: String,

    /// API base URL; request paths are joined onto it.
    #[serde(default)]
    pub api_base: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// Substituted for `{tenant}` in request paths.
    #[serde(default, deserialize_with = "lenient::string")]
    pub tenant_id: String,

    /// Sent as the `ST-App-Key` header.
    #[serde(default)]
    pub app_key: String,

    /// Optional OAuth scope.
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub scope: Option<String>,
}

impl EnvironmentConfig {
    /// Check if every required field is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.required_fields().iter().all(|(_, v)| !v.is_empty())
    }

    /// Names of the unset required fields, spelled as the env vars an operator
    /// would set (`ST_CLIENT_ID_PROD`).
    #[must_use]
    pub fn missing_fields(&self, env: Environment) -> Vec<String> {
        let suffix = env.env_suffix();
        self.required_fields()
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| {
                if name == "APP_KEY" {
                    format!("ST_APP_KEY_{suffix} or ST_APP_KEY")
                } else {
                    format!("ST_{name}_{suffix}")
                }
            })
            .collect()
    }

    fn required_fields(&self) -> [(&'static str, &str); 6] {
        [
            ("AUTH_URL", &self.auth_url),
            ("API_BASE", &self.api_base),
            ("CLIENT_ID", &self.client_id),
            ("CLIENT_SECRET", &self.client_secret),
            ("TENANT_ID", &self.tenant_id),
            ("APP_KEY", &self.app_key),
        ]
    }
}
