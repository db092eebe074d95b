//! Per-environment API client.

use std::time::Duration;

use serde_json::Value;
use stsync_core::Environment;

use crate::error::TransportError;
use crate::http::{check_response, read_json};
use crate::retry::{self, RetryPolicy};

/// Everything needed to address one API environment.
///
/// The bearer token is obtained once per run and treated as an opaque header.
#[derive(Debug, Clone)]
pub struct ApiEnvironment {
    pub env: Environment,
    pub api_base: String,
    pub tenant_id: String,
    pub app_key: String,
    pub bearer_token: String,
}

impl ApiEnvironment {
    /// Absolute URL for a request path. `{tenant}` is replaced with this
    /// environment's tenant.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        let path = path.replace("{tenant}", &self.tenant_id);
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Authenticated JSON client for one environment, with retry on transient failures.
pub struct ApiClient {
    http: reqwest::Client,
    env: ApiEnvironment,
    policy: RetryPolicy,
}

impl ApiClient {
    /// Build a client with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Network`] if the underlying client cannot be built.
    pub fn new(
        env: ApiEnvironment,
        timeout: Duration,
        policy: RetryPolicy,
    ) -> Result<Self, TransportError> {
        let http = build_http_client(timeout)?;
        Ok(Self { http, env, policy })
    }

    #[must_use]
    pub const fn environment(&self) -> &ApiEnvironment {
        &self.env
    }

    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// `GET` a path with query parameters and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns the classified [`TransportError`]; transient failures are
    /// retried first and surface as `Exhausted`.
    pub async fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, TransportError> {
        let url = self.env.url(path);
        let operation = format!("GET {url}");
        retry::run(&self.policy, &operation, || self.get_once(&url, query)).await
    }

    /// `POST` a JSON body to a path and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_json`].
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        let url = self.env.url(path);
        let operation = format!("POST {url}");
        retry::run(&self.policy, &operation, || self.post_once(&url, body)).await
    }

    async fn get_once(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<Value, TransportError> {
        tracing::debug!(env = %self.env.env, url, ?query, "GET");
        let resp = self
            .authorized(self.http.get(url))
            .query(query)
            .send()
            .await?;
        read_json(check_response(resp).await?).await
    }

    async fn post_once(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        tracing::debug!(env = %self.env.env, url, "POST");
        let resp = self
            .authorized(self.http.post(url))
            .json(body)
            .send()
            .await?;
        read_json(check_response(resp).await?).await
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.env.bearer_token)
            .header("ST-App-Key", &self.env.app_key)
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, TransportError> {
    reqwest::Client::builder()
        .user_agent(concat!("stsync/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(TransportError::from)
}
