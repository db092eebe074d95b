//! OAuth2 client-credentials token fetch.
//!
//! One token per environment per run; there is no refresh.

use std::time::Duration;

use stsync_core::Environment;

use crate::client::build_http_client;
use crate::error::{AuthError, TransportError};
use crate::http::{check_response, read_json};
use crate::retry::{self, RetryPolicy};

/// Client credentials for one environment's token endpoint.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub env: Environment,
    pub auth_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: Option<String>,
}

/// Fetch a bearer token with `grant_type=client_credentials`.
///
/// Client id and secret go in HTTP basic auth. Transient failures are retried
/// with `policy`.
///
/// # Errors
///
/// Returns [`AuthError::Request`] for any transport failure and
/// [`AuthError::MissingToken`] when the response has no `access_token`.
pub async fn fetch_token(
    creds: &OAuthCredentials,
    timeout: Duration,
    policy: &RetryPolicy,
) -> Result<String, AuthError> {
    let env = creds.env;
    let http = build_http_client(timeout).map_err(|source| AuthError::Request { env, source })?;

    tracing::info!(%env, url = %creds.auth_url, "fetching OAuth token");
    let operation = format!("token {env}");
    let body = retry::run(policy, &operation, || request_token(&http, creds))
        .await
        .map_err(|source| {
            tracing::error!(%env, error = %source, "authentication failed");
            AuthError::Request { env, source }
        })?;

    access_token(&body).ok_or(AuthError::MissingToken { env })
}

async fn request_token(
    http: &reqwest::Client,
    creds: &OAuthCredentials,
) -> Result<serde_json::Value, TransportError> {
    let mut form = vec![("grant_type", "client_credentials")];
    if let Some(scope) = creds.scope.as_deref().filter(|s| !s.is_empty()) {
        form.push(("scope", scope));
    }
    let resp = http
        .post(&creds.auth_url)
        .basic_auth(&creds.client_id, Some(&creds.client_secret))
        .form(&form)
        .send()
        .await?;
    read_json(check_response(resp).await?).await
}

fn access_token(body: &serde_json::Value) -> Option<String> {
    body.get("access_token")
        .and_then(serde_json::Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
