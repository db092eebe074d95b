//! Shared HTTP response helpers.
//!
//! Centralizes status-code classification (429 with `Retry-After` parsing,
//! 5xx, 401/403, other non-success) so the client stays focused on request
//! construction.

use crate::error::TransportError;

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 500;

/// Check an HTTP response for error conditions.
///
/// Returns the response unchanged on success.
///
/// # Errors
///
/// - **429** → [`TransportError::RateLimited`] with the `Retry-After` seconds, if any
/// - **5xx** → [`TransportError::Server`]
/// - **401/403** → [`TransportError::Unauthorized`]
/// - **other non-success** → [`TransportError::Client`]
pub async fn check_response(
    resp: reqwest::Response,
) -> Result<reqwest::Response, TransportError> {
    let status = resp.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(TransportError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if status.is_success() {
        return Ok(resp);
    }

    let code = status.as_u16();
    let body = truncate(resp.text().await.unwrap_or_default());
    Err(if status.is_server_error() {
        TransportError::Server { status: code, body }
    } else if matches!(code, 401 | 403) {
        TransportError::Unauthorized { status: code, body }
    } else {
        TransportError::Client { status: code, body }
    })
}

/// Parse the `Retry-After` header as whole seconds.
fn parse_retry_after(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Read a success body as JSON. An empty body becomes `{}`.
///
/// # Errors
///
/// Returns [`TransportError::Network`] if the body cannot be read and
/// [`TransportError::Decode`] if it is not JSON.
pub async fn read_json(resp: reqwest::Response) -> Result<serde_json::Value, TransportError> {
    let text = resp.text().await?;
    if text.trim().is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}
