//! Transport and authentication error types.

use stsync_core::Environment;
use thiserror::Error;

/// Classified failure of one HTTP exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// 429 Too Many Requests.
    #[error("rate limited{}", retry_after_secs.map(|s| format!(" (retry after {s}s)")).unwrap_or_default())]
    RateLimited {
        /// Parsed `Retry-After` header, when present and numeric.
        retry_after_secs: Option<u64>,
    },

    /// 5xx response.
    #[error("server error ({status}): {body}")]
    Server { status: u16, body: String },

    /// 401 or 403 response. Never retried; aborts a run.
    #[error("unauthorized ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// Any other non-success response.
    #[error("request rejected ({status}): {body}")]
    Client { status: u16, body: String },

    /// Connection, timeout, or other network-level failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not the JSON we expected.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// Every attempt failed with a transient error.
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<TransportError>,
    },
}

impl TransportError {
    /// Whether another attempt may succeed: rate limiting, 5xx, and network
    /// failures while connecting, sending, or reading the body.
    ///
    /// Builder, redirect, and decode errors from `reqwest` are permanent.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Server { .. } => true,
            Self::Network(e) => e.is_connect() || e.is_timeout() || e.is_request() || e.is_body(),
            _ => false,
        }
    }

    /// Whether the credentials were rejected.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Unauthorized { .. } => true,
            Self::Exhausted { last, .. } => last.is_unauthorized(),
            _ => false,
        }
    }

    /// HTTP status, if the failure came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::Server { status, .. }
            | Self::Unauthorized { status, .. }
            | Self::Client { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Exhausted { last, .. } => last.status(),
            Self::Decode(_) => None,
        }
    }
}

/// Failure to obtain a bearer token. Always fatal for a run.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{env} authentication failed: {source}{}", hint(source))]
    Request {
        env: Environment,
        #[source]
        source: TransportError,
    },

    #[error("{env} authentication succeeded but the response has no access_token")]
    MissingToken { env: Environment },
}

fn hint(source: &TransportError) -> &'static str {
    match source {
        TransportError::Client { body, .. } | TransportError::Unauthorized { body, .. }
            if body.contains("invalid_client") =>
        {
            " (check the client id and client secret)"
        }
        _ => "",
    }
}
