//! # stsync-http
//!
//! Resilient transport for the two API environments.
//!
//! - [`ApiClient`]: JSON `GET`/`POST` with `Authorization: Bearer` and
//!   `ST-App-Key` headers, a per-request timeout, and `{tenant}` path
//!   resolution
//! - [`retry`]: bounded exponential backoff with jitter, honouring
//!   `Retry-After` on 429
//! - [`oauth`]: client-credentials token fetch
//!
//! Failures are classified into [`TransportError`]; callers decide whether a
//! classified failure is fatal or per-record.

pub mod client;
pub mod error;
pub mod http;
pub mod oauth;
pub mod retry;

pub use client::{ApiClient, ApiEnvironment};
pub use error::{AuthError, TransportError};
pub use oauth::{OAuthCredentials, fetch_token};
pub use retry::RetryPolicy;
