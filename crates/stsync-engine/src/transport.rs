//! The seam between the engine and the two APIs.

use std::future::Future;

use serde_json::Value;
use stsync_http::{ApiClient, TransportError};

/// Reading from the source environment and creating in the target.
///
/// Implementations own retry; the engine only sees the classified outcome.
pub trait SyncTransport {
    /// `GET` one page of a source collection.
    fn fetch_page(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<Value, TransportError>>;

    /// `GET` a single source record by its path.
    fn fetch_record(&self, path: &str) -> impl Future<Output = Result<Value, TransportError>> {
        self.fetch_page(path, &[])
    }

    /// `GET` from the target, for lookups such as purchase-order types.
    fn fetch_target(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<Value, TransportError>>;

    /// `POST` a creation payload to the target and return the created record.
    fn create(
        &self,
        path: &str,
        payload: &Value,
    ) -> impl Future<Output = Result<Value, TransportError>>;
}

/// Production (source) and integration (target) clients.
pub struct HttpTransport {
    source: ApiClient,
    target: ApiClient,
}

impl HttpTransport {
    #[must_use]
    pub const fn new(source: ApiClient, target: ApiClient) -> Self {
        Self { source, target }
    }

    #[must_use]
    pub const fn source(&self) -> &ApiClient {
        &self.source
    }

    #[must_use]
    pub const fn target(&self) -> &ApiClient {
        &self.target
    }
}

impl SyncTransport for HttpTransport {
    async fn fetch_page(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, TransportError> {
        self.source.get_json(path, query).await
    }

    async fn fetch_target(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, TransportError> {
        self.target.get_json(path, query).await
    }

    async fn create(&self, path: &str, payload: &Value) -> Result<Value, TransportError> {
        self.target.post_json(path, payload).await
    }
}
