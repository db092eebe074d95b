//! Paginated lister: a lazy, finite sequence of source records for one kind.
//!
//! Pages are requested only when the previous one has been consumed, so a
//! limit reached mid-page never triggers another list call.
//!
//! After each non-empty page the next request is chosen by the first rule that
//! applies:
//!
//! 1. a boolean `hasMore` field: advance `page` when true, stop when false
//! 2. the configured more-pages field holding an integer (next `page`, which
//!    must be past the current one), a non-empty string (sent back as `continuationToken`) or a boolean
//! 3. a full page (`len >= pageSize`) when both `page` and `pageSize` are set:
//!    advance `page`
//!
//! Otherwise, or after an empty page, listing stops.

use std::collections::{BTreeMap, VecDeque};

use serde_json::{Map, Value};
use stsync_core::EntityDescriptor;

use crate::error::{SyncError, SyncPhase};
use crate::transport::SyncTransport;

const PAGE_PARAM: &str = "page";
const CONTINUATION_PARAM: &str = "continuationToken";
const HAS_MORE: &str = "hasMore";

/// Pagination position for one listing. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncCursor {
    page: Option<u64>,
    continuation: Option<String>,
    yielded: u64,
    pages_fetched: u64,
    limit: u64,
}

impl SyncCursor {
    /// Page number the next request will ask for, if the endpoint is page-numbered.
    #[must_use]
    pub const fn page(&self) -> Option<u64> {
        self.page
    }

    #[must_use]
    pub fn continuation(&self) -> Option<&str> {
        self.continuation.as_deref()
    }

    /// Records handed out so far.
    #[must_use]
    pub const fn yielded(&self) -> u64 {
        self.yielded
    }

    #[must_use]
    pub const fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    #[must_use]
    pub const fn limit_reached(&self) -> bool {
        self.limit != 0 && self.yielded >= self.limit
    }
}

pub struct Lister<'a, T> {
    transport: &'a T,
    descriptor: &'a EntityDescriptor,
    params: BTreeMap<String, Value>,
    buffer: VecDeque<Value>,
    cursor: SyncCursor,
    exhausted: bool,
}

impl<'a, T: SyncTransport> Lister<'a, T> {
    /// Start a listing. `limit` of 0 is unlimited. `since` is sent under the
    /// descriptor's since-filter parameter and ignored if it has none.
    #[must_use]
    pub fn new(
        transport: &'a T,
        descriptor: &'a EntityDescriptor,
        since: Option<&str>,
        limit: u64,
    ) -> Self {
        let mut params = descriptor.list_params.clone();
        match (since, descriptor.since_param.as_deref()) {
            (Some(since), Some(param)) => {
                params.insert(param.to_string(), Value::from(since));
            }
            (Some(_), None) => {
                tracing::warn!(kind = %descriptor.kind, "no since filter configured; listing everything");
            }
            _ => {}
        }

        let cursor = SyncCursor {
            page: params.get(PAGE_PARAM).and_then(as_u64),
            limit,
            ..SyncCursor::default()
        };

        Self {
            transport,
            descriptor,
            params,
            buffer: VecDeque::new(),
            cursor,
            exhausted: false,
        }
    }

    #[must_use]
    pub const fn cursor(&self) -> &SyncCursor {
        &self.cursor
    }

    /// Next record in source order, or `None` when the listing is finished.
    ///
    /// # Errors
    ///
    /// Any failure fetching or reading a page aborts the listing.
    pub async fn next_record(&mut self) -> Result<Option<Value>, SyncError> {
        loop {
            if self.cursor.limit_reached() {
                return Ok(None);
            }
            if let Some(record) = self.buffer.pop_front() {
                self.cursor.yielded += 1;
                return Ok(Some(record));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fetch_page().await?;
        }
    }

    async fn fetch_page(&mut self) -> Result<(), SyncError> {
        let kind = self.descriptor.kind;
        let query = query_pairs(&self.params);
        let body = self
            .transport
            .fetch_page(&self.descriptor.list_path, &query)
            .await
            .map_err(|source| SyncError::Transport {
                kind,
                phase: SyncPhase::Listing,
                source,
            })?;
        self.cursor.pages_fetched += 1;

        let Value::Object(body) = body else {
            return Err(SyncError::MalformedPage {
                kind,
                detail: "list response is not a JSON object".into(),
            });
        };
        let records = match body.get(&self.descriptor.data_key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(records)) => records.clone(),
            Some(_) => {
                return Err(SyncError::MalformedPage {
                    kind,
                    detail: format!("'{}' is not an array", self.descriptor.data_key),
                });
            }
        };

        tracing::info!(
            kind = %kind,
            page = self.cursor.page().unwrap_or(self.cursor.pages_fetched),
            records = records.len(),
            total_so_far = self.cursor.yielded,
            "fetched page"
        );

        self.exhausted = !self.advance(&body, records.len());
        self.buffer.extend(records);
        Ok(())
    }

    /// Move the request parameters to the next page. Returns false when there is none.
    fn advance(&mut self, body: &Map<String, Value>, returned: usize) -> bool {
        if returned == 0 {
            return false;
        }

        if let Some(flag) = body.get(HAS_MORE) {
            return is_truthy(flag) && self.next_page_number();
        }

        match body.get(&self.descriptor.more_pages_key) {
            Some(Value::Number(n)) => {
                if let Some(next) = n.as_u64() {
                    let current = self.cursor.page().unwrap_or(0);
                    if next <= current {
                        tracing::warn!(
                            kind = %self.descriptor.kind,
                            current,
                            next,
                            "next page does not move forward; stopping"
                        );
                        return false;
                    }
                    self.set_page(next);
                    return true;
                }
            }
            Some(Value::String(token)) if !token.is_empty() => {
                self.params
                    .insert(CONTINUATION_PARAM.into(), Value::from(token.as_str()));
                self.cursor.continuation = Some(token.clone());
                return true;
            }
            Some(Value::Bool(more)) => return *more && self.next_page_number(),
            _ => {}
        }

        let full_page = self
            .descriptor
            .page_size()
            .is_some_and(|size| size > 0 && returned as u64 >= size);
        full_page && self.params.contains_key(PAGE_PARAM) && self.next_page_number()
    }

    fn next_page_number(&mut self) -> bool {
        let current = self.cursor.page().unwrap_or(1);
        self.set_page(current + 1);
        true
    }

    fn set_page(&mut self, page: u64) {
        self.params.insert(PAGE_PARAM.into(), Value::from(page));
        self.cursor.page = Some(page);
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Render list parameters as query pairs: strings unquoted, `null` dropped.
fn query_pairs(params: &BTreeMap<String, Value>) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), rendered))
        })
        .collect()
}
