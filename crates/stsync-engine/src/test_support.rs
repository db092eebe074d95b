//! In-memory transport for engine tests.

use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;
use std::sync::Mutex;

use serde_json::{Value, json};
use stsync_core::{EntityDescriptor, EntityKind};
use stsync_http::TransportError;

use crate::transport::SyncTransport;

/// Scripted answer for the n-th create call.
#[derive(Debug, Clone, Copy)]
pub enum CreateReply {
    NoId,
    Status(u16),
}

/// Serves list pages in order and answers creates with ids `1001, 1002, ...`.
///
/// Single records and target lookups are served by exact path; unknown paths
/// answer 404.
#[derive(Default)]
pub struct FakeTransport {
    pages: Vec<Value>,
    repeat: bool,
    fail_list: bool,
    replies: HashMap<usize, CreateReply>,
    records: HashMap<String, Value>,
    target: HashMap<String, Value>,
    queries: Mutex<Vec<BTreeMap<String, String>>>,
    target_calls: Mutex<Vec<String>>,
    creates: Mutex<Vec<(String, Value)>>,
}

impl FakeTransport {
    pub fn with_pages(pages: Vec<Value>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    /// Start over from the first page once every page has been served.
    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Script the reply to the `call`-th create (1-based).
    pub fn with_create_reply(mut self, call: usize, reply: CreateReply) -> Self {
        self.replies.insert(call, reply);
        self
    }

    pub fn with_record(mut self, path: &str, record: Value) -> Self {
        self.records.insert(path.to_string(), record);
        self
    }

    pub fn with_target(mut self, path: &str, body: Value) -> Self {
        self.target.insert(path.to_string(), body);
        self
    }

    pub fn target_calls(&self) -> Vec<String> {
        self.target_calls.lock().unwrap().clone()
    }

    pub fn page_calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<BTreeMap<String, String>> {
        self.queries.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<(String, Value)> {
        self.creates.lock().unwrap().clone()
    }
}

fn status_error(status: u16) -> TransportError {
    let body = format!("scripted {status}");
    match status {
        401 | 403 => TransportError::Unauthorized { status, body },
        429 => TransportError::RateLimited {
            retry_after_secs: None,
        },
        500.. => TransportError::Server { status, body },
        _ => TransportError::Client { status, body },
    }
}

impl SyncTransport for FakeTransport {
    async fn fetch_page(
        &self,
        _path: &str,
        query: &[(String, String)],
    ) -> Result<Value, TransportError> {
        let call = {
            let mut queries = self.queries.lock().unwrap();
            queries.push(query.iter().cloned().collect());
            queries.len() - 1
        };
        if self.fail_list {
            return Err(status_error(503));
        }
        let index = if self.repeat && !self.pages.is_empty() {
            call % self.pages.len()
        } else {
            call
        };
        Ok(self.pages.get(index).cloned().unwrap_or_else(|| json!({})))
    }

    async fn fetch_record(&self, path: &str) -> Result<Value, TransportError> {
        self.records.get(path).cloned().ok_or_else(|| status_error(404))
    }

    async fn fetch_target(
        &self,
        path: &str,
        _query: &[(String, String)],
    ) -> Result<Value, TransportError> {
        self.target_calls.lock().unwrap().push(path.to_string());
        self.target.get(path).cloned().ok_or_else(|| status_error(404))
    }

    async fn create(&self, path: &str, payload: &Value) -> Result<Value, TransportError> {
        let call = {
            let mut creates = self.creates.lock().unwrap();
            creates.push((path.to_string(), payload.clone()));
            creates.len()
        };
        match self.replies.get(&call) {
            None => Ok(json!({"id": 1000 + call})),
            Some(CreateReply::NoId) => Ok(json!({"status": "ok"})),
            Some(CreateReply::Status(status)) => Err(status_error(*status)),
        }
    }
}

/// Descriptor listing `/source/<kind>` page by page and creating at `/target/<kind>`.
pub fn descriptor(kind: EntityKind, page_size: u64) -> EntityDescriptor {
    EntityDescriptor {
        kind,
        list_path: format!("/source/{kind}"),
        create_path: Some(format!("/target/{kind}")),
        list_params: BTreeMap::from([
            ("page".to_string(), json!(1)),
            ("pageSize".to_string(), json!(page_size)),
        ]),
        data_key: "data".into(),
        more_pages_key: "hasMore".into(),
        since_param: None,
    }
}

/// Item records `{id, code, name}` for each id in the range.
pub fn numbered(ids: RangeInclusive<u64>) -> Value {
    ids.map(|id| json!({"id": id, "code": format!("C{id}"), "name": format!("Item {id}")}))
        .collect()
}
