//! In-memory transport for controller tests.

use async_trait::async_trait;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

use super::transport::{query_string, Transport};
use crate::error::HttpFailure;

/// Canned replies keyed by `path?query`; unknown keys answer 404
#[derive(Default)]
pub(crate) struct StubTransport {
    replies: RefCell<HashMap<String, Result<Value, HttpFailure>>>,
    calls: RefCell<Vec<String>>,
    posted: RefCell<Vec<Value>>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, key: &str, body: Value) {
        self.replies.borrow_mut().insert(key.to_string(), Ok(body));
    }

    pub(crate) fn fail(&self, key: &str, failure: HttpFailure) {
        self.replies.borrow_mut().insert(key.to_string(), Err(failure));
    }

    /// `"METHOD key"` for every request, in order
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Bodies of every `POST`, in order
    pub(crate) fn posted(&self) -> Vec<Value> {
        self.posted.borrow().clone()
    }

    fn reply(&self, method: &str, key: String) -> Result<Value, HttpFailure> {
        self.calls.borrow_mut().push(format!("{} {}", method, key));
        self.replies
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(HttpFailure::from_status(404, None, None)))
    }
}

#[async_trait(?Send)]
impl Transport for StubTransport {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, HttpFailure> {
        self.reply("GET", format!("{}{}", path, query_string(query)))
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, HttpFailure> {
        self.posted.borrow_mut().push(body.clone());
        self.reply("POST", path.to_string())
    }
}
