//! Transport seam
//!
//! One async trait for JSON over HTTP. The native build implements it with
//! `reqwest`, the browser build with `gloo-net`. Futures are `?Send` so
//! the browser's single-threaded futures fit the same trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::HttpFailure;

/// JSON request/response transport
#[async_trait(?Send)]
pub trait Transport {
    /// `GET {base}{path}?{query}` and decode the JSON body
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, HttpFailure>;

    /// `POST {base}{path}` with a JSON body and decode the JSON reply.
    /// An empty reply decodes as `Value::Null`.
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, HttpFailure>;
}

/// Percent-encoded query string, including the leading `?` (empty if no params)
pub fn query_string(query: &[(&str, String)]) -> String {
    if query.is_empty() {
        return String::new();
    }

    let pairs: Vec<String> = query
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect();
    format!("?{}", pairs.join("&"))
}

/// Join a base URL, a path and a query
pub fn build_url(base: &str, path: &str, query: &[(&str, String)]) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}{}", base, path, query_string(query))
}

/// Pull a human-readable message out of an error body.
///
/// Recognizes JSON objects with a `message`, `title`, `error` or `detail`
/// string; otherwise the trimmed body text, if any.
pub fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        return ["message", "title", "error", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .filter(|m| !m.trim().is_empty());
    }

    Some(body.to_string())
}
