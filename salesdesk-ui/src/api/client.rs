//! HTTP API Client
//!
//! `gloo-net` implementation of the shared [`Transport`] trait.

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde_json::Value;
use std::rc::Rc;

use salesdesk::api::{build_url, server_message, Transport};
use salesdesk::{ApiClient, HttpFailure};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

const API_URL_KEY: &str = "salesdesk_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Set the API base URL in local storage
pub fn set_api_base(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(API_URL_KEY, url.trim());
        }
    }
}

/// Services against the currently stored base URL
pub fn client() -> ApiClient {
    ApiClient::new(Rc::new(GlooTransport::new(get_api_base())))
}

/// JSON over the browser's `fetch`
pub struct GlooTransport {
    base_url: String,
}

impl GlooTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, HttpFailure> {
        let url = build_url(&self.base_url, path, query);

        let response = Request::get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(network_failure)?;

        read_json(response).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, HttpFailure> {
        let url = build_url(&self.base_url, path, &[]);

        let response = Request::post(&url)
            .header("Accept", "application/json")
            .json(body)
            .map_err(|e| HttpFailure::client_side(format!("Request build error: {}", e)))?
            .send()
            .await
            .map_err(network_failure)?;

        read_json(response).await
    }
}

/// `fetch` rejects without a status when the server is unreachable or the
/// certificate is refused; that is status 0.
fn network_failure(error: gloo_net::Error) -> HttpFailure {
    HttpFailure::from_status(0, None, Some(error.to_string()))
}

async fn read_json(response: Response) -> Result<Value, HttpFailure> {
    let body = response.text().await.unwrap_or_default();

    if !response.ok() {
        return Err(HttpFailure::from_status(
            response.status(),
            Some(response.status_text()),
            server_message(&body),
        ));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| HttpFailure::Unknown {
        message: Some(format!("Unexpected response from server: {}", e)),
    })
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_api_base_round_trips_through_storage() {
        set_api_base("  https://sales.example.com/api/  ");
        assert_eq!(get_api_base(), "https://sales.example.com/api");

        set_api_base("");
        assert_eq!(get_api_base(), DEFAULT_API_BASE);
    }

    #[wasm_bindgen_test]
    async fn test_unreachable_backend_is_status_zero() {
        // Port 9 (discard) refuses connections on test hosts
        let transport = GlooTransport::new("http://127.0.0.1:9/api");

        let failure = transport.get_json("/Predictions", &[]).await.unwrap_err();

        assert!(matches!(failure, HttpFailure::Unreachable { .. }));
    }
}
