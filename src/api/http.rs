//! Native HTTP transport on `reqwest`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use super::transport::{build_url, server_message, Transport};
use crate::config::ApiConfig;
use crate::error::{is_self_signed_cert, HttpFailure};

/// JSON transport against the configured base URL
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute(&self, method: Method, url: String, request: RequestBuilder) -> Result<Value, HttpFailure> {
        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, %method, %url, "Sending request");

        let response = request.send().await.map_err(|e| map_error(&e))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%request_id, status = status.as_u16(), "Request returned error status");
            return Err(HttpFailure::from_status(
                status.as_u16(),
                status.canonical_reason().map(str::to_string),
                server_message(&body),
            ));
        }

        let body = response.text().await.map_err(|e| map_error(&e))?;
        tracing::debug!(%request_id, status = status.as_u16(), bytes = body.len(), "Response received");

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| HttpFailure::Unknown {
            message: Some(format!("Unexpected response from server: {}", e)),
        })
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, HttpFailure> {
        let url = build_url(&self.base_url, path, query);
        let request = self.client.get(&url);
        self.execute(Method::GET, url, request).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, HttpFailure> {
        let url = build_url(&self.base_url, path, &[]);
        let request = self.client.post(&url).json(body);
        self.execute(Method::POST, url, request).await
    }
}

/// Full `source()` chain, so TLS causes buried under a connect error show up
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

fn map_error(error: &reqwest::Error) -> HttpFailure {
    if error.is_builder() {
        return HttpFailure::client_side(error.to_string());
    }

    if error.is_connect() || error.is_timeout() || error.is_request() {
        let detail = error_chain(error);
        return HttpFailure::Unreachable {
            self_signed_cert: is_self_signed_cert(&detail),
            detail: Some(detail),
        };
    }

    HttpFailure::Unknown {
        message: Some(error.to_string()),
    }
}
