//! Generic resource client: a path, a service name and a transport.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;

use super::transport::Transport;
use crate::error::{HttpFailure, ServiceError};

/// One REST collection, e.g. `/Orders`
#[derive(Clone)]
pub struct Resource {
    transport: Rc<dyn Transport>,
    path: &'static str,
    service: &'static str,
}

impl Resource {
    pub fn new(transport: Rc<dyn Transport>, path: &'static str, service: &'static str) -> Self {
        Self {
            transport,
            path,
            service,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    fn url_path(&self, segments: &[&str]) -> String {
        let mut path = self.path.to_string();
        for segment in segments {
            path.push('/');
            path.push_str(&urlencoding::encode(segment));
        }
        path
    }

    fn fail(&self, failure: HttpFailure) -> ServiceError {
        ServiceError::new(self.service, failure)
    }

    fn decode<R: DeserializeOwned>(&self, value: Value) -> Result<R, ServiceError> {
        serde_json::from_value(value).map_err(|e| {
            self.fail(HttpFailure::Unknown {
                message: Some(format!("Unexpected response from server: {}", e)),
            })
        })
    }

    /// `GET` a sub-path and decode it as `R`
    pub async fn get<R: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<R, ServiceError> {
        let path = self.url_path(segments);
        tracing::debug!(service = self.service, %path, "GET");

        let value = self
            .transport
            .get_json(&path, query)
            .await
            .map_err(|f| self.fail(f))?;
        self.decode(value)
    }

    /// `GET`, decode as `R`, then project with `map`
    pub async fn get_mapped<R, U, F>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        map: F,
    ) -> Result<U, ServiceError>
    where
        R: DeserializeOwned,
        F: FnOnce(R) -> U,
    {
        self.get(segments, query).await.map(map)
    }

    /// `POST` a body to the collection root
    pub async fn post<B: Serialize, R: DeserializeOwned>(&self, body: &B) -> Result<R, ServiceError> {
        let body = serde_json::to_value(body)
            .map_err(|e| self.fail(HttpFailure::client_side(e.to_string())))?;
        tracing::debug!(service = self.service, path = self.path, "POST");

        let value = self
            .transport
            .post_json(self.path, &body)
            .await
            .map_err(|f| self.fail(f))?;
        self.decode(value)
    }
}
