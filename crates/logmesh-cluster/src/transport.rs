//! Transport collaborator: how node-scoped requests reach a node.
//!
//! The node layer only builds `ApiRequest`s and decodes `ApiResponse`s;
//! issuing the request is the transport's job. Every call is routed
//! through the target node's `TransportEndpoint`.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;

use logmesh_core::{TransportEndpoint, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

/// A request against a single node.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    /// Acceptable statuses. Empty = any 2xx.
    pub expect: Vec<u16>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            expect: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body. A body that fails to serialize is logged and
    /// sent as `null`.
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        let value = serde_json::to_value(body).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path, error = %e, "request body failed to serialize, sending null");
            serde_json::Value::Null
        });
        self.body = Some(value);
        self
    }

    pub fn expect(mut self, statuses: &[u16]) -> Self {
        self.expect = statuses.to_vec();
        self
    }

    /// Whether `status` satisfies this request's expectation.
    pub fn accepts(&self, status: u16) -> bool {
        if self.expect.is_empty() {
            (200..300).contains(&status)
        } else {
            self.expect.contains(&status)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON. `path` only feeds the error message.
    pub fn json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        serde_json::from_str(&self.body).map_err(|e| TransportError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Issues requests to nodes.
///
/// Implementations decide retries and timeouts; the node layer does neither.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        target: &TransportEndpoint,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn execute(
        &self,
        target: &TransportEndpoint,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send {
        (**self).execute(target, request)
    }
}
