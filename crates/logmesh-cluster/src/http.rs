//! reqwest-backed transport.

use logmesh_core::config::HttpConfig;
use logmesh_core::{TransportEndpoint, TransportError};

use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

/// Talks to nodes over HTTP. Cheap to clone; the connection pool is shared.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| TransportError::Connect {
                url: String::new(),
                reason: format!("failed to build http client: {e}"),
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn map_error(url: &str, e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Connect {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

impl Transport for HttpTransport {
    async fn execute(
        &self,
        target: &TransportEndpoint,
        request: ApiRequest,
    ) -> Result<ApiResponse, TransportError> {
        let url = target.join(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Put => self.client.put(&url),
            Method::Post => self.client.post(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = ?request.method, url = %url, "node request");

        let response = builder.send().await.map_err(|e| map_error(&url, e))?;
        let status = response.status().as_u16();
        if !request.accepts(status) {
            return Err(TransportError::UnexpectedStatus { url, status });
        }
        let body = response.text().await.map_err(|e| map_error(&url, e))?;

        tracing::trace!(url = %url, status, bytes = body.len(), "node response");
        Ok(ApiResponse { status, body })
    }
}
