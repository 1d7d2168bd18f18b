//! # HTTP Transport
//!
//! The seam between the API client and the network.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Transport Seam                                  │
//! │                                                                         │
//! │  ApiClient / CloudinaryUploader                                        │
//! │       │  ApiRequest { method, url, headers, body }                     │
//! │       ▼                                                                 │
//! │  dyn HttpTransport                                                     │
//! │       ├── ReqwestTransport   (production: real HTTP)                  │
//! │       └── RecordingTransport (tests: records requests, canned replies)│
//! │       │                                                                 │
//! │       ▼  ApiResponse { status, body }                                  │
//! │  Status handling stays in the client, so both transports behave the   │
//! │  same way for 401s and error bodies.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, ApiResult};

// =============================================================================
// Request / Response
// =============================================================================

/// A file attached to a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart {
        fields: Vec<(String, String)>,
        file: FilePart,
    },
}

/// A fully built request, ready for a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        ApiRequest {
            method,
            url,
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// First value of a header, case-insensitive.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// JSON body, if any.
    pub fn json(&self) -> Option<&serde_json::Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Raw answer from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =============================================================================
// Transport Trait
// =============================================================================

/// Sends one request and returns the raw response.
///
/// Implementations never interpret status codes; any answer from the
/// server is `Ok`. `Err` means no answer (connection, timeout).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
}

// =============================================================================
// Reqwest Transport
// =============================================================================

/// Production transport over reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vitrina/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(ReqwestTransport { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        debug!(method = %request.method, url = %request.url, "HTTP request");

        let mut builder = self.client.request(request.method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart { fields, file } => {
                let mut form = reqwest::multipart::Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                let part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
                builder.multipart(form.part(file.field, part))
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, bytes = body.len(), "HTTP response");
        Ok(ApiResponse { status, body })
    }
}

// =============================================================================
// Recording Transport (tests)
// =============================================================================

#[cfg(any(test, feature = "test-util"))]
pub use recording::RecordingTransport;

#[cfg(any(test, feature = "test-util"))]
mod recording {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// In-memory transport: replies from a queue and records every request.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let transport = Arc::new(RecordingTransport::new());
    /// transport.push_json(200, json!({ "id": "p1" }));
    /// // ... call the client ...
    /// assert_eq!(transport.requests()[0].url.path(), "/api/product/p1");
    /// ```
    #[derive(Debug, Default)]
    pub struct RecordingTransport {
        replies: Mutex<VecDeque<ApiResult<ApiResponse>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a JSON reply.
        pub fn push_json(&self, status: u16, body: serde_json::Value) {
            self.push(Ok(ApiResponse::new(status, body.to_string())));
        }

        /// Queues a raw reply.
        pub fn push_raw(&self, status: u16, body: &str) {
            self.push(Ok(ApiResponse::new(status, body)));
        }

        /// Queues a transport failure.
        pub fn push_error(&self, err: ApiError) {
            self.push(Err(err));
        }

        fn push(&self, reply: ApiResult<ApiResponse>) {
            self.replies
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .push_back(reply);
        }

        /// Every request sent so far, in order.
        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap_or_else(|p| p.into_inner()).len()
        }
    }

    #[async_trait]
    impl HttpTransport for RecordingTransport {
        async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
            self.requests
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .push(request);

            self.replies
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::ConnectionFailed("no reply queued".into())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_recording_transport_replays_in_order() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "ok": true }));
        transport.push_raw(500, "boom");

        let url = Url::parse("http://localhost:3001/api/product").unwrap();
        let first = transport
            .send(ApiRequest::new(Method::GET, url.clone()).header("x-tenant-id", "t1"))
            .await
            .unwrap();
        let second = transport.send(ApiRequest::new(Method::POST, url.clone())).await.unwrap();
        let third = transport.send(ApiRequest::new(Method::GET, url)).await;

        assert!(first.is_success());
        assert_eq!(second.status, 500);
        assert!(matches!(third, Err(ApiError::ConnectionFailed(_))));
        assert_eq!(transport.request_count(), 3);
        assert_eq!(transport.requests()[0].header_value("X-Tenant-Id"), Some("t1"));
    }
}
