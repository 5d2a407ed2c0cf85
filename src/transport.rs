//! Transport boundary.
//!
//! The client talks to the network only through [`Transport`]: one-shot
//! requests return a status and a buffered body, streaming requests return the
//! raw body as an in-order chunk stream. Dropping that stream aborts the
//! transfer.

pub mod http;

pub use http::{HttpTransport, TransportError};

use crate::{BoxStream, Result};
use bytes::Bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request as seen by the transport.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    /// Path relative to the configured base URL (e.g. "chat/completions")
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub bearer_token: Option<String>,
    /// Correlation id, sent as `x-client-request-id`
    pub request_id: Option<String>,
}

impl TransportRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            bearer_token: None,
            request_id: None,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
            bearer_token: None,
            request_id: None,
        }
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }
}

/// Buffered one-shot response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and buffer the whole response body.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;

    /// Send a request and hand back the response body as it arrives.
    ///
    /// Non-2xx responses fail here, before any stream exists.
    async fn open_stream(&self, request: TransportRequest) -> Result<BoxStream<'static, Bytes>>;
}
