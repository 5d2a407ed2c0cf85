use super::{Method, Transport, TransportRequest, TransportResponse};
use crate::client::ClientConfig;
use crate::{BoxStream, Error, ErrorContext, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::Proxy;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// reqwest-backed [`Transport`].
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        // No client-wide timeout: it would also bound how long a stream may run.
        // One-shot requests get `config.timeout_secs` per request instead.
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(Duration::from_secs(config.pool_idle_timeout_secs)))
            .http2_adaptive_window(true)
            .http2_keep_alive_interval(Some(Duration::from_secs(30)))
            .http2_keep_alive_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy URL: {}", e),
                    ErrorContext::new().with_field("config.proxy"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build(&self, request: &TransportRequest) -> Result<reqwest::RequestBuilder> {
        let url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| {
                Error::request_with_context(
                    format!("invalid request path '{}': {}", request.path, e),
                    ErrorContext::new().with_source("http_transport"),
                )
            })?;

        let mut req = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(body) = &request.body {
            req = req.json(body);
        }
        if let Some(token) = &request.bearer_token {
            req = req.bearer_auth(token);
        }
        if let Some(id) = &request.request_id {
            req = req.header("x-client-request-id", id);
        }
        Ok(req)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let resp = self
            .build(&request)?
            .header("accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(TransportError::Http)?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(TransportError::Http)?;
        debug!(path = %request.path, status, bytes = body.len(), "response received");
        Ok(TransportResponse { status, body })
    }

    async fn open_stream(&self, request: TransportRequest) -> Result<BoxStream<'static, Bytes>> {
        let resp = self
            .build(&request)?
            .header("accept", "text/event-stream")
            .send()
            .await
            .map_err(TransportError::Http)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await.map_err(TransportError::Http)?;
            return Err(Error::from_response(status.as_u16(), &body));
        }
        debug!(path = %request.path, status = status.as_u16(), "event stream opened");

        let byte_stream = resp
            .bytes_stream()
            .map_err(|e| Error::Transport(TransportError::Http(e)));
        Ok(Box::pin(byte_stream))
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    // Url::join replaces the last segment unless the base ends with '/'.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid base URL '{}': {}", raw, e),
            ErrorContext::new().with_field("config.base_url"),
        )
    })
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
