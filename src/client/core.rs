use super::builder::MistralClientBuilder;
use crate::pipeline::{ErrorEnvelope, EventStream};
use crate::transport::{Transport, TransportRequest};
use crate::types::{EmbeddingsRequest, EmbeddingsResponse, ModelListResponse};
use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

/// Client for the Mistral REST API.
///
/// Cheap to share behind an `Arc`; every call is independent and each
/// streaming call owns its own decoder state.
pub struct MistralClient {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) api_key: Option<String>,
    pub(crate) stream_buffer: usize,
}

impl MistralClient {
    /// Client for the public endpoint with the given key.
    ///
    /// `MISTRAL_*` environment overrides still apply, except to the key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        MistralClientBuilder::new().api_key(api_key).build()
    }

    pub fn builder() -> MistralClientBuilder {
        MistralClientBuilder::new()
    }

    /// List the models available to this key.
    pub async fn models(&self) -> Result<ModelListResponse> {
        self.fetch(TransportRequest::get("models")).await
    }

    pub async fn embeddings(&self, request: &EmbeddingsRequest) -> Result<EmbeddingsResponse> {
        let body = serde_json::to_value(request)?;
        self.fetch(TransportRequest::post("embeddings", body)).await
    }

    /// Open a `data:`-framed event stream at `path`, decoding frames as `T` and
    /// error envelopes as `E`.
    ///
    /// Non-2xx responses fail here; once the stream exists, every failure is
    /// reported through it.
    pub async fn open_stream<T, E>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<EventStream<T>>
    where
        T: DeserializeOwned + Send + 'static,
        E: ErrorEnvelope,
    {
        let key = self.check_authentication()?;
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("event_stream", request_id = %request_id, path = %path);

        let request = TransportRequest::post(path, body)
            .bearer(key)
            .request_id(request_id);
        let input = self
            .transport
            .open_stream(request)
            .instrument(span.clone())
            .await?;

        Ok(EventStream::spawn_in_span::<E>(
            input,
            self.stream_buffer,
            span,
        ))
    }

    pub(crate) fn check_authentication(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(Error::request_with_context(
                "Missing API key",
                ErrorContext::new()
                    .with_field("config.api_key")
                    .with_hint("set MISTRAL_API_KEY or call MistralClientBuilder::api_key"),
            )),
        }
    }

    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: TransportRequest) -> Result<T> {
        let key = self.check_authentication()?;
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("request", request_id = %request_id, path = %request.path);

        let response = self
            .transport
            .send(request.bearer(key).request_id(request_id))
            .instrument(span)
            .await?;

        if !response.is_success() {
            return Err(Error::from_response(response.status, &response.body));
        }
        serde_json::from_slice(&response.body).map_err(|e| {
            debug!(status = response.status, error = %e, "response body did not decode");
            Error::Decode {
                status: response.status,
                message: e.to_string(),
            }
        })
    }
}
