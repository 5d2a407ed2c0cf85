use crate::transport::TransportError;
use crate::types::{ApiErrorDetail, ApiErrorResponse};
use serde::Deserialize;
use thiserror::Error;

/// Structured context attached to request and configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Request field or config key involved (e.g. "request.stream", "config.base_url")
    pub field: Option<String>,
    /// Actionable hint for the caller
    pub hint: Option<String>,
    /// Component that raised the error (e.g. "chat", "client_builder")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Unified error type for the client.
///
/// The first four variants are the stream-fatal kinds a consumer of an
/// [`EventStream`](crate::pipeline::EventStream) can observe; the rest come
/// from building and sending requests.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("API error: {0}")]
    Api(ApiErrorDetail),

    #[error("Malformed stream frame: {reason} (payload: {payload})")]
    MalformedFrame { payload: String, reason: String },

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Request error: {message}{}", format_context(.context))]
    Request {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Response error (Status {status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Decoding error (Status {status}): {message}")]
    Decode { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if let Some(ref hint) = ctx.hint {
        parts.push(format!("hint: {}", hint));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn request(msg: impl Into<String>) -> Self {
        Error::Request {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn request_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Request {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Build the error for a non-2xx response, taking the message from the
    /// error envelope when the body carries one.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        #[derive(Deserialize)]
        struct MessageBody {
            message: String,
        }

        let message = serde_json::from_slice::<ApiErrorResponse>(body)
            .map(|e| e.detail.msg)
            .or_else(|_| serde_json::from_slice::<MessageBody>(body).map(|b| b.message))
            .unwrap_or_else(|_| "Unknown response error".to_string());
        Error::Remote { status, message }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Request { context, .. } | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Whether re-issuing the same request could plausibly succeed.
    ///
    /// Streams never retry on their own; this is for callers that retry at the
    /// request level.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(TransportError::Http(e)) => e.is_timeout() || e.is_connect(),
            Error::Transport(TransportError::Other(_)) => false,
            Error::Remote { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Whether the error ended an event stream (as opposed to failing the request
    /// before any stream existed).
    pub fn is_stream_fatal(&self) -> bool {
        matches!(
            self,
            Error::Transport(_)
                | Error::Api(_)
                | Error::MalformedFrame { .. }
                | Error::UnsupportedEncoding(_)
        )
    }
}
