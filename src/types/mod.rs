//! # Types Module
//!
//! Request and response payloads exchanged with the Mistral API.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ChatRequest`] | Chat completion request (one-shot or streamed) |
//! | [`ChatResponse`] | One-shot chat completion |
//! | [`ChatStreamResponse`] | One streamed chunk of a chat completion |
//! | [`Message`] | Chat message with role, text and tool calls |
//! | [`Tool`] | Function definition offered to the model |
//! | [`ApiErrorResponse`] | Structured error envelope returned by the API |
//!
//! ## Example
//!
//! ```rust
//! use mistral_client::types::{ChatRequest, Message};
//!
//! let request = ChatRequest::new(
//!     "mistral-large-latest",
//!     vec![
//!         Message::system("You are a terse assistant."),
//!         Message::user("Name a prime number."),
//!     ],
//! )
//! .temperature(0.2)
//! .stream(true);
//!
//! assert_eq!(request.stream, Some(true));
//! ```

pub mod chat;
pub mod embeddings;
pub mod envelope;
pub mod message;
pub mod models;
pub mod tool;

pub use chat::{
    ChatRequest, ChatResponse, ChatStreamResponse, Choice, FinishReason, ResponseFormat,
    StreamChoice, ToolChoice, Usage,
};
pub use embeddings::{Embedding, EmbeddingsRequest, EmbeddingsResponse, EmbeddingsUsage};
pub use envelope::{ApiErrorDetail, ApiErrorResponse};
pub use message::{Message, Role};
pub use models::{ModelListResponse, ModelResponse};
pub use tool::{FunctionCall, Tool, ToolCall, ToolFunction};
