//! # mistral-client
//!
//! Async Rust client for the Mistral chat, embeddings and models API, built
//! around an incremental decoder for `data:`-framed event streams.
//!
//! ## Overview
//!
//! Streaming responses arrive as arbitrary byte chunks. The [`pipeline`]
//! reassembles them into frames, decodes each frame as either a typed value or
//! an API error envelope, and hands the results to the caller as a cancellable
//! [`EventStream`]. Values come out in frame order, followed by at most one
//! terminal error; after that the stream is done.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use mistral_client::types::{ChatRequest, Message};
//! use mistral_client::MistralClient;
//!
//! #[tokio::main]
//! async fn main() -> mistral_client::Result<()> {
//!     let client = MistralClient::builder().api_key("sk-...").build()?;
//!
//!     let request = ChatRequest::new(
//!         "mistral-large-latest",
//!         vec![Message::user("Hello, how are you?")],
//!     )
//!     .stream(true);
//!
//!     let mut stream = client.chat_completions_stream(&request).await?;
//!     while let Some(chunk) = stream.next().await {
//!         print!("{}", chunk?.delta_content().unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`MistralClient`], its builder and configuration |
//! | [`pipeline`] | Frame splitting, event decoding and the stream driver |
//! | [`transport`] | Transport trait and the reqwest implementation |
//! | [`types`] | Request and response payloads |
//! | [`error`] | Unified [`Error`] type |

pub mod client;
pub mod error;
pub mod pipeline;
pub mod transport;
pub mod types;

use futures::Stream;
use std::pin::Pin;

pub use crate::client::{ClientConfig, MistralClient, MistralClientBuilder};
pub use crate::error::{Error, ErrorContext};
pub use crate::pipeline::{CancelHandle, EventStream, StreamState};
pub use crate::types::{ChatRequest, ChatResponse, ChatStreamResponse, Message, Role};

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, Error>;

/// A boxed, pinned stream of results.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;
