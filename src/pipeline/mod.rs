//! # Streaming Pipeline
//!
//! Incremental decoding of `data:`-framed event streams into typed values.
//!
//! ## Pipeline Stages
//!
//! ```text
//! Raw Bytes → Controller (carry buffer) → Frame Splitter → Sentinel check → Event Decoder
//!    │               │                          │                │                │
//!  HTTP body    UTF-8 + held-over        `data:` payloads     `[DONE]`     T / error envelope /
//!  chunks       partial frame                                              malformed / incomplete
//! ```
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`split_frames`] | Pure splitter: carry + chunk → candidate payloads |
//! | [`decode_event`] | Payload → [`DecodedEvent`] |
//! | [`StreamController`] | Synchronous per-stream state machine owning the carry buffer |
//! | [`EventStream`] | Task-driven, cancellable `Stream<Item = Result<T>>` for consumers |
//!
//! ## Example
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use futures::StreamExt;
//! use mistral_client::pipeline::{EventStream, DEFAULT_STREAM_BUFFER};
//! use mistral_client::types::{ApiErrorResponse, ChatStreamResponse};
//!
//! # async fn run() -> mistral_client::Result<()> {
//! let body = futures::stream::iter(vec![
//!     Bytes::from_static(b"data: {\"id\":\"1\",\"model\":\"m\",\"choices\":[]}\n\n"),
//!     Bytes::from_static(b"data: [DONE]\n\n"),
//! ])
//! .map(Ok::<Bytes, mistral_client::Error>);
//! let mut events = EventStream::<ChatStreamResponse>::spawn::<ApiErrorResponse>(
//!     Box::pin(body),
//!     DEFAULT_STREAM_BUFFER,
//! );
//! while let Some(chunk) = events.next().await {
//!     println!("{}", chunk?.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod decode;
pub mod frame;
pub mod session;


pub use controller::{ChunkResult, StreamController, StreamOutcome, StreamState};
pub use decode::{decode_event, DecodedEvent, ErrorEnvelope};
pub use frame::{split_frames, SplitFrames, DATA_PREFIX, DONE_SIGNAL};
pub use session::{CancelHandle, EventStream, DEFAULT_STREAM_BUFFER};
