//! Async driver: one task per stream, a bounded channel to the consumer.

use super::controller::{ChunkResult, StreamController, StreamOutcome, StreamState};
use super::decode::ErrorEnvelope;
use crate::transport::TransportError;
use crate::{BoxStream, Error, Result};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{warn, Instrument, Span};

/// Default capacity of the channel between the driving task and the consumer.
pub const DEFAULT_STREAM_BUFFER: usize = 32;

enum StreamItem<T> {
    Value(T),
    Done(StreamOutcome),
}

/// Requests cancellation of an [`EventStream`] from anywhere.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Stop the stream. The transport is dropped at the driving task's next
    /// await point; the consumer yields nothing further.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Single-pass, cancellable sequence of decoded events.
///
/// Yields `Ok(value)` in frame order, then either ends (`None`) or yields one
/// `Err` and ends. Dropping the stream cancels it.
pub struct EventStream<T> {
    rx: mpsc::Receiver<StreamItem<T>>,
    cancel: CancelHandle,
    state: StreamState,
}

impl<T> EventStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Decode `input` on a new task, logging under the current span.
    pub fn spawn<E: ErrorEnvelope>(input: BoxStream<'static, Bytes>, buffer: usize) -> Self {
        Self::spawn_in_span::<E>(input, buffer, Span::current())
    }

    /// Decode `input` on a new task instrumented with `span`.
    pub fn spawn_in_span<E: ErrorEnvelope>(
        input: BoxStream<'static, Bytes>,
        buffer: usize,
        span: Span,
    ) -> Self {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let cancel = CancelHandle::new();
        let token = cancel.token.clone();
        tokio::spawn(drive::<T, E>(input, tx, token).instrument(span));
        Self {
            rx,
            cancel,
            state: StreamState::Idle,
        }
    }
}

impl<T> EventStream<T> {
    /// State as observed by the consumer.
    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}

impl<T> Unpin for EventStream<T> {}

impl<T> Stream for EventStream<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.state.is_terminal() {
            return Poll::Ready(None);
        }
        if this.cancel.is_cancelled() {
            this.state = StreamState::Cancelled;
            return Poll::Ready(None);
        }

        match this.rx.poll_recv(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(StreamItem::Value(value))) => {
                this.state = StreamState::Streaming;
                Poll::Ready(Some(Ok(value)))
            }
            Poll::Ready(Some(StreamItem::Done(outcome))) => {
                this.state = outcome.state();
                match outcome {
                    StreamOutcome::Failed(err) => Poll::Ready(Some(Err(err))),
                    StreamOutcome::Completed | StreamOutcome::Cancelled => Poll::Ready(None),
                }
            }
            Poll::Ready(None) => {
                // The driver always sends an outcome unless cancelled, so a bare
                // close means it was cancelled or panicked.
                if this.cancel.is_cancelled() {
                    this.state = StreamState::Cancelled;
                    Poll::Ready(None)
                } else {
                    this.state = StreamState::Failed;
                    Poll::Ready(Some(Err(Error::Transport(TransportError::Other(
                        "stream task ended without an outcome".to_string(),
                    )))))
                }
            }
        }
    }
}

impl<T> Drop for EventStream<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn drive<T, E>(
    mut input: BoxStream<'static, Bytes>,
    tx: mpsc::Sender<StreamItem<T>>,
    token: CancellationToken,
) where
    T: DeserializeOwned + Send + 'static,
    E: ErrorEnvelope,
{
    let mut controller = StreamController::<T, E>::new();

    let outcome = loop {
        let next = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            next = input.next() => Some(next),
        };
        let Some(next) = next else {
            break controller.cancel();
        };

        let step: ChunkResult<T> = match next {
            Some(Ok(chunk)) => controller.push_chunk(&chunk),
            Some(Err(err)) => ChunkResult {
                values: Vec::new(),
                outcome: controller.fail(err),
            },
            None => ChunkResult {
                values: Vec::new(),
                outcome: controller.finish(),
            },
        };

        let mut delivered = true;
        for value in step.values {
            if !deliver(&tx, &token, StreamItem::Value(value)).await {
                delivered = false;
                break;
            }
        }
        if !delivered {
            break controller.cancel();
        }
        if let Some(outcome) = step.outcome {
            break Some(outcome);
        }
    };

    // Release the connection before handing over the outcome.
    drop(input);

    match outcome {
        Some(StreamOutcome::Failed(err)) => {
            warn!(error = %err, "event stream failed");
            deliver(&tx, &token, StreamItem::Done(StreamOutcome::Failed(err))).await;
        }
        Some(StreamOutcome::Completed) => {
            deliver(&tx, &token, StreamItem::Done(StreamOutcome::Completed)).await;
        }
        Some(StreamOutcome::Cancelled) | None => {}
    }
}

/// Send unless the stream is cancelled or the consumer is gone.
async fn deliver<T>(
    tx: &mpsc::Sender<StreamItem<T>>,
    token: &CancellationToken,
    item: StreamItem<T>,
) -> bool {
    tokio::select! {
        biased;
        _ = token.cancelled() => false,
        sent = tx.send(item) => sent.is_ok(),
    }
}
