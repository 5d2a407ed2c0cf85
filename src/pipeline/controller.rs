//! Per-stream decoding state machine.

use super::decode::{decode_event, DecodedEvent, ErrorEnvelope};
use super::frame::{is_done, split_frames};
use crate::Error;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::debug;

/// Lifecycle of one event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Streaming,
    Completed,
    Failed,
    Cancelled,
}

impl StreamState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StreamState::Completed | StreamState::Failed | StreamState::Cancelled
        )
    }
}

/// How a stream ended.
#[derive(Debug)]
pub enum StreamOutcome {
    Completed,
    Failed(Error),
    Cancelled,
}

impl StreamOutcome {
    pub fn state(&self) -> StreamState {
        match self {
            StreamOutcome::Completed => StreamState::Completed,
            StreamOutcome::Failed(_) => StreamState::Failed,
            StreamOutcome::Cancelled => StreamState::Cancelled,
        }
    }
}

/// What one read produced: values in order, then the terminal outcome if the
/// read ended the stream.
#[derive(Debug)]
pub struct ChunkResult<T> {
    pub values: Vec<T>,
    pub outcome: Option<StreamOutcome>,
}

impl<T> ChunkResult<T> {
    fn empty() -> Self {
        Self {
            values: Vec::new(),
            outcome: None,
        }
    }

    fn ended(values: Vec<T>, outcome: Option<StreamOutcome>) -> Self {
        Self { values, outcome }
    }
}

/// Owns the carry buffer of one stream and turns reads into values.
///
/// Synchronous and transport-agnostic: the async driver feeds it chunks and
/// end-of-body/failure signals. Once a terminal state is reached every further
/// call is a no-op, so the outcome is produced exactly once.
pub struct StreamController<T, E> {
    carry: String,
    /// Trailing bytes of a UTF-8 sequence split across reads
    pending: Vec<u8>,
    /// Why the carried frame failed to decode on its last attempt
    carry_error: Option<String>,
    state: StreamState,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<T, E> Default for StreamController<T, E>
where
    T: DeserializeOwned,
    E: ErrorEnvelope,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> StreamController<T, E>
where
    T: DeserializeOwned,
    E: ErrorEnvelope,
{
    pub fn new() -> Self {
        Self {
            carry: String::new(),
            pending: Vec::new(),
            carry_error: None,
            state: StreamState::Idle,
            _marker: PhantomData,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Partial frame held over from the previous read.
    pub fn carry(&self) -> &str {
        &self.carry
    }

    /// Process one read from the transport.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> ChunkResult<T> {
        if self.state.is_terminal() {
            return ChunkResult::empty();
        }
        self.state = StreamState::Streaming;

        let text = match self.take_text(chunk) {
            Ok(text) => text,
            Err(err) => return ChunkResult::ended(Vec::new(), self.fail(err)),
        };

        let carry = std::mem::take(&mut self.carry);
        self.carry_error = None;
        let frames = split_frames(&carry, &text);

        let last = frames.candidates.len() - 1;
        let mut values = Vec::new();
        for (idx, payload) in frames.candidates.iter().enumerate() {
            // Nothing after the sentinel is decoded, in this read or any later one.
            if is_done(payload) {
                debug!(frame = idx, "stream sentinel received");
                self.carry.clear();
                let outcome = self.terminate(StreamOutcome::Completed);
                return ChunkResult::ended(values, outcome);
            }
            if payload.is_empty() {
                if idx == last {
                    self.carry = frames.remainder.clone();
                }
                continue;
            }

            match decode_event::<T, E>(payload, idx == last) {
                DecodedEvent::Value(value) => values.push(value),
                DecodedEvent::ApiError(envelope) => {
                    let outcome = self.fail(envelope.into_error());
                    return ChunkResult::ended(values, outcome);
                }
                DecodedEvent::Malformed(reason) => {
                    let outcome = self.fail(Error::MalformedFrame {
                        payload: payload.clone(),
                        reason,
                    });
                    return ChunkResult::ended(values, outcome);
                }
                DecodedEvent::Incomplete(reason) => {
                    debug!(bytes = payload.len(), "frame cut by chunk boundary, rebuffering");
                    self.carry = frames.remainder.clone();
                    self.carry_error = Some(reason);
                }
            }
        }

        ChunkResult::ended(values, None)
    }

    /// The transport reported a clean end of body.
    pub fn finish(&mut self) -> Option<StreamOutcome> {
        if self.state.is_terminal() {
            return None;
        }
        if !self.pending.is_empty() {
            let err = Error::UnsupportedEncoding(format!(
                "stream ended inside a UTF-8 sequence ({} dangling bytes)",
                self.pending.len()
            ));
            return self.fail(err);
        }

        let carry = std::mem::take(&mut self.carry);
        let frames = split_frames(&carry, "");
        if frames.all_blank() {
            return self.terminate(StreamOutcome::Completed);
        }

        let payload = frames
            .candidates
            .into_iter()
            .rev()
            .find(|c| !c.is_empty())
            .unwrap_or_default();
        let reason = match self.carry_error.take() {
            Some(err) => format!("stream ended inside a frame: {}", err),
            None => "stream ended inside a frame".to_string(),
        };
        self.fail(Error::MalformedFrame { payload, reason })
    }

    /// The transport failed, or decoding hit a fatal condition.
    pub fn fail(&mut self, err: Error) -> Option<StreamOutcome> {
        self.terminate(StreamOutcome::Failed(err))
    }

    /// The consumer gave up on the stream.
    pub fn cancel(&mut self) -> Option<StreamOutcome> {
        self.terminate(StreamOutcome::Cancelled)
    }

    fn terminate(&mut self, outcome: StreamOutcome) -> Option<StreamOutcome> {
        if self.state.is_terminal() {
            return None;
        }
        self.state = outcome.state();
        self.carry.clear();
        self.carry_error = None;
        self.pending.clear();
        Some(outcome)
    }

    fn take_text(&mut self, chunk: &[u8]) -> Result<String, Error> {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(err) => {
                let utf8 = err.utf8_error();
                if utf8.error_len().is_some() {
                    return Err(Error::UnsupportedEncoding(format!(
                        "invalid UTF-8 in stream chunk: {}",
                        utf8
                    )));
                }
                // Incomplete sequence at the very end: keep it for the next read.
                let valid = utf8.valid_up_to();
                let mut bytes = err.into_bytes();
                self.pending = bytes.split_off(valid);
                String::from_utf8(bytes)
                    .map_err(|e| Error::UnsupportedEncoding(e.utf8_error().to_string()))
            }
        }
    }
}
