//! Event decoding (payload -> typed value)

use crate::Error;
use serde::de::DeserializeOwned;

/// Structured error body a streaming endpoint may send in place of a value.
pub trait ErrorEnvelope: DeserializeOwned + Send + 'static {
    fn into_error(self) -> Error;
}

/// Result of decoding one candidate payload.
#[derive(Debug)]
pub enum DecodedEvent<T, E> {
    Value(T),
    ApiError(E),
    /// A complete frame that is neither `T` nor `E`; carries the decode error.
    Malformed(String),
    /// Presumed cut off by the chunk boundary; retry with the next read.
    /// Carries the decode error in case the stream ends before the frame does.
    Incomplete(String),
}

/// Decode a trimmed, non-sentinel payload.
///
/// When neither `T` nor `E` match, position decides: a payload followed by
/// another frame in the same read is complete and therefore malformed, while
/// the last payload of a read may simply be truncated. Framing carries no
/// lengths, so a genuinely malformed last frame is indistinguishable from a
/// truncated one; it surfaces only when the stream ends with it still
/// buffered, or once a later read shows it was followed by another frame.
pub fn decode_event<T, E>(payload: &str, is_last: bool) -> DecodedEvent<T, E>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    match serde_json::from_str::<T>(payload) {
        Ok(value) => DecodedEvent::Value(value),
        Err(err) => match serde_json::from_str::<E>(payload) {
            Ok(envelope) => DecodedEvent::ApiError(envelope),
            Err(_) if is_last => DecodedEvent::Incomplete(err.to_string()),
            Err(_) => DecodedEvent::Malformed(err.to_string()),
        },
    }
}
