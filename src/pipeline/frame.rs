//! Frame splitting for `data:`-delimited event streams.

/// Literal marker introducing every event frame.
pub const DATA_PREFIX: &str = "data:";

/// Frame content that ends the stream.
pub const DONE_SIGNAL: &str = "[DONE]";

/// Candidate payloads found in one read, in stream order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitFrames {
    /// Trimmed payloads, marker stripped. May contain empty strings.
    pub candidates: Vec<String>,
    /// Text of the final segment starting at its marker. Unframed text gets
    /// the marker prepended to its trimmed payload. This is what gets carried
    /// into the next read if the last candidate turns out to be truncated.
    pub remainder: String,
}

impl SplitFrames {
    /// Whether every candidate is empty after trimming (or there are none).
    pub fn all_blank(&self) -> bool {
        self.candidates.iter().all(|c| c.is_empty())
    }
}

/// Split `carry` + `chunk` into candidate payloads.
///
/// Frames are delimited by the marker alone: every occurrence of `data:` starts
/// a new frame, whether or not a newline precedes it. Text before the first
/// marker is preamble and is dropped. Text with no marker at all comes back as
/// a single candidate, presumed to be the tail of a frame. Completeness is not
/// judged here; a trailing partial frame is returned like any other candidate.
///
/// With no length prefix and no escaping, a payload whose JSON string content
/// contains the literal `data:` is cut in two at that point. Both halves then
/// fail to decode and the stream ends with a malformed frame.
pub fn split_frames(carry: &str, chunk: &str) -> SplitFrames {
    let mut text = String::with_capacity(carry.len() + chunk.len());
    text.push_str(carry);
    text.push_str(chunk);

    let starts: Vec<usize> = text.match_indices(DATA_PREFIX).map(|(idx, _)| idx).collect();
    let Some(&last_start) = starts.last() else {
        let payload = text.trim().to_string();
        let remainder = if payload.is_empty() {
            String::new()
        } else {
            format!("{} {}", DATA_PREFIX, payload)
        };
        return SplitFrames {
            candidates: vec![payload],
            remainder,
        };
    };

    let candidates = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            text[start + DATA_PREFIX.len()..end].trim().to_string()
        })
        .collect();

    SplitFrames {
        candidates,
        remainder: text[last_start..].to_string(),
    }
}

/// Whether a trimmed candidate is the end-of-stream sentinel.
pub fn is_done(candidate: &str) -> bool {
    candidate == DONE_SIGNAL
}
