//! Frame decoder for the upstream event stream
//!
//! Turns raw body bytes, delivered in arbitrarily sized chunks, into discrete
//! frames. The decoder owns a carry buffer for the trailing incomplete line,
//! so it works identically whether it is fed byte-by-byte or the entire
//! response in one chunk.

const FRAME_MARKER: &str = "data:";
const SENTINEL: &str = "[DONE]";

/// One decoded unit of the upstream event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Payload of a `data:` frame, still unparsed
    Data(String),
    /// Explicit end-of-stream sentinel
    Done,
    /// Non-conforming line; skipped, never an error
    Unrecognized,
}

/// Stateful line decoder with a carry buffer
///
/// After the sentinel has been seen, all further input is ignored.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    carry: Vec<u8>,
    done: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the explicit sentinel has been decoded
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Feed one chunk, returning every frame completed by it
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Frame> {
        if self.done {
            return Vec::new();
        }

        self.carry.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut consumed = 0;
        while let Some(offset) = self.carry[consumed..].iter().position(|&b| b == b'\n') {
            let end = consumed + offset;
            let line = &self.carry[consumed..end];
            consumed = end + 1;

            if let Some(frame) = classify_line(line) {
                let terminal = frame == Frame::Done;
                frames.push(frame);
                if terminal {
                    self.done = true;
                    self.carry.clear();
                    return frames;
                }
            }
        }

        self.carry.drain(..consumed);
        frames
    }

    /// Flush the trailing unterminated line at end of input
    ///
    /// End of input without a sentinel is an implicit terminal condition; the
    /// caller finalizes with whatever was collected.
    pub fn finish(&mut self) -> Vec<Frame> {
        if self.done || self.carry.is_empty() {
            return Vec::new();
        }

        let line = std::mem::take(&mut self.carry);
        self.done = true;
        classify_line(&line).into_iter().collect()
    }
}

/// Classify one complete line
///
/// Returns `None` for lines that produce no frame at all (a `data:` frame
/// with an empty payload).
fn classify_line(line: &[u8]) -> Option<Frame> {
    // A line never splits a multi-byte character, so lossy conversion only
    // degrades genuinely invalid input instead of aborting the stream.
    let text = String::from_utf8_lossy(line);
    let trimmed = text.trim();

    let Some(payload) = trimmed.strip_prefix(FRAME_MARKER) else {
        return Some(Frame::Unrecognized);
    };

    let payload = payload.trim();
    if payload == SENTINEL {
        return Some(Frame::Done);
    }
    if payload.is_empty() {
        return None;
    }

    Some(Frame::Data(payload.to_string()))
}
