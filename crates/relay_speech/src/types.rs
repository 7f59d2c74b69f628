//! Speech relay types

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One of exactly two podcast speakers
///
/// Serde enforces the boundary contract: anything but `"A"` or `"B"` fails
/// deserialization before any upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    A,
    B,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// Synthesized audio returned by the relay
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// Raw audio bytes from the synthesis service
    pub data: Bytes,
    /// MIME type of the audio
    pub mime: &'static str,
}

impl SynthesizedAudio {
    /// MP3 audio as delivered by the synthesis service
    pub const fn mp3(data: Bytes) -> Self {
        Self {
            data,
            mime: "audio/mpeg",
        }
    }
}
