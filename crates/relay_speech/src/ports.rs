//! Port definition for the speech relay

use async_trait::async_trait;

use crate::{error::SpeechError, types::{Speaker, SynthesizedAudio}};

/// Port for speech synthesis implementations
#[async_trait]
pub trait SpeechPort: Send + Sync {
    /// Synthesize one utterance in the given speaker's voice
    async fn synthesize(&self, speaker: Speaker, text: &str)
    -> Result<SynthesizedAudio, SpeechError>;
}
