//! Configuration for the speech relay

use secrecy::SecretString;
use serde::Deserialize;

use crate::types::Speaker;

/// Configuration for the ElevenLabs-compatible synthesis service
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// API key for the synthesis service
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Base URL of the synthesis API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Voice identifier for speaker A
    #[serde(default)]
    pub voice_a: Option<String>,

    /// Voice identifier for speaker B
    #[serde(default)]
    pub voice_b: Option<String>,

    /// Synthesis model identifier
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Output format query parameter
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Voice stability (0.0 - 1.0)
    #[serde(default = "default_stability")]
    pub stability: f32,

    /// Voice similarity boost (0.0 - 1.0)
    #[serde(default = "default_similarity_boost")]
    pub similarity_boost: f32,

    /// Voice style exaggeration (0.0 - 1.0)
    #[serde(default = "default_style")]
    pub style: f32,

    /// Whether to enable speaker boost
    #[serde(default = "default_use_speaker_boost")]
    pub use_speaker_boost: bool,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://api.elevenlabs.io/v1".to_string()
}

fn default_model_id() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_output_format() -> String {
    "mp3_44100_128".to_string()
}

const fn default_stability() -> f32 {
    0.35
}

const fn default_similarity_boost() -> f32 {
    0.75
}

const fn default_style() -> f32 {
    0.35
}

const fn default_use_speaker_boost() -> bool {
    true
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            voice_a: None,
            voice_b: None,
            model_id: default_model_id(),
            output_format: default_output_format(),
            stability: default_stability(),
            similarity_boost: default_similarity_boost(),
            style: default_style(),
            use_speaker_boost: default_use_speaker_boost(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SpeechConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or out of range.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_none() {
            return Err("Synthesis API key is required".to_string());
        }

        if self.voice_a.is_none() || self.voice_b.is_none() {
            return Err("Voice identifiers for both speakers are required".to_string());
        }

        for (name, value) in [
            ("stability", self.stability),
            ("similarity_boost", self.similarity_boost),
            ("style", self.style),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must be between 0.0 and 1.0, got {value}"));
            }
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Voice identifier for a speaker, if configured
    pub fn voice_id(&self, speaker: Speaker) -> Option<&str> {
        match speaker {
            Speaker::A => self.voice_a.as_deref(),
            Speaker::B => self.voice_b.as_deref(),
        }
    }

    /// Create a minimal config for testing
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            api_key: Some(SecretString::from("test-key")),
            voice_a: Some("voice-a".to_string()),
            voice_b: Some("voice-b".to_string()),
            ..Default::default()
        }
    }
}
