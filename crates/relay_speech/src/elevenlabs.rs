//! ElevenLabs synthesis client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::{
    config::SpeechConfig,
    error::SpeechError,
    ports::SpeechPort,
    types::{Speaker, SynthesizedAudio},
};

/// Upstream error bodies are carried for diagnostics but bounded in size
const MAX_DETAIL_BYTES: usize = 2048;

/// Client for an ElevenLabs-compatible text-to-speech API
#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    client: Client,
    config: SpeechConfig,
}

/// Wire-format synthesis request body
#[derive(Debug, Serialize)]
struct SynthesisBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

impl ElevenLabsClient {
    /// Create a new synthesis client
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn synthesis_url(&self, voice_id: &str) -> String {
        format!(
            "{}/text-to-speech/{voice_id}?output_format={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.output_format
        )
    }

    /// Triage a transport failure; the timeout variant carries the
    /// configured deadline
    fn map_send_error(&self, err: reqwest::Error) -> SpeechError {
        if err.is_timeout() {
            SpeechError::Timeout(self.config.timeout_ms)
        } else if err.is_connect() {
            SpeechError::ConnectionFailed(err.to_string())
        } else {
            SpeechError::RequestFailed(err.to_string())
        }
    }

    fn api_key(&self) -> &str {
        self.config
            .api_key
            .as_ref()
            .map(|k| k.expose_secret())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SpeechPort for ElevenLabsClient {
    #[instrument(skip(self, text), fields(speaker = %speaker, text_len = text.len()))]
    async fn synthesize(
        &self,
        speaker: Speaker,
        text: &str,
    ) -> Result<SynthesizedAudio, SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::InvalidText(
                "text must not be empty".to_string(),
            ));
        }

        let voice_id = self.config.voice_id(speaker).ok_or_else(|| {
            SpeechError::Configuration(format!("No voice configured for speaker {speaker}"))
        })?;

        let body = SynthesisBody {
            text,
            model_id: &self.config.model_id,
            voice_settings: VoiceSettings {
                stability: self.config.stability,
                similarity_boost: self.config.similarity_boost,
                style: self.config.style,
                use_speaker_boost: self.config.use_speaker_boost,
            },
        };

        debug!("Sending synthesis request");

        let response = self
            .client
            .post(self.synthesis_url(voice_id))
            .header("xi-api-key", self.api_key())
            .header(ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(status = %status, "Synthesis request failed");
            return Err(SpeechError::UpstreamStatus {
                status: status.as_u16(),
                detail: truncate_detail(&detail),
            });
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| SpeechError::RequestFailed(e.to_string()))?;

        debug!(audio_bytes = data.len(), "Synthesis complete");
        Ok(SynthesizedAudio::mp3(data))
    }
}

/// Bound a diagnostic body to `MAX_DETAIL_BYTES`, respecting char boundaries
fn truncate_detail(body: &str) -> String {
    if body.len() <= MAX_DETAIL_BYTES {
        return body.to_string();
    }
    let mut end = MAX_DETAIL_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}
