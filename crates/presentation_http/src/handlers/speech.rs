//! Speech synthesis handler

use axum::{Json, extract::State};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use relay_speech::Speaker;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Synthesis request body
///
/// `speaker` only accepts `"A"` or `"B"`; anything else fails deserialization
/// before the handler runs.
#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    /// Which podcast voice to use
    pub speaker: Speaker,
    /// Text to synthesize
    pub text: String,
}

/// Synthesis response body
#[derive(Debug, Serialize)]
pub struct SpeechResponse {
    /// Base64-encoded audio bytes
    pub base64: String,
    /// MIME type of the encoded audio
    pub mime: String,
}

/// Handle a synthesis request
#[instrument(skip(state, request), fields(speaker = %request.speaker, text_len = request.text.len()))]
pub async fn synthesize(
    State(state): State<AppState>,
    Json(request): Json<SpeechRequest>,
) -> Result<Json<SpeechResponse>, ApiError> {
    let audio = state
        .speech
        .synthesize(request.speaker, &request.text)
        .await?;

    Ok(Json(SpeechResponse {
        base64: STANDARD.encode(&audio.data),
        mime: audio.mime.to_string(),
    }))
}
