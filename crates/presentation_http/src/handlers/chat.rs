//! Chat handlers
//!
//! Both handlers take the same request body. The buffered variant returns the
//! full answer as JSON; the streaming variant returns SSE with one event per
//! fragment. A failure after streaming has begun is reported in-band and the
//! stream is still closed with the `[DONE]` sentinel, never an abrupt socket
//! close.

use std::{convert::Infallible, time::Duration};

use axum::{
    Json,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use relay_core::{ChatMessage, CompletionRequest};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::{error::ApiError, state::AppState};

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages, in order
    pub messages: Vec<ChatMessage>,
    /// Optional sampling temperature override
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Optional token limit override
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Build the relay request, injecting the configured system prompt when
    /// the conversation has none
    fn into_completion_request(self, state: &AppState) -> CompletionRequest {
        let mut request = CompletionRequest {
            messages: self.messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        if let Some(prompt) = &state.config.completion.system_prompt {
            request.ensure_system_prompt(prompt);
        }
        request
    }
}

/// Chat response body
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Aggregated assistant answer
    pub text: String,
}

/// Handle a buffered chat request
#[instrument(skip(state, request), fields(message_count = request.messages.len()))]
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = request.into_completion_request(&state);
    let text = state.completion.collect(request).await?;
    Ok(Json(ChatResponse { text }))
}

/// Handle a streaming chat request via SSE
///
/// Errors before the first upstream byte map to HTTP statuses as usual; once
/// the stream is underway they become an in-band `{"error": ...}` event.
#[instrument(skip(state, request), fields(message_count = request.messages.len()))]
pub async fn chat_stream(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let request = request.into_completion_request(&state);
    let deltas = state.completion.stream(request).await?;

    let stream = deltas
        .map(|item| match item {
            Ok(delta) => Event::default().data(serde_json::json!({ "delta": delta }).to_string()),
            Err(err) => {
                warn!(error = %err, "completion stream failed mid-flight");
                Event::default().data(serde_json::json!({ "error": err.to_string() }).to_string())
            },
        })
        .chain(stream::once(async { Event::default().data("[DONE]") }))
        .map(Ok::<_, Infallible>);

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}
