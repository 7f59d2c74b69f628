//! Upstream HTTP client
//!
//! One request per session, no retries, no pooling guarantees beyond what
//! reqwest provides. A failed call surfaces directly to the session.

use std::time::Duration;

use reqwest::{Client, Response, header::ACCEPT};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    config::CompletionConfig,
    error::RelayError,
    request::{ChatMessage, CompletionRequest},
};

/// Upstream error bodies are carried for diagnostics but bounded in size
const MAX_DETAIL_BYTES: usize = 2048;

/// Thin wrapper around the upstream chat-completions endpoint
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    config: CompletionConfig,
}

/// Wire-format request body for the upstream service
#[derive(Debug, Serialize)]
struct UpstreamChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

impl CompletionClient {
    /// Create a new client from validated configuration
    pub fn new(config: CompletionConfig) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| RelayError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub const fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Triage a transport failure; the timeout variant carries the
    /// configured deadline
    fn map_send_error(&self, err: reqwest::Error) -> RelayError {
        if err.is_timeout() {
            RelayError::Timeout(self.config.timeout_ms)
        } else if err.is_connect() {
            RelayError::ConnectionFailed(err.to_string())
        } else {
            RelayError::UpstreamTransport(err.to_string())
        }
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Issue the single upstream POST for one session
    ///
    /// `stream` selects the upstream dialect via the request body and the
    /// `Accept` header. A non-2xx answer is returned as `UpstreamStatus`
    /// with the body truncated; the credential never appears in the detail.
    pub async fn send(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<Response, RelayError> {
        let body = UpstreamChatRequest {
            model: &self.config.model,
            messages: &request.messages,
            temperature: request.temperature.unwrap_or(self.config.temperature),
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            stream,
        };

        let accept = if stream {
            "text/event-stream"
        } else {
            "application/json"
        };

        debug!(url = %self.chat_url(), stream, "Sending upstream completion request");

        let mut builder = self
            .client
            .post(self.chat_url())
            .header(ACCEPT, accept)
            .json(&body);

        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Upstream completion request failed");
            return Err(RelayError::UpstreamStatus {
                status: status.as_u16(),
                detail: truncate_detail(&body),
            });
        }

        Ok(response)
    }
}

/// Bound a diagnostic body to `MAX_DETAIL_BYTES`, respecting char boundaries
pub(crate) fn truncate_detail(body: &str) -> String {
    if body.len() <= MAX_DETAIL_BYTES {
        return body.to_string();
    }
    let mut end = MAX_DETAIL_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}
