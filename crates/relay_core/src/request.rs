//! Client-facing request types

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A single message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// A validated request for one relay session
///
/// Immutable once validated; owned by its session and discarded with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Messages in the conversation, in order
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature (falls back to the configured default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Token limit (falls back to the configured default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Create a simple single-turn request
    pub fn simple(user_message: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::user(user_message)],
            temperature: None,
            max_tokens: None,
        }
    }

    /// Create a request with a system prompt
    pub fn with_system(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the temperature
    pub const fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set the token limit
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Whether any message carries the system role
    pub fn has_system_message(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.role == MessageRole::System)
    }

    /// Prepend a system message if none is present
    pub fn ensure_system_prompt(&mut self, prompt: &str) {
        if !self.has_system_message() {
            self.messages.insert(0, ChatMessage::system(prompt));
        }
    }

    /// Check structural shape before any upstream call
    ///
    /// # Errors
    ///
    /// Returns `RelayError::InvalidRequest` if `messages` is empty or any
    /// message content is blank.
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.messages.is_empty() {
            return Err(RelayError::InvalidRequest(
                "messages must not be empty".to_string(),
            ));
        }

        if self.messages.iter().any(|m| m.content.trim().is_empty()) {
            return Err(RelayError::InvalidRequest(
                "message content must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
