//! API error handling
//!
//! Maps relay failures onto the HTTP response contract: every failure kind
//! produces a JSON body with an error message and a stable code; nothing is
//! silently swallowed.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use relay_core::RelayError;
use relay_speech::SpeechError;
use serde::Serialize;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Upstream answered with its own error status, passed through
    #[error("Upstream returned status {status}")]
    UpstreamStatus { status: u16, detail: String },

    /// Upstream unreachable or failed in transit
    #[error("Upstream error: {0}")]
    UpstreamUnavailable(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Empty completion from upstream")]
    EmptyCompletion,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Stable error code
    pub code: String,
    /// Additional diagnostics, e.g. a truncated upstream body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// HTTP status for this error
    ///
    /// An upstream error status is passed through when it is itself an error
    /// status; everything upstream-shaped otherwise maps to 502.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamStatus { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::UpstreamUnavailable(_) | Self::StreamInterrupted(_) | Self::EmptyCompletion => {
                StatusCode::BAD_GATEWAY
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::UpstreamStatus { .. } | Self::UpstreamUnavailable(_) => "upstream_error",
            Self::StreamInterrupted(_) => "stream_interrupted",
            Self::EmptyCompletion => "empty_completion",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code().to_string();

        let (message, details) = match self {
            Self::UpstreamStatus { status, detail } => (
                format!("Upstream returned status {status}"),
                (!detail.is_empty()).then_some(detail),
            ),
            other => (other.to_string(), None),
        };

        let body = ErrorResponse {
            error: message,
            code,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::InvalidRequest(msg) => Self::BadRequest(msg),
            RelayError::UpstreamStatus { status, detail } => {
                Self::UpstreamStatus { status, detail }
            },
            RelayError::ConnectionFailed(msg) | RelayError::UpstreamTransport(msg) => {
                Self::UpstreamUnavailable(msg)
            },
            RelayError::Timeout(ms) => {
                Self::UpstreamUnavailable(format!("upstream timeout after {ms}ms"))
            },
            RelayError::StreamInterrupted(msg) => Self::StreamInterrupted(msg),
            RelayError::EmptyCompletion => Self::EmptyCompletion,
        }
    }
}

impl From<SpeechError> for ApiError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::InvalidText(msg) => Self::BadRequest(msg),
            SpeechError::Configuration(msg) => Self::Internal(msg),
            SpeechError::UpstreamStatus { status, detail } => {
                Self::UpstreamStatus { status, detail }
            },
            SpeechError::ConnectionFailed(msg) | SpeechError::RequestFailed(msg) => {
                Self::UpstreamUnavailable(msg)
            },
            SpeechError::Timeout(ms) => {
                Self::UpstreamUnavailable(format!("synthesis timeout after {ms}ms"))
            },
        }
    }
}
