//! Speech relay errors
//!
//! Transport failures are triaged in the client, where the configured
//! timeout is known, so the timeout variant reports the real deadline.

use thiserror::Error;

/// Errors that can occur while relaying a synthesis request
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Empty or blank synthesis text; no upstream call is made
    #[error("Invalid text: {0}")]
    InvalidText(String),

    /// Failed to connect to the synthesis service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the synthesis service failed in transit
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Timeout while waiting on the synthesis service
    #[error("Synthesis timeout after {0}ms")]
    Timeout(u64),

    /// Synthesis service answered with a non-success status
    #[error("Synthesis service returned status {status}: {detail}")]
    UpstreamStatus {
        /// HTTP status code from the synthesis service
        status: u16,
        /// Upstream response body, truncated
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_message() {
        let err = SpeechError::Configuration("missing voice".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing voice");
    }

    #[test]
    fn invalid_text_error_message() {
        let err = SpeechError::InvalidText("text must not be empty".to_string());
        assert_eq!(err.to_string(), "Invalid text: text must not be empty");
    }

    #[test]
    fn upstream_status_error_message() {
        let err = SpeechError::UpstreamStatus {
            status: 401,
            detail: "bad key".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Synthesis service returned status 401: bad key"
        );
    }
}
