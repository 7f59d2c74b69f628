//! Relay errors
//!
//! Transport failures are triaged where the configuration is known (the
//! client), so a timeout error always reports the configured deadline.

use thiserror::Error;

/// Errors that can occur while relaying a completion
#[derive(Debug, Error)]
pub enum RelayError {
    /// Malformed or missing client input; no upstream call is made
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream answered with a non-success status
    #[error("Upstream returned status {status}: {detail}")]
    UpstreamStatus {
        /// HTTP status code from the upstream service
        status: u16,
        /// Upstream response body, truncated
        detail: String,
    },

    /// Failed to connect to the upstream service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the upstream service failed in transit
    #[error("Upstream request failed: {0}")]
    UpstreamTransport(String),

    /// Timeout while waiting on the upstream service
    #[error("Upstream timeout after {0}ms")]
    Timeout(u64),

    /// Upstream connection dropped or errored mid-stream
    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    /// A well-formed stream yielded no usable text
    #[error("Upstream produced no completion text")]
    EmptyCompletion,
}
