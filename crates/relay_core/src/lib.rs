//! Relay Core - streaming completion relay
//!
//! Sits between a client and a remote chat-completion service: forwards the
//! request upstream, decodes the upstream event stream into text fragments,
//! and hands back either a live fragment stream or one aggregated answer.

pub mod client;
pub mod config;
pub mod decoder;
pub mod error;
pub mod extract;
pub mod ports;
pub mod request;
pub mod session;
pub mod transcript;

pub use client::CompletionClient;
pub use config::CompletionConfig;
pub use decoder::{Frame, FrameDecoder};
pub use error::RelayError;
pub use extract::extract_delta;
pub use ports::{CompletionPort, DeltaStream};
pub use request::{ChatMessage, CompletionRequest, MessageRole};
pub use session::CompletionRelay;
pub use transcript::Transcript;
