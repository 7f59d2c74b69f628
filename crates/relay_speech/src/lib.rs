//! Relay Speech - speech-synthesis relay
//!
//! Forwards `{speaker, text}` requests to an ElevenLabs-compatible
//! text-to-speech service and returns the binary audio unchanged.

pub mod config;
pub mod elevenlabs;
pub mod error;
pub mod ports;
pub mod types;

pub use config::SpeechConfig;
pub use elevenlabs::ElevenLabsClient;
pub use error::SpeechError;
pub use ports::SpeechPort;
pub use types::{Speaker, SynthesizedAudio};
