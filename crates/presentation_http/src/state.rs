//! Application state shared across handlers

use std::sync::Arc;

use relay_core::CompletionPort;
use relay_speech::SpeechPort;

use crate::config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Completion relay for chat handling
    pub completion: Arc<dyn CompletionPort>,
    /// Speech relay for synthesis handling
    pub speech: Arc<dyn SpeechPort>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}
