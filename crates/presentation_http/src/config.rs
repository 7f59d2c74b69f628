//! Application configuration
//!
//! Aggregates the relay configs with the HTTP server settings. Loaded once at
//! startup, validated once, and shared read-only for the process lifetime; a
//! missing required field is a fatal configuration error, never a per-request
//! error.

use relay_core::CompletionConfig;
use relay_speech::SpeechConfig;
use serde::Deserialize;

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS origins; empty means allow any (development mode)
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Graceful shutdown window in seconds
    #[serde(default)]
    pub shutdown_timeout_secs: Option<u64>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
            shutdown_timeout_secs: None,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion relay configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Speech relay configuration
    #[serde(default)]
    pub speech: SpeechConfig,
}

impl AppConfig {
    /// Load configuration from defaults, optional `config` file, and
    /// environment variables with the `KLARTALE` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(Self::environment());

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Environment source: `KLARTALE_<SECTION>__<FIELD>`
    ///
    /// The nesting separator is doubled so field names that themselves
    /// contain underscores (`api_key`, `voice_a`, `max_tokens`) stay
    /// addressable, e.g. `KLARTALE_COMPLETION__API_KEY`.
    fn environment() -> config::Environment {
        config::Environment::with_prefix("KLARTALE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Validate the full configuration
    ///
    /// # Errors
    ///
    /// Returns the first missing or out-of-range field, prefixed with the
    /// section it belongs to.
    pub fn validate(&self) -> Result<(), String> {
        self.completion
            .validate()
            .map_err(|e| format!("completion: {e}"))?;
        self.speech.validate().map_err(|e| format!("speech: {e}"))?;
        Ok(())
    }
}
