//! Configuration for the completion relay

use secrecy::SecretString;
use serde::Deserialize;

/// Configuration for the upstream completion service
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    /// Base URL of the completion API, without the endpoint path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for the upstream service
    ///
    /// Required at startup; a missing key fails `validate()`, never a
    /// per-request call.
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature used when the client does not supply one
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Token limit used when the client does not supply one
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// System prompt prepended when a request carries no system message
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_base_url() -> String {
    "https://api.skolegpt.dk/v1".to_string()
}

fn default_model() -> String {
    "skolegpt-v3".to_string()
}

const fn default_temperature() -> f32 {
    0.9
}

const fn default_max_tokens() -> u32 {
    180
}

const fn default_timeout_ms() -> u64 {
    60000 // 60 seconds
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
            system_prompt: None,
        }
    }
}

impl CompletionConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or out of range.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_none() {
            return Err("Completion API key is required".to_string());
        }

        if self.base_url.trim().is_empty() {
            return Err("Completion base URL must not be empty".to_string());
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }

        if self.max_tokens == 0 {
            return Err("Max tokens must be greater than 0".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Create a minimal config for testing
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            api_key: Some(SecretString::from("test-key")),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = CompletionConfig::default();
        assert_eq!(config.base_url, "https://api.skolegpt.dk/v1");
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "skolegpt-v3");
        assert!((config.temperature - 0.9).abs() < 0.01);
        assert_eq!(config.max_tokens, 180);
        assert_eq!(config.timeout_ms, 60000);
        assert!(config.system_prompt.is_none());
    }

    #[test]
    fn validate_fails_without_api_key() {
        let config = CompletionConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_succeeds_with_api_key() {
        let config = CompletionConfig::test();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_fails_with_empty_base_url() {
        let mut config = CompletionConfig::test();
        config.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_fails_with_out_of_range_temperature() {
        let mut config = CompletionConfig::test();
        config.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_fails_with_zero_max_tokens() {
        let mut config = CompletionConfig::test();
        config.max_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_fails_with_zero_timeout() {
        let mut config = CompletionConfig::test();
        config.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml = r#"
            base_url = "http://localhost:8080/v1"
            api_key = "sk-test"
            model = "skolegpt-v2"
            temperature = 0.7
            max_tokens = 140
            timeout_ms = 30000
            system_prompt = "Svar altid på dansk."
        "#;

        let config: CompletionConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert!(config.api_key.is_some());
        assert_eq!(config.model, "skolegpt-v2");
        assert!((config.temperature - 0.7).abs() < 0.01);
        assert_eq!(config.max_tokens, 140);
        assert_eq!(config.timeout_ms, 30000);
        assert_eq!(config.system_prompt.as_deref(), Some("Svar altid på dansk."));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: CompletionConfig = toml::from_str("").unwrap();
        assert_eq!(config.base_url, "https://api.skolegpt.dk/v1");
        assert_eq!(config.timeout_ms, 60000);
    }

    #[test]
    fn debug_does_not_leak_api_key() {
        let config = CompletionConfig::test();
        let debug = format!("{config:?}");
        assert!(!debug.contains("test-key"));
    }
}
