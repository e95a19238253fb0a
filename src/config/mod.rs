//! Configuration loaded from the environment.
//!
//! A [`ParleyConfig`] is an explicit value passed to whoever constructs
//! model clients and agents. There is no process-wide default.

use std::collections::HashMap;
use std::time::Duration;

use crate::types::InferenceSettings;

/// Timeout applied to model calls when the settings leave it unset.
pub const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_secs(60);

/// API keys plus the default inference settings handed to new agents.
#[derive(Debug, Clone, Default)]
pub struct ParleyConfig {
    api_keys: HashMap<String, String>,
    settings: InferenceSettings,
}

impl ParleyConfig {
    /// Create an empty config with default settings.
    pub fn new() -> Self {
        Self {
            api_keys: HashMap::new(),
            settings: InferenceSettings::builder()
                .timeout(DEFAULT_INFERENCE_TIMEOUT)
                .build(),
        }
    }

    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore a missing .env
        let mut config = Self::new();

        let env_mappings = [
            ("GEMINI_API_KEY", "google"),
            ("GOOGLE_API_KEY", "google"),
            ("OPENAI_API_KEY", "openai"),
            ("ANTHROPIC_API_KEY", "anthropic"),
        ];

        for (env_var, provider) in &env_mappings {
            if let Ok(key) = std::env::var(env_var) {
                config.set_api_key(*provider, key);
            }
        }

        config
    }

    /// Store an API key for a provider.
    pub fn set_api_key(&mut self, provider: impl Into<String>, key: impl Into<String>) {
        self.api_keys.insert(provider.into(), key.into());
    }

    /// Look up an API key by provider name.
    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys.get(provider).map(|k| k.as_str())
    }

    /// Replace the default inference settings.
    pub fn with_settings(mut self, settings: InferenceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Default inference settings for new agents.
    pub fn settings(&self) -> InferenceSettings {
        self.settings.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_has_no_keys_and_a_default_timeout() {
        let config = ParleyConfig::new();
        assert_eq!(config.api_key("google"), None);
        assert_eq!(config.settings().timeout, Some(DEFAULT_INFERENCE_TIMEOUT));
    }

    #[test]
    fn set_and_get_api_key() {
        let mut config = ParleyConfig::new();
        config.set_api_key("google", "test-key");
        assert_eq!(config.api_key("google"), Some("test-key"));
        assert_eq!(config.api_key("openai"), None);
    }

    #[test]
    fn with_settings_replaces_defaults() {
        let settings = InferenceSettings::builder().temperature(0.1).build();
        let config = ParleyConfig::new().with_settings(settings.clone());
        assert_eq!(config.settings(), settings);
    }
}
