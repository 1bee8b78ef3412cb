//! Gemini client configuration.

use crate::config::Configuration;

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the API, up to and including the version segment.
    pub base_url: String,
    /// Model to use.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl GeminiConfig {
    /// Default Gemini API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";
    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash-lite";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Creates a new configuration with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Builds the client configuration from the service settings.
    #[must_use]
    pub fn from_settings(settings: &Configuration) -> Self {
        let mut config = Self::new(settings.gemini_api_key.clone());
        if let Some(model) = &settings.gemini_model {
            config = config.with_model(model.clone());
        }
        if let Some(url) = &settings.gemini_base_url {
            config = config.with_base_url(url.clone());
        }
        config
    }

    /// Sets the base URL. A trailing slash is dropped.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.base_url = url.trim_end_matches('/').to_owned();
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            timeout_secs: Some(Self::DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = GeminiConfig::new("test-key");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, GeminiConfig::DEFAULT_BASE_URL);
        assert_eq!(config.model, GeminiConfig::DEFAULT_MODEL);
    }

    #[test]
    fn test_config_builder() {
        let config = GeminiConfig::new("key")
            .with_model("gemini-2.5-pro")
            .with_base_url("http://127.0.0.1:9000/v1beta/");

        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.base_url, "http://127.0.0.1:9000/v1beta");
        assert_eq!(config.timeout_secs, Some(GeminiConfig::DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_from_settings_overrides() {
        let settings = Configuration {
            gemini_api_key: "abc".to_owned(),
            gemini_model: Some("gemini-2.0-flash".to_owned()),
            ..Configuration::default()
        };
        let config = GeminiConfig::from_settings(&settings);
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.base_url, GeminiConfig::DEFAULT_BASE_URL);
    }
}
