//! Gateway configuration, supplied through process environment.

use crate::error::{GatewayError, GatewayResult};

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const MODEL_ENV: &str = "COURSEFORGE_MODEL";

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Configuration for the hosted model gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub base_url: String,
    /// Target model identifier; individual requests may override it.
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GatewayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 4096,
        }
    }

    /// Read the credential (and optional model override) from the
    /// environment.
    pub fn from_env() -> GatewayResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| GatewayError::MissingApiKey { env_var: API_KEY_ENV })?;
        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var(MODEL_ENV) {
            config.model = model;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = GatewayConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.max_tokens > 0);
    }

    #[test]
    fn builder_overrides() {
        let config = GatewayConfig::new("key")
            .with_base_url("http://localhost:9999")
            .with_model("test-model");
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.model, "test-model");
    }
}
