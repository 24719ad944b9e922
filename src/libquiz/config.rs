use log::debug;
use std::env;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api-gateway.netdb.csie.ncku.edu.tw/api/chat";
pub const DEFAULT_MODEL: &str = "gemma3:4b";

const API_KEY_VAR: &str = "LLM_API_KEY";
const ENDPOINT_VAR: &str = "LLM_ENDPOINT";
const MODEL_VAR: &str = "LLM_MODEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LLM_API_KEY is not set. Export it or put it in an .env file.")]
    MissingApiKey,
}

/// Endpoint, model and credentials for the chat-completion service.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
}

impl Config {
    /// Builds the config from CLI overrides, falling back to environment
    /// variables (an `.env` file is honored) and built-in defaults.
    pub fn from_env(endpoint: Option<String>, model: Option<String>) -> Result<Config, ConfigError> {
        dotenv::dotenv().ok();
        let api_key = env::var(API_KEY_VAR).map_err(|_| ConfigError::MissingApiKey)?;
        let config = Config {
            endpoint: endpoint
                .or_else(|| env::var(ENDPOINT_VAR).ok())
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: model
                .or_else(|| env::var(MODEL_VAR).ok())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
        };
        debug!(
            "[Config] Using model '{}' at {}",
            config.model, config.endpoint
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_defaults() {
        env::set_var(API_KEY_VAR, "test-key");
        let config = Config::from_env(
            Some("http://localhost:11434/api/chat".to_string()),
            Some("mistral".to_string()),
        )
        .unwrap();
        assert_eq!(config.endpoint, "http://localhost:11434/api/chat");
        assert_eq!(config.model, "mistral");
        assert_eq!(config.api_key, "test-key");
    }
}
