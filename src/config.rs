//! Runtime configuration resolved from the environment.
//!
//! Only this module reads environment variables. The resolved values are
//! passed explicitly to `GeminiClientBuilder`.

use thiserror::Error;

use crate::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable overriding the model name.
pub const MODEL_VAR: &str = "GEMINI_MODEL";
/// Environment variable overriding the API host.
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";

/// Errors raised while resolving configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `GEMINI_API_KEY` is unset or blank.
    #[error("GEMINI_API_KEY environment variable not set. Please check your environment configuration.")]
    MissingApiKey,
}

/// Settings for talking to the model service.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    /// Loads `.env` if present, then resolves settings from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingApiKey` if `GEMINI_API_KEY` is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // a missing .env file is fine
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingApiKey` if no API key is available.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Config {
            api_key: get(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?,
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}
