use std::fmt;

use thiserror::Error;

const DEFAULT_MODELS: &str = "gemini-1.5-flash,gemini-1.5-pro,gemini-pro";
const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Raised while the composition root is being assembled. Never raised per request.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Required environment variable '{0}' is not set")]
    MissingVar(&'static str),

    #[error("Environment variable '{key}' is invalid: {reason}")]
    InvalidVar { key: &'static str, reason: String },

    #[error("No model candidates configured (need at least one model and one API key)")]
    NoCandidates,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if no Gemini API key is available.
#[derive(Clone)]
pub struct Config {
    pub gemini_api_keys: Vec<String>,
    pub gemini_models: Vec<String>,
    pub gemini_api_url: String,
    pub llm_timeout_secs: u64,
    /// Optional: without it results are kept in process memory only.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("gemini_api_keys", &format!("[{} REDACTED]", self.gemini_api_keys.len()))
            .field("gemini_models", &self.gemini_models)
            .field("gemini_api_url", &self.gemini_api_url)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so parsing is testable
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut gemini_api_keys = lookup("GEMINI_API_KEYS")
            .map(|v| split_list(&v))
            .unwrap_or_default();
        if gemini_api_keys.is_empty() {
            gemini_api_keys = lookup("GEMINI_API_KEY")
                .map(|v| split_list(&v))
                .unwrap_or_default();
        }
        if gemini_api_keys.is_empty() {
            return Err(ConfigurationError::MissingVar("GEMINI_API_KEYS"));
        }

        let gemini_models = split_list(
            &lookup("GEMINI_MODELS").unwrap_or_else(|| DEFAULT_MODELS.to_string()),
        );
        if gemini_models.is_empty() {
            return Err(ConfigurationError::NoCandidates);
        }

        Ok(Config {
            gemini_api_keys,
            gemini_models,
            gemini_api_url: lookup("GEMINI_API_URL")
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string()),
            llm_timeout_secs: parse_or("LLM_TIMEOUT_SECS", lookup("LLM_TIMEOUT_SECS"), 30)?,
            database_url: lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()),
            port: parse_or("PORT", lookup("PORT"), 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigurationError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigurationError::InvalidVar {
                key,
                reason: e.to_string(),
            }),
    }
}
