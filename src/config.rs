//! Ambient configuration: environment-driven defaults recognized by the
//! orchestrator (spec §6 "Exposed" configuration table). Loaded via plain
//! `env::var` parsing layered over `.env`, matching the teacher's own
//! `GatewayConfig::from_env` loader style rather than a generic config
//! builder.

use std::env;

/// Process-wide defaults; per-request `LlmOptions` fields override these
/// where the spec allows it (spec §6).
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub default_max_retries: u32,
    pub default_retry_delay_ms: u64,
    pub cache_embeddings: bool,
    pub chat_cache_ttl_secs: u64,
    pub embedding_cache_ttl_secs: u64,

    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_base_url: Option<String>,
}

/// An environment variable carried a value that failed to parse as its
/// target type.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid value for {key}: {message}")]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_max_retries: 3,
            default_retry_delay_ms: 1_000,
            cache_embeddings: true,
            chat_cache_ttl_secs: 3_600,
            embedding_cache_ttl_secs: 86_400,
            openai_api_key: None,
            openai_base_url: None,
            anthropic_api_key: None,
            anthropic_base_url: None,
        }
    }
}

impl OrchestratorConfig {
    /// Loads configuration from `.env` (if present) and the process
    /// environment, falling back to [`Default`] values for anything unset
    /// (spec §6: `LLM_DEFAULT_MAX_RETRIES`, `LLM_DEFAULT_RETRY_DELAY_MS`,
    /// `CACHE_EMBEDDINGS`, per-provider credentials).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Ok(Self {
            default_max_retries: parse_env("LLM_DEFAULT_MAX_RETRIES", defaults.default_max_retries)?,
            default_retry_delay_ms: parse_env(
                "LLM_DEFAULT_RETRY_DELAY_MS",
                defaults.default_retry_delay_ms,
            )?,
            cache_embeddings: parse_env("CACHE_EMBEDDINGS", defaults.cache_embeddings)?,
            chat_cache_ttl_secs: parse_env("LLM_CHAT_CACHE_TTL_SECS", defaults.chat_cache_ttl_secs)?,
            embedding_cache_ttl_secs: parse_env(
                "LLM_EMBEDDING_CACHE_TTL_SECS",
                defaults.embedding_cache_ttl_secs,
            )?,
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_base_url: env::var("OPENAI_BASE_URL").ok(),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),
            anthropic_base_url: env::var("ANTHROPIC_BASE_URL").ok(),
        })
    }
}

fn parse_env<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError {
            key,
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
