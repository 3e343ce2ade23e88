//! `LLMOptions` — the configuration bag callers pass alongside messages.

use super::requirements::{LatencyClass, PrivacyLevel, TaskComplexity, TaskType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration bag recognized by the orchestrator (spec §3 `LLMOptions`).
///
/// Every field is optional; callers typically set only what they need and
/// let the orchestrator infer the rest (§4.6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmOptions {
    // Generation
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
    pub stop: Option<Vec<String>>,
    pub stream: Option<bool>,
    pub tools: Option<Vec<serde_json::Value>>,
    pub system_prompt: Option<String>,
    pub json_mode: Option<bool>,

    // Routing
    pub task_type: Option<TaskType>,
    pub task_complexity: Option<TaskComplexity>,
    pub urgency: Option<LatencyClass>,
    pub privacy_level: Option<PrivacyLevel>,
    pub max_cost: Option<f64>,
    pub policy_weights: Option<HashMap<String, f64>>,

    // Caching
    pub use_cache: Option<bool>,
    pub cache_ttl: Option<u64>,

    // Retry
    pub max_retries: Option<u32>,
    pub retry_delay: Option<u64>,

    // Identity
    pub request_id: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl LlmOptions {
    /// `use_cache` defaults to `true` when unset (spec §3).
    pub fn cache_enabled(&self) -> bool {
        self.use_cache.unwrap_or(true)
    }

    /// Fields that materially affect model output — used to build the cache
    /// key's options hash (spec §4.2). Routing and identity fields are
    /// deliberately excluded.
    pub fn relevant_for_cache(&self) -> RelevantCacheOptions<'_> {
        RelevantCacheOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
            stop: self.stop.as_deref(),
            system_prompt: self.system_prompt.as_deref(),
            json_mode: self.json_mode,
        }
    }
}

/// The subset of [`LlmOptions`] that materially affects output, serialized
/// deterministically when building a cache key.
#[derive(Serialize)]
pub struct RelevantCacheOptions<'a> {
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    top_p: Option<f32>,
    frequency_penalty: Option<f32>,
    presence_penalty: Option<f32>,
    stop: Option<&'a [String]>,
    system_prompt: Option<&'a str>,
    json_mode: Option<bool>,
}
