//! Provider-facing request shapes built by the orchestrator before dispatch.

use super::message::ChatMessage;
use serde::{Deserialize, Serialize};

/// A chat request as handed to a provider's `chat`/`streamChat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
    pub stop: Option<Vec<String>>,
    pub tools: Option<Vec<serde_json::Value>>,
    pub system_prompt: Option<String>,
    pub json_mode: Option<bool>,
}

/// A request to embed one or more inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEmbeddingRequest {
    pub model: String,
    pub input: Vec<String>,
}
