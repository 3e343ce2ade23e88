//! Local/on-prem provider (spec §4.6 "preferredProvider: local/on-prem when
//! privacy is restricted"). Dependency-free: no HTTP client, no network
//! calls, so a `restricted`-privacy request is reachable end-to-end in a
//! test or example environment with no vendor credentials at all.

use super::{ChatStream, LlmProvider};
use crate::error::{OrchestratorError, Result};
use crate::types::{
    Capability, ChatChunk, ChatResponse, EmbeddingResponse, FinishReason, ProviderChatRequest,
    ProviderEmbeddingRequest, RequestValidation, ResponseMetadata, Usage,
};
use async_trait::async_trait;

const PROVIDER_NAME: &str = "local";

static CAPABILITIES: &[Capability] = &[Capability::Chat, Capability::CodeGeneration];

/// A stand-in for a self-hosted inference server. Rather than calling out
/// over the network, it echoes a deterministic response derived from the
/// request so the orchestrator's dispatch/cache/retry machinery can be
/// exercised without a real on-prem deployment.
#[derive(Debug, Clone, Default)]
pub struct LocalProvider {
    known_models: Vec<String>,
}

impl LocalProvider {
    pub fn new() -> Self {
        Self {
            known_models: vec!["on-prem-llama-3".to_string()],
        }
    }
}

#[async_trait]
impl LlmProvider for LocalProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn dispose(&self) {}

    async fn is_available(&self) -> bool {
        true
    }

    fn list_models(&self) -> Vec<String> {
        self.known_models.clone()
    }

    fn validate_request(&self, request: &ProviderChatRequest) -> RequestValidation {
        let mut errors = Vec::new();
        if request.messages.is_empty() {
            errors.push("messages must not be empty".to_string());
        }
        RequestValidation {
            is_valid: errors.is_empty(),
            errors,
            warnings: Vec::new(),
        }
    }

    async fn chat(&self, request: ProviderChatRequest) -> Result<ChatResponse> {
        if !self.known_models.contains(&request.model) {
            return Err(OrchestratorError::ModelNotFound { model: request.model });
        }

        let last_user_text = request
            .messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, crate::types::Role::User))
            .map(|m| m.content.as_text())
            .unwrap_or_default();

        let prompt_tokens = (last_user_text.chars().count() as u32 / 4).max(1);
        let completion_tokens = prompt_tokens;

        Ok(ChatResponse {
            content: format!("[local model response to: {last_user_text}]"),
            finish_reason: FinishReason::Stop,
            tool_calls: None,
            usage: Usage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
            metadata: ResponseMetadata {
                model: request.model,
                provider: PROVIDER_NAME.to_string(),
                processing_time_ms: 1,
                cached: false,
            },
        })
    }

    /// Streams the same deterministic echo `chat` would return, one word at
    /// a time, so the streaming pipeline (spec §9) is exercisable without a
    /// real on-prem deployment. The stream is lazily built: nothing is
    /// computed before the first `poll_next`.
    async fn stream_chat(&self, request: ProviderChatRequest) -> Result<ChatStream> {
        if !self.known_models.contains(&request.model) {
            return Err(OrchestratorError::ModelNotFound { model: request.model });
        }

        let last_user_text = request
            .messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, crate::types::Role::User))
            .map(|m| m.content.as_text())
            .unwrap_or_default();

        let id = uuid::Uuid::new_v4().to_string();
        let words: Vec<String> = format!("[local model response to: {last_user_text}]")
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let stream = async_stream::try_stream! {
            let word_count = words.len();
            for (i, word) in words.into_iter().enumerate() {
                let is_last = i + 1 == word_count;
                yield ChatChunk {
                    id: id.clone(),
                    delta: format!("{word} "),
                    content: if is_last { Some(format!("{word} ")) } else { None },
                    finish_reason: if is_last { Some(FinishReason::Stop) } else { None },
                    usage: if is_last {
                        Some(Usage {
                            prompt_tokens: word_count as u32,
                            completion_tokens: word_count as u32,
                            total_tokens: (word_count * 2) as u32,
                        })
                    } else {
                        None
                    },
                };
            }
        };

        Ok(Box::pin(stream))
    }

    async fn embed(&self, request: ProviderEmbeddingRequest) -> Result<EmbeddingResponse> {
        let embeddings = request
            .input
            .iter()
            .map(|text| {
                let mut vector = vec![0.0f32; 8];
                for (i, byte) in text.bytes().enumerate() {
                    vector[i % vector.len()] += byte as f32 / 255.0;
                }
                vector
            })
            .collect();

        Ok(EmbeddingResponse {
            embeddings,
            usage: Usage {
                prompt_tokens: request.input.iter().map(|s| s.len() as u32 / 4).sum(),
                completion_tokens: 0,
                total_tokens: request.input.iter().map(|s| s.len() as u32 / 4).sum(),
            },
            metadata: ResponseMetadata {
                model: request.model,
                provider: PROVIDER_NAME.to_string(),
                processing_time_ms: 1,
                cached: false,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    #[tokio::test]
    async fn chat_echoes_deterministic_response() {
        let provider = LocalProvider::new();
        let request = ProviderChatRequest {
            model: "on-prem-llama-3".to_string(),
            messages: vec![ChatMessage::user("ping")],
            temperature: None,
            max_tokens: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            stop: None,
            tools: None,
            system_prompt: None,
            json_mode: None,
        };
        let response = provider.chat(request).await.unwrap();
        assert!(response.content.contains("ping"));
        assert_eq!(response.metadata.provider, "local");
    }

    #[tokio::test]
    async fn stream_chat_yields_a_final_chunk_with_usage_and_finish_reason() {
        use futures::StreamExt;

        let provider = LocalProvider::new();
        let request = ProviderChatRequest {
            model: "on-prem-llama-3".to_string(),
            messages: vec![ChatMessage::user("ping pong")],
            temperature: None,
            max_tokens: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            stop: None,
            tools: None,
            system_prompt: None,
            json_mode: None,
        };

        let mut stream = provider.stream_chat(request).await.unwrap();
        let mut chunks = Vec::new();
        while let Some(chunk) = stream.next().await {
            chunks.push(chunk.unwrap());
        }

        assert!(!chunks.is_empty());
        let last = chunks.last().unwrap();
        assert_eq!(last.finish_reason, Some(FinishReason::Stop));
        assert!(last.usage.is_some());
        assert!(chunks[..chunks.len() - 1]
            .iter()
            .all(|c| c.finish_reason.is_none()));
    }

    #[tokio::test]
    async fn chat_rejects_unknown_model() {
        let provider = LocalProvider::new();
        let request = ProviderChatRequest {
            model: "not-a-real-model".to_string(),
            messages: vec![ChatMessage::user("ping")],
            temperature: None,
            max_tokens: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            stop: None,
            tools: None,
            system_prompt: None,
            json_mode: None,
        };
        let result = provider.chat(request).await;
        assert!(matches!(result, Err(OrchestratorError::ModelNotFound { .. })));
    }
}
