//! Anthropic provider (spec §4.5), grounded on the teacher's
//! `core/providers/anthropic/*` client but narrowed to chat dispatch (the
//! spec's reference catalog has no Anthropic embedding model).

use super::LlmProvider;
use crate::error::{map_http_status, OrchestratorError, Result};
use crate::types::{
    Capability, ChatResponse, EmbeddingResponse, FinishReason, ProviderChatRequest,
    ProviderEmbeddingRequest, RequestValidation, ResponseMetadata, Role, ToolCall, Usage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const PROVIDER_NAME: &str = "anthropic";

static CAPABILITIES: &[Capability] = &[
    Capability::Chat,
    Capability::Streaming,
    Capability::ToolCalling,
    Capability::Vision,
    Capability::ComplexReasoning,
];

/// HTTP-backed reference implementation of [`LlmProvider`] for Anthropic.
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    known_models: Vec<String>,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            known_models: vec![
                "claude-3-5-sonnet-20241022".to_string(),
                "claude-3-haiku-20240307".to_string(),
            ],
        }
    }

    async fn map_error_response(&self, response: reqwest::Response) -> OrchestratorError {
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        map_http_status(PROVIDER_NAME, status, body, retry_after)
    }

    fn map_transport_error(&self, error: reqwest::Error) -> OrchestratorError {
        if error.is_timeout() {
            OrchestratorError::TimeoutError {
                provider: PROVIDER_NAME.to_string(),
            }
        } else {
            OrchestratorError::NetworkError {
                provider: PROVIDER_NAME.to_string(),
                message: error.to_string(),
            }
        }
    }
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct AnthropicChatRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
}

#[derive(Deserialize)]
struct AnthropicChatResponse {
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text { text: String },
    ToolUse { id: String, name: String, input: serde_json::Value },
}

#[derive(Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

fn finish_reason_from_str(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("max_tokens") => FinishReason::Length,
        Some("tool_use") => FinishReason::ToolCalls,
        Some("stop_sequence") | Some("end_turn") | None => FinishReason::Stop,
        Some(_) => FinishReason::Stop,
    }
}

/// Anthropic takes the system prompt as a top-level field rather than a
/// message in the array — the opposite hoisting direction from OpenAI
/// (spec §4.5 "translate the unified ChatMessage[] into vendor shape").
fn split_system_and_messages(
    request: &ProviderChatRequest,
) -> (Option<String>, Vec<AnthropicMessage>) {
    let mut system = request.system_prompt.clone();
    let mut messages = Vec::with_capacity(request.messages.len());

    for message in &request.messages {
        match message.role {
            Role::System => {
                let text = message.content.as_text();
                system = Some(match system {
                    Some(existing) => format!("{existing}\n{text}"),
                    None => text,
                });
            }
            Role::User => messages.push(AnthropicMessage {
                role: "user",
                content: message.content.as_text(),
            }),
            Role::Assistant => messages.push(AnthropicMessage {
                role: "assistant",
                content: message.content.as_text(),
            }),
            Role::Tool => messages.push(AnthropicMessage {
                role: "user",
                content: message.content.as_text(),
            }),
        }
    }

    (system, messages)
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    async fn initialize(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(OrchestratorError::AuthError {
                provider: PROVIDER_NAME.to_string(),
                message: "missing Anthropic API key".to_string(),
            });
        }
        Ok(())
    }

    async fn dispose(&self) {}

    async fn is_available(&self) -> bool {
        self.http
            .get(format!("{}/models", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send()
            .await
            .map(|response| response.status().is_success())
            .unwrap_or(false)
    }

    fn list_models(&self) -> Vec<String> {
        self.known_models.clone()
    }

    fn validate_request(&self, request: &ProviderChatRequest) -> RequestValidation {
        let mut errors = Vec::new();
        let warnings = Vec::new();

        if request.messages.is_empty() {
            errors.push("messages must not be empty".to_string());
        }
        if request.max_tokens.is_none() {
            errors.push("max_tokens is required by the Anthropic messages API".to_string());
        }

        RequestValidation {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    async fn chat(&self, request: ProviderChatRequest) -> Result<ChatResponse> {
        let started = Instant::now();
        let model = request.model.clone();
        let (system, messages) = split_system_and_messages(&request);

        let body = AnthropicChatRequest {
            model: model.clone(),
            messages,
            max_tokens: request.max_tokens.unwrap_or(1024),
            system,
            temperature: request.temperature,
            top_p: request.top_p,
            stop_sequences: request.stop,
            tools: request.tools,
        };

        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(self.map_error_response(response).await);
        }

        let parsed: AnthropicChatResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let mut content = String::new();
        let mut tool_calls = Vec::new();
        for block in parsed.content {
            match block {
                AnthropicContentBlock::Text { text } => content.push_str(&text),
                AnthropicContentBlock::ToolUse { id, name, input } => {
                    tool_calls.push(ToolCall {
                        id,
                        name,
                        arguments: input,
                    });
                }
            }
        }

        Ok(ChatResponse {
            content,
            finish_reason: finish_reason_from_str(parsed.stop_reason.as_deref()),
            tool_calls: if tool_calls.is_empty() { None } else { Some(tool_calls) },
            usage: Usage {
                prompt_tokens: parsed.usage.input_tokens,
                completion_tokens: parsed.usage.output_tokens,
                total_tokens: parsed.usage.input_tokens + parsed.usage.output_tokens,
            },
            metadata: ResponseMetadata {
                model,
                provider: PROVIDER_NAME.to_string(),
                processing_time_ms: started.elapsed().as_millis() as u64,
                cached: false,
            },
        })
    }

    async fn embed(&self, _request: ProviderEmbeddingRequest) -> Result<EmbeddingResponse> {
        Err(OrchestratorError::ProviderError {
            provider: PROVIDER_NAME.to_string(),
            message: "Anthropic does not expose an embeddings endpoint".to_string(),
            retryable: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ProviderChatRequest {
        ProviderChatRequest {
            model: "claude-3-haiku-20240307".to_string(),
            messages: vec![ChatMessage::user("Hello")],
            temperature: None,
            max_tokens: Some(256),
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            stop: None,
            tools: None,
            system_prompt: None,
            json_mode: None,
        }
    }

    #[tokio::test]
    async fn chat_success_concatenates_text_blocks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{"type": "text", "text": "Hi there"}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 4, "output_tokens": 2}
            })))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::with_base_url("test-key", server.uri());
        let response = provider.chat(request()).await.unwrap();

        assert_eq!(response.content, "Hi there");
        assert_eq!(response.usage.total_tokens, 6);
    }

    #[tokio::test]
    async fn server_error_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::with_base_url("test-key", server.uri());
        let error = provider.chat(request()).await.unwrap_err();
        assert!(error.is_retryable());
    }

    #[test]
    fn embed_is_unsupported() {
        let provider = AnthropicProvider::new("test-key");
        let result = futures::executor::block_on(provider.embed(ProviderEmbeddingRequest {
            model: "claude-3-haiku-20240307".to_string(),
            input: vec!["hi".to_string()],
        }));
        assert!(result.is_err());
    }
}
