//! OpenAI provider (spec §4.5), grounded on the teacher's
//! `core/providers/openai/{client,provider}.rs` but narrowed to the chat
//! and embedding surface this orchestrator dispatches against.

use super::LlmProvider;
use crate::error::{map_http_status, OrchestratorError, Result};
use crate::types::{
    Capability, ChatResponse, EmbeddingResponse, FinishReason, ProviderChatRequest,
    ProviderEmbeddingRequest, RequestValidation, ResponseMetadata, Role, ToolCall, Usage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const PROVIDER_NAME: &str = "openai";

static CAPABILITIES: &[Capability] = &[
    Capability::Chat,
    Capability::Streaming,
    Capability::ToolCalling,
    Capability::FunctionCalling,
    Capability::JsonMode,
    Capability::Vision,
    Capability::Embedding,
];

/// HTTP-backed reference implementation of [`LlmProvider`] for OpenAI.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    known_models: Vec<String>,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            known_models: vec![
                "gpt-4o".to_string(),
                "gpt-4o-mini".to_string(),
                "text-embedding-3-small".to_string(),
            ],
        }
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Maps a non-2xx OpenAI HTTP response into the unified taxonomy,
    /// consulting `Retry-After` when present (spec §9 canonical mapping).
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
struct OpenAiMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunctionCall,
}

#[derive(Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Serialize)]
struct OpenAiEmbeddingRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingDatum>,
    usage: OpenAiEmbeddingUsage,
}

#[derive(Deserialize)]
struct OpenAiEmbeddingDatum {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct OpenAiEmbeddingUsage {
    prompt_tokens: u32,
    total_tokens: u32,
}

fn finish_reason_from_str(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("length") => FinishReason::Length,
        Some("tool_calls") => FinishReason::ToolCalls,
        Some("content_filter") => FinishReason::ContentFilter,
        _ => FinishReason::Stop,
    }
}

/// Hoists system messages to the front and translates roles, per the
/// provider adaptation rules of spec §4.5.
fn build_messages(request: &ProviderChatRequest) -> Vec<OpenAiMessage> {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(system_prompt) = &request.system_prompt {
        messages.push(OpenAiMessage {
            role: "system",
            content: system_prompt.clone(),
        });
    }
    for message in &request.messages {
        let role = match message.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        };
        messages.push(OpenAiMessage {
            role,
            content: message.content.as_text(),
        });
    }
    messages
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
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
                message: "missing OpenAI API key".to_string(),
            });
        }
        Ok(())
    }

    async fn dispose(&self) {}

    async fn is_available(&self) -> bool {
        self.http
            .get(format!("{}/models", self.base_url))
            .header("Authorization", self.auth_header())
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
        let mut warnings = Vec::new();

        if request.messages.is_empty() {
            errors.push("messages must not be empty".to_string());
        }
        if let Some(temperature) = request.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                errors.push("temperature must be within [0.0, 2.0]".to_string());
            }
        }
        if request.tools.is_some() && request.json_mode == Some(true) {
            warnings.push("tools and json_mode are rarely combined".to_string());
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

        let body = OpenAiChatRequest {
            model: model.clone(),
            messages: build_messages(&request),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
            frequency_penalty: request.frequency_penalty,
            presence_penalty: request.presence_penalty,
            stop: request.stop,
            tools: request.tools,
            response_format: request
                .json_mode
                .filter(|on| *on)
                .map(|_| serde_json::json!({"type": "json_object"})),
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", self.auth_header())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(self.map_error_response(response).await);
        }

        let parsed: OpenAiChatResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            OrchestratorError::ProviderError {
                provider: PROVIDER_NAME.to_string(),
                message: "response carried no choices".to_string(),
                retryable: false,
            }
        })?;

        let tool_calls = choice.message.tool_calls.map(|calls| {
            calls
                .into_iter()
                .map(|call| {
                    let arguments = serde_json::from_str(&call.function.arguments)
                        .unwrap_or(serde_json::Value::Null);
                    ToolCall {
                        id: call.id,
                        name: call.function.name,
                        arguments,
                    }
                })
                .collect()
        });

        let usage = parsed
            .usage
            .map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: finish_reason_from_str(choice.finish_reason.as_deref()),
            tool_calls,
            usage,
            metadata: ResponseMetadata {
                model,
                provider: PROVIDER_NAME.to_string(),
                processing_time_ms: started.elapsed().as_millis() as u64,
                cached: false,
            },
        })
    }

    async fn embed(&self, request: ProviderEmbeddingRequest) -> Result<EmbeddingResponse> {
        let started = Instant::now();
        let model = request.model.clone();

        let body = OpenAiEmbeddingRequest {
            model: model.clone(),
            input: request.input,
        };

        let response = self
            .http
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", self.auth_header())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(self.map_error_response(response).await);
        }

        let parsed: OpenAiEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        Ok(EmbeddingResponse {
            embeddings: parsed.data.into_iter().map(|d| d.embedding).collect(),
            usage: Usage {
                prompt_tokens: parsed.usage.prompt_tokens,
                completion_tokens: 0,
                total_tokens: parsed.usage.total_tokens,
            },
            metadata: ResponseMetadata {
                model,
                provider: PROVIDER_NAME.to_string(),
                processing_time_ms: started.elapsed().as_millis() as u64,
                cached: false,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ProviderChatRequest {
        ProviderChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("Hello")],
            temperature: None,
            max_tokens: None,
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
    async fn chat_success_parses_content_and_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": {"content": "Hi there", "tool_calls": null},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 5, "completion_tokens": 3, "total_tokens": 8}
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::with_base_url("test-key", server.uri());
        let response = provider.chat(request()).await.unwrap();

        assert_eq!(response.content, "Hi there");
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage.total_tokens, 8);
        assert_eq!(response.metadata.provider, "openai");
    }

    #[tokio::test]
    async fn rate_limit_maps_to_retryable_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "2")
                    .set_body_string("slow down"),
            )
            .mount(&server)
            .await;

        let provider = OpenAiProvider::with_base_url("test-key", server.uri());
        let error = provider.chat(request()).await.unwrap_err();

        assert!(error.is_retryable());
        assert_eq!(error.retry_after_seconds(), Some(2));
    }

    #[tokio::test]
    async fn auth_error_maps_to_non_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::with_base_url("test-key", server.uri());
        let error = provider.chat(request()).await.unwrap_err();

        assert!(!error.is_retryable());
        assert!(matches!(error, OrchestratorError::AuthError { .. }));
    }

    #[test]
    fn initialize_rejects_empty_api_key() {
        let provider = OpenAiProvider::new("");
        let result = futures::executor::block_on(provider.initialize());
        assert!(matches!(result, Err(OrchestratorError::AuthError { .. })));
    }
}
