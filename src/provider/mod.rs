//! Provider abstraction (spec §4.5, component C4): the uniform contract
//! every backend implements, grounded on the teacher's `LLMProvider` trait
//! and its single unified provider error type.

pub mod anthropic;
pub mod local;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use local::LocalProvider;
pub use openai::OpenAiProvider;

use crate::error::{OrchestratorError, Result};
use crate::types::{
    Capability, ChatChunk, ChatResponse, EmbeddingResponse, ProviderChatRequest,
    ProviderEmbeddingRequest, RequestValidation,
};
use async_trait::async_trait;
use futures::Stream;
use std::fmt::Debug;
use std::pin::Pin;

/// A lazy, single-consumer, cancellable sequence of streamed chat chunks
/// (spec §9 "Streaming as a lazy finite sequence").
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatChunk>> + Send>>;

/// Uniform contract every backend (OpenAI, Anthropic, local, …) implements
/// (spec §4.5). Every fallible operation already resolves to the unified
/// [`OrchestratorError`] taxonomy — each provider owns its own error
/// mapping, so the orchestrator never inspects vendor error shapes.
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug + 'static {
    /// Stable provider identifier, e.g. `"openai"`.
    fn name(&self) -> &'static str;

    /// Static descriptor of what this provider supports.
    fn capabilities(&self) -> &'static [Capability];

    /// Validates credentials/configuration and readies the client. May be
    /// offline (format checks only).
    async fn initialize(&self) -> Result<()>;

    /// Releases held resources (connection pools, background tasks).
    async fn dispose(&self);

    /// Cheap health probe; never used to gate correctness, only routing.
    async fn is_available(&self) -> bool;

    /// Model ids this provider knows about. May be static.
    fn list_models(&self) -> Vec<String>;

    /// Pre-dispatch validation (spec §4.5 `validateRequest`).
    fn validate_request(&self, request: &ProviderChatRequest) -> RequestValidation;

    /// Synchronous-style chat completion.
    async fn chat(&self, request: ProviderChatRequest) -> Result<ChatResponse>;

    /// Streaming chat completion. Providers that cannot stream return
    /// `UnsupportedOperation`-shaped errors through their own mapping (the
    /// default here reports it via `ProviderError`).
    async fn stream_chat(&self, request: ProviderChatRequest) -> Result<ChatStream> {
        let _ = request;
        Err(OrchestratorError::ProviderError {
            provider: self.name().to_string(),
            message: "streaming is not supported by this provider".to_string(),
            retryable: false,
        })
    }

    /// Embeds one or more inputs.
    async fn embed(&self, request: ProviderEmbeddingRequest) -> Result<EmbeddingResponse>;

    /// Sequential fan-out over `requests`. Providers with a native batch
    /// endpoint may override this; the default satisfies the optional
    /// `processBatch` operation of spec §4.5 without one.
    async fn process_batch(&self, requests: Vec<ProviderChatRequest>) -> Vec<Result<ChatResponse>> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.chat(request).await);
        }
        results
    }
}
