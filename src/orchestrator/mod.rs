//! Orchestrator (spec §4.6, component C8): the request entry point that
//! infers requirements, selects a model, checks the cache, dispatches to a
//! provider, retries, stores the cache, and logs the outcome.

mod requirements;
mod retry;

use crate::cache::{key, Cache, InMemoryCache};
use crate::config::OrchestratorConfig;
use crate::error::{OrchestratorError, Result};
use crate::provider::{ChatStream, LlmProvider};
use crate::registry::ModelRegistry;
use crate::selection::{default_policies, Scorer, Selector};
use crate::types::{
    ChatMessage, ChatResponse, EmbeddingResponse, LlmOptions, ModelMetadata, ProviderChatRequest,
    ProviderEmbeddingRequest, TaskType,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Owns the Registry, Cache, Selector, and the provider map exclusively
/// (spec §3 "Ownership"). Constructed fresh per test or process; nothing
/// here is a process-wide global.
pub struct Orchestrator {
    registry: ModelRegistry,
    cache: Arc<dyn Cache>,
    selector: Selector,
    providers: HashMap<String, Arc<dyn LlmProvider>>,
    config: OrchestratorConfig,
}

/// Builds an [`Orchestrator`] from a registry, a provider set, and
/// configuration — mirroring the teacher's `Router::new` plus explicit
/// `add_deployment` calls, but resolved once at construction time.
pub struct OrchestratorBuilder {
    registry: ModelRegistry,
    cache: Arc<dyn Cache>,
    policies: Vec<Box<dyn crate::selection::ScoringPolicy>>,
    providers: HashMap<String, Arc<dyn LlmProvider>>,
    config: OrchestratorConfig,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            registry: ModelRegistry::new(),
            cache: Arc::new(InMemoryCache::new()),
            policies: default_policies(),
            providers: HashMap::new(),
            config: OrchestratorConfig::default(),
        }
    }

    pub fn with_registry(mut self, registry: ModelRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.providers.insert(provider.name().to_string(), provider);
        self
    }

    pub fn build(self) -> Orchestrator {
        Orchestrator {
            registry: self.registry,
            cache: self.cache,
            selector: Selector::new(Scorer::new(self.policies)),
            providers: self.providers,
            config: self.config,
        }
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-call overrides distinct from the retryable/cacheable `LlmOptions`
/// fields: a cancellation signal (spec §5).
#[derive(Clone, Default)]
pub struct RequestContext {
    pub cancellation: CancellationToken,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// `chatCompletion(messages, options)` (spec §4.6).
    pub async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        options: LlmOptions,
        context: RequestContext,
    ) -> Result<ChatResponse> {
        let started = Instant::now();
        let requirements = requirements::infer_requirements(&messages, &options);
        let selected = self.select_model(&requirements, options.model.as_deref())?;

        let cache_key = chat_cache_key(&selected.id, &messages, &options);
        if options.cache_enabled() {
            if let Some(cached) = self.cache.get(&cache_key).await {
                if let Ok(mut response) = serde_json::from_value::<ChatResponse>(cached) {
                    response.metadata.cached = true;
                    self.log_outcome(&options, &selected, started, true, 1, None);
                    return Ok(response);
                }
            }
        }

        let provider = self.provider_for(&selected)?;
        let request = build_chat_request(&selected.id, &messages, &options);

        let max_retries = options.max_retries.unwrap_or(self.config.default_max_retries);
        let base_delay = Duration::from_millis(
            options.retry_delay.unwrap_or(self.config.default_retry_delay_ms),
        );

        let mut attempts = 0u32;
        let result = retry::with_retry(max_retries, base_delay, &context.cancellation, || {
            attempts += 1;
            let provider = Arc::clone(&provider);
            let request = request.clone();
            async move { provider.chat(request).await }
        })
        .await;

        match result {
            Ok(mut response) => {
                response.metadata.model = selected.id.clone();
                response.metadata.provider = selected.provider.clone();

                if options.cache_enabled() {
                    if let Ok(value) = serde_json::to_value(&response) {
                        self.cache
                            .set(
                                &cache_key,
                                value,
                                Some(Duration::from_secs(self.config.chat_cache_ttl_secs)),
                            )
                            .await;
                    }
                }

                self.log_outcome(&options, &selected, started, false, attempts, None);
                Ok(response)
            }
            Err(err) => {
                self.log_outcome(&options, &selected, started, false, attempts, Some(&err));
                Err(err)
            }
        }
    }

    /// `streamChatCompletion(messages, options)` (spec §4.6). Streaming is
    /// attempted once — no retry, no cache.
    pub async fn stream_chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        options: LlmOptions,
        _context: RequestContext,
    ) -> Result<ChatStream> {
        let requirements = requirements::infer_requirements(&messages, &options);
        let selected = self.select_model(&requirements, options.model.as_deref())?;
        let provider = self.provider_for(&selected)?;
        let request = build_chat_request(&selected.id, &messages, &options);
        provider.stream_chat(request).await
    }

    /// `embedding(input, options)` (spec §4.6).
    pub async fn embedding(
        &self,
        input: Vec<String>,
        options: LlmOptions,
        context: RequestContext,
    ) -> Result<EmbeddingResponse> {
        let started = Instant::now();
        let mut requirements = requirements::infer_requirements(
            &input.iter().map(|s| ChatMessage::user(s.as_str())).collect::<Vec<_>>(),
            &options,
        );
        requirements.task_type = TaskType::Embedding;
        requirements.capabilities = vec![crate::types::Capability::Embedding];

        let selected = self.select_model(&requirements, options.model.as_deref())?;

        let cache_enabled = options.cache_enabled() && self.config.cache_embeddings;
        let cache_key = embedding_cache_key(&selected.id, &input, &options);
        if cache_enabled {
            if let Some(cached) = self.cache.get(&cache_key).await {
                if let Ok(mut response) = serde_json::from_value::<EmbeddingResponse>(cached) {
                    response.metadata.cached = true;
                    return Ok(response);
                }
            }
        }

        let provider = self.provider_for(&selected)?;
        let request = ProviderEmbeddingRequest {
            model: selected.id.clone(),
            input,
        };

        let max_retries = options.max_retries.unwrap_or(self.config.default_max_retries);
        let base_delay = Duration::from_millis(
            options.retry_delay.unwrap_or(self.config.default_retry_delay_ms),
        );

        let result = retry::with_retry(max_retries, base_delay, &context.cancellation, || {
            let provider = Arc::clone(&provider);
            let request = request.clone();
            async move { provider.embed(request).await }
        })
        .await;

        match result {
            Ok(mut response) => {
                response.metadata.model = selected.id.clone();
                response.metadata.provider = selected.provider.clone();

                if cache_enabled {
                    if let Ok(value) = serde_json::to_value(&response) {
                        self.cache
                            .set(
                                &cache_key,
                                value,
                                Some(Duration::from_secs(self.config.embedding_cache_ttl_secs)),
                            )
                            .await;
                    }
                }
                info!(elapsed_ms = started.elapsed().as_millis() as u64, "embedding succeeded");
                Ok(response)
            }
            Err(err) => {
                error!(error = %err, "embedding failed");
                Err(err)
            }
        }
    }

    fn select_model(
        &self,
        requirements: &crate::types::ModelRequirements,
        preferred_id: Option<&str>,
    ) -> Result<ModelMetadata> {
        if self.registry.is_empty() {
            return Err(OrchestratorError::NoModelsRegistered);
        }
        let candidates = self.registry.list_by_requirements(requirements);
        self.selector.select(&candidates, requirements, preferred_id)
    }

    fn provider_for(&self, model: &ModelMetadata) -> Result<Arc<dyn LlmProvider>> {
        self.providers
            .get(&model.provider)
            .cloned()
            .ok_or_else(|| OrchestratorError::ProviderUnavailable {
                model: model.id.clone(),
                provider: model.provider.clone(),
            })
    }

    fn log_outcome(
        &self,
        options: &LlmOptions,
        selected: &ModelMetadata,
        started: Instant,
        cached: bool,
        attempts: u32,
        error: Option<&OrchestratorError>,
    ) {
        let processing_time_ms = started.elapsed().as_millis() as u64;
        match error {
            None => info!(
                request_id = options.request_id.as_deref().unwrap_or_default(),
                session_id = options.session_id.as_deref().unwrap_or_default(),
                user_id = options.user_id.as_deref().unwrap_or_default(),
                model = %selected.id,
                provider = %selected.provider,
                processing_time_ms,
                cached,
                attempts,
                "chat completion succeeded"
            ),
            Some(err) => error!(
                request_id = options.request_id.as_deref().unwrap_or_default(),
                model = %selected.id,
                provider = %selected.provider,
                processing_time_ms,
                attempts,
                error = %err,
                "chat completion failed"
            ),
        }
        if attempts > 1 {
            warn!(attempts, model = %selected.id, "request required retries");
        }
    }
}

fn build_chat_request(
    model_id: &str,
    messages: &[ChatMessage],
    options: &LlmOptions,
) -> ProviderChatRequest {
    ProviderChatRequest {
        model: model_id.to_string(),
        messages: messages.to_vec(),
        temperature: options.temperature,
        max_tokens: options.max_tokens,
        top_p: options.top_p,
        frequency_penalty: options.frequency_penalty,
        presence_penalty: options.presence_penalty,
        stop: options.stop.clone(),
        tools: options.tools.clone(),
        system_prompt: options.system_prompt.clone(),
        json_mode: options.json_mode,
    }
}

fn chat_cache_key(model_id: &str, messages: &[ChatMessage], options: &LlmOptions) -> String {
    let messages_hash = key::hash_value(&messages.to_vec());
    let options_hash = key::hash_value(&options.relevant_for_cache());
    key::chat_cache_key(model_id, &messages_hash, &options_hash)
}

fn embedding_cache_key(model_id: &str, input: &[String], options: &LlmOptions) -> String {
    let input_hash = key::hash_value(&input.to_vec());
    let options_hash = key::hash_value(&options.relevant_for_cache());
    key::embedding_cache_key(&input_hash, model_id, &options_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::LocalProvider;
    use crate::registry::seed_default_catalog;
    use crate::types::PrivacyLevel;

    fn seeded_registry() -> ModelRegistry {
        let registry = ModelRegistry::new();
        for model in seed_default_catalog() {
            registry.register(model).unwrap();
        }
        registry
    }

    fn orchestrator() -> Orchestrator {
        Orchestrator::builder()
            .with_registry(seeded_registry())
            .with_provider(Arc::new(LocalProvider::new()))
            .build()
    }

    #[tokio::test]
    async fn restricted_privacy_routes_to_local_provider() {
        let orchestrator = orchestrator();
        let mut options = LlmOptions::default();
        options.privacy_level = Some(PrivacyLevel::Restricted);
        options.use_cache = Some(false);

        let response = orchestrator
            .chat_completion(vec![ChatMessage::user("hello")], options, RequestContext::default())
            .await
            .unwrap();

        assert_eq!(response.metadata.provider, "local");
    }

    #[tokio::test]
    async fn no_models_registered_fails_selection() {
        let orchestrator = Orchestrator::builder()
            .with_provider(Arc::new(LocalProvider::new()))
            .build();

        let result = orchestrator
            .chat_completion(vec![ChatMessage::user("hi")], LlmOptions::default(), RequestContext::default())
            .await;

        assert!(matches!(result, Err(OrchestratorError::NoModelsRegistered)));
    }

    #[tokio::test]
    async fn provider_unavailable_when_no_provider_registered_for_model() {
        let orchestrator = Orchestrator::builder().with_registry(seeded_registry()).build();
        let mut options = LlmOptions::default();
        options.privacy_level = Some(PrivacyLevel::Restricted);

        let result = orchestrator
            .chat_completion(vec![ChatMessage::user("hi")], options, RequestContext::default())
            .await;

        assert!(matches!(result, Err(OrchestratorError::ProviderUnavailable { .. })));
    }

    #[tokio::test]
    async fn identical_cached_requests_skip_the_provider() {
        let orchestrator = orchestrator();
        let mut options = LlmOptions::default();
        options.privacy_level = Some(PrivacyLevel::Restricted);
        options.model = Some("on-prem-llama-3".to_string());

        let messages = vec![ChatMessage::user("hello")];

        let first = orchestrator
            .chat_completion(messages.clone(), options.clone(), RequestContext::default())
            .await
            .unwrap();
        assert!(!first.metadata.cached);

        let second = orchestrator
            .chat_completion(messages, options, RequestContext::default())
            .await
            .unwrap();
        assert!(second.metadata.cached);
        assert_eq!(second.content, first.content);
    }
}
