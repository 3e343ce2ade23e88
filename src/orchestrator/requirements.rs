//! Requirements inference (spec §4.6 step 1): derives a [`ModelRequirements`]
//! from the caller's messages and [`LlmOptions`] when the caller hasn't
//! supplied the field directly.

use crate::types::{
    Capability, ChatMessage, LatencyClass, LlmOptions, ModelRequirements, PrivacyLevel,
    TaskComplexity, TaskType,
};

const COMPLEX_LENGTH_THRESHOLD: usize = 5_000;
const MEDIUM_LENGTH_THRESHOLD: usize = 1_000;

/// Providers preferred for complex-reasoning/code tasks when the caller
/// hasn't pinned a model or provider (spec §4.6 step 1 `preferredProvider`).
const COMPLEX_TASK_PROVIDER: &str = "anthropic";

pub fn infer_requirements(messages: &[ChatMessage], options: &LlmOptions) -> ModelRequirements {
    let task_type = options.task_type.unwrap_or_else(|| infer_task_type(messages));
    let task_complexity = options
        .task_complexity
        .unwrap_or_else(|| infer_task_complexity(messages, options));
    let context_window = estimate_context_window(messages, options);
    let latency_requirement = options.urgency.unwrap_or(LatencyClass::Medium);
    let privacy_level = options.privacy_level.unwrap_or(PrivacyLevel::Internal);
    let capabilities = infer_capabilities(messages, options, task_type);
    let preferred_provider = infer_preferred_provider(privacy_level, task_type, task_complexity);

    ModelRequirements {
        task_type,
        task_complexity,
        context_window,
        latency_requirement,
        privacy_level,
        capabilities,
        max_cost: options.max_cost,
        preferred_provider,
        policy_weights: options.policy_weights.clone(),
    }
}

fn infer_task_type(messages: &[ChatMessage]) -> TaskType {
    let text = concatenated_text(messages).to_lowercase();

    const CODE_KEYWORDS: &[&str] = &["function", "code", "bug", "compile", "refactor", "implement"];
    const REASONING_KEYWORDS: &[&str] = &["prove", "reason step by step", "derive", "analyze deeply"];
    const SUMMARIZATION_KEYWORDS: &[&str] = &["summarize", "tl;dr", "shorten", "condense"];
    const CLASSIFICATION_KEYWORDS: &[&str] = &["classify", "categorize", "which category", "label this"];

    if CODE_KEYWORDS.iter().any(|k| text.contains(k)) {
        TaskType::CodeGeneration
    } else if REASONING_KEYWORDS.iter().any(|k| text.contains(k)) {
        TaskType::ComplexReasoning
    } else if SUMMARIZATION_KEYWORDS.iter().any(|k| text.contains(k)) {
        TaskType::Summarization
    } else if CLASSIFICATION_KEYWORDS.iter().any(|k| text.contains(k)) {
        TaskType::Classification
    } else {
        TaskType::SimpleQa
    }
}

fn infer_task_complexity(messages: &[ChatMessage], options: &LlmOptions) -> TaskComplexity {
    let total_len = concatenated_text(messages).chars().count();
    let has_system_prompt = options.system_prompt.is_some()
        || messages.iter().any(|m| matches!(m.role, crate::types::Role::System));
    let has_tools = options.tools.as_ref().is_some_and(|t| !t.is_empty());

    if total_len > COMPLEX_LENGTH_THRESHOLD || has_tools || has_system_prompt {
        TaskComplexity::Complex
    } else if total_len > MEDIUM_LENGTH_THRESHOLD {
        TaskComplexity::Medium
    } else {
        TaskComplexity::Simple
    }
}

/// `ceil(chars / 4)` input estimate plus the requested (or a conservative
/// default) output reserve, plus a small safety margin (spec §4.6 step 1).
fn estimate_context_window(messages: &[ChatMessage], options: &LlmOptions) -> u32 {
    let input_chars: usize = messages.iter().map(|m| m.content.char_len()).sum();
    let estimated_input_tokens = input_chars.div_ceil(4) as u32;
    let output_reserve = options.max_tokens.unwrap_or(1_024);
    let safety_margin = 64;
    estimated_input_tokens + output_reserve + safety_margin
}

fn infer_capabilities(
    messages: &[ChatMessage],
    options: &LlmOptions,
    task_type: TaskType,
) -> Vec<Capability> {
    let mut capabilities = vec![if task_type == TaskType::Embedding {
        Capability::Embedding
    } else {
        Capability::Chat
    }];

    if options.tools.as_ref().is_some_and(|t| !t.is_empty()) {
        capabilities.push(Capability::ToolCalling);
    }
    if options.stream == Some(true) {
        capabilities.push(Capability::Streaming);
    }
    if messages.iter().any(|m| m.content.has_image()) {
        capabilities.push(Capability::Vision);
    }
    if task_type == TaskType::CodeGeneration {
        capabilities.push(Capability::CodeGeneration);
    }

    capabilities
}

fn infer_preferred_provider(
    privacy_level: PrivacyLevel,
    task_type: TaskType,
    task_complexity: TaskComplexity,
) -> Option<String> {
    if privacy_level == PrivacyLevel::Restricted {
        return Some("local".to_string());
    }

    if task_complexity == TaskComplexity::Complex
        || matches!(task_type, TaskType::ComplexReasoning | TaskType::CodeGeneration)
    {
        return Some(COMPLEX_TASK_PROVIDER.to_string());
    }

    None
}

fn concatenated_text(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| m.content.as_text())
        .collect::<Vec<_>>()
        .join(" ")
}
