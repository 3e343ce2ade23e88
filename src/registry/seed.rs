//! Default catalog seeding (spec §3 "Lifecycle": registry is seeded on
//! orchestrator startup from a static catalog).

use crate::types::{Availability, Capability, Limits, ModelMetadata, ModelStatus, Performance, Pricing};

/// The three-model catalog used throughout spec §8's end-to-end scenarios,
/// plus a small, realistic OpenAI/Anthropic catalog for examples and
/// integration tests that want recognizable ids.
///
/// Model A/B/C are provider `test`, intentionally dependency-free: they
/// exist purely to exercise the selector's scoring math against known
/// inputs, not to be dispatched through a real HTTP client.
pub fn seed_default_catalog() -> Vec<ModelMetadata> {
    let mut models = test_scenario_models();
    models.extend(realistic_models());
    models
}

fn test_scenario_models() -> Vec<ModelMetadata> {
    vec![
        ModelMetadata {
            id: "A".to_string(),
            provider: "test".to_string(),
            name: "test-a".to_string(),
            display_name: "Test Model A".to_string(),
            description: "Cheap, slower baseline chat model.".to_string(),
            context_window: 8_192,
            max_output_tokens: 2_048,
            capabilities: vec![Capability::Chat],
            pricing: Pricing {
                input_tokens: 0.1,
                output_tokens: 0.3,
            },
            performance: Performance {
                average_latency_ms: 2_000,
                tokens_per_second: 15.0,
            },
            availability: Availability {
                regions: vec!["global".to_string()],
                status: ModelStatus::Available,
            },
            limits: Limits::default(),
        },
        ModelMetadata {
            id: "B".to_string(),
            provider: "test".to_string(),
            name: "test-b".to_string(),
            display_name: "Test Model B".to_string(),
            description: "Mid-cost model with code generation.".to_string(),
            context_window: 16_384,
            max_output_tokens: 4_096,
            capabilities: vec![Capability::Chat, Capability::CodeGeneration],
            pricing: Pricing {
                input_tokens: 0.5,
                output_tokens: 1.5,
            },
            performance: Performance {
                average_latency_ms: 1_000,
                tokens_per_second: 30.0,
            },
            availability: Availability {
                regions: vec!["global".to_string()],
                status: ModelStatus::Available,
            },
            limits: Limits::default(),
        },
        ModelMetadata {
            id: "C".to_string(),
            provider: "test".to_string(),
            name: "test-c".to_string(),
            display_name: "Test Model C".to_string(),
            description: "Fast, expensive model with vision and code generation.".to_string(),
            context_window: 32_768,
            max_output_tokens: 4_096,
            capabilities: vec![
                Capability::Chat,
                Capability::CodeGeneration,
                Capability::Vision,
            ],
            pricing: Pricing {
                input_tokens: 1.0,
                output_tokens: 3.0,
            },
            performance: Performance {
                average_latency_ms: 500,
                tokens_per_second: 60.0,
            },
            availability: Availability {
                regions: vec!["global".to_string()],
                status: ModelStatus::Available,
            },
            limits: Limits::default(),
        },
    ]
}

fn realistic_models() -> Vec<ModelMetadata> {
    vec![
        ModelMetadata {
            id: "gpt-4o".to_string(),
            provider: "openai".to_string(),
            name: "gpt-4o".to_string(),
            display_name: "GPT-4o".to_string(),
            description: "OpenAI's multimodal flagship chat model.".to_string(),
            context_window: 128_000,
            max_output_tokens: 16_384,
            capabilities: vec![
                Capability::Chat,
                Capability::Vision,
                Capability::ToolCalling,
                Capability::FunctionCalling,
                Capability::Streaming,
                Capability::JsonMode,
                Capability::CodeGeneration,
                Capability::ComplexReasoning,
                Capability::Multimodal,
            ],
            pricing: Pricing {
                input_tokens: 2.5,
                output_tokens: 10.0,
            },
            performance: Performance {
                average_latency_ms: 900,
                tokens_per_second: 55.0,
            },
            availability: Availability {
                regions: vec!["global".to_string()],
                status: ModelStatus::Available,
            },
            limits: Limits::default(),
        },
        ModelMetadata {
            id: "gpt-4o-mini".to_string(),
            provider: "openai".to_string(),
            name: "gpt-4o-mini".to_string(),
            display_name: "GPT-4o mini".to_string(),
            description: "OpenAI's small, low-cost chat model.".to_string(),
            context_window: 128_000,
            max_output_tokens: 16_384,
            capabilities: vec![
                Capability::Chat,
                Capability::ToolCalling,
                Capability::Streaming,
                Capability::JsonMode,
            ],
            pricing: Pricing {
                input_tokens: 0.15,
                output_tokens: 0.6,
            },
            performance: Performance {
                average_latency_ms: 450,
                tokens_per_second: 80.0,
            },
            availability: Availability {
                regions: vec!["global".to_string()],
                status: ModelStatus::Available,
            },
            limits: Limits::default(),
        },
        ModelMetadata {
            id: "text-embedding-3-small".to_string(),
            provider: "openai".to_string(),
            name: "text-embedding-3-small".to_string(),
            display_name: "text-embedding-3-small".to_string(),
            description: "OpenAI's small embedding model.".to_string(),
            context_window: 8_191,
            max_output_tokens: 0,
            capabilities: vec![Capability::Embedding],
            pricing: Pricing {
                input_tokens: 0.02,
                output_tokens: 0.0,
            },
            performance: Performance {
                average_latency_ms: 200,
                tokens_per_second: 0.0,
            },
            availability: Availability {
                regions: vec!["global".to_string()],
                status: ModelStatus::Available,
            },
            limits: Limits::default(),
        },
        ModelMetadata {
            id: "claude-3-5-sonnet".to_string(),
            provider: "anthropic".to_string(),
            name: "claude-3-5-sonnet-20241022".to_string(),
            display_name: "Claude 3.5 Sonnet".to_string(),
            description: "Anthropic's balanced flagship chat model.".to_string(),
            context_window: 200_000,
            max_output_tokens: 8_192,
            capabilities: vec![
                Capability::Chat,
                Capability::Vision,
                Capability::ToolCalling,
                Capability::Streaming,
                Capability::CodeGeneration,
                Capability::ComplexReasoning,
                Capability::AdvancedReasoning,
                Capability::Multimodal,
            ],
            pricing: Pricing {
                input_tokens: 3.0,
                output_tokens: 15.0,
            },
            performance: Performance {
                average_latency_ms: 1_100,
                tokens_per_second: 45.0,
            },
            availability: Availability {
                regions: vec!["global".to_string()],
                status: ModelStatus::Available,
            },
            limits: Limits::default(),
        },
        ModelMetadata {
            id: "claude-3-haiku".to_string(),
            provider: "anthropic".to_string(),
            name: "claude-3-haiku-20240307".to_string(),
            display_name: "Claude 3 Haiku".to_string(),
            description: "Anthropic's fast, low-cost chat model.".to_string(),
            context_window: 200_000,
            max_output_tokens: 4_096,
            capabilities: vec![Capability::Chat, Capability::Streaming, Capability::ToolCalling],
            pricing: Pricing {
                input_tokens: 0.25,
                output_tokens: 1.25,
            },
            performance: Performance {
                average_latency_ms: 400,
                tokens_per_second: 70.0,
            },
            availability: Availability {
                regions: vec!["global".to_string()],
                status: ModelStatus::Available,
            },
            limits: Limits::default(),
        },
        ModelMetadata {
            id: "on-prem-llama-3".to_string(),
            provider: "local".to_string(),
            name: "llama-3-70b-instruct".to_string(),
            display_name: "On-Prem Llama 3 70B".to_string(),
            description: "Self-hosted model for restricted-privacy workloads.".to_string(),
            context_window: 8_192,
            max_output_tokens: 4_096,
            capabilities: vec![Capability::Chat, Capability::CodeGeneration],
            pricing: Pricing {
                input_tokens: 0.0,
                output_tokens: 0.0,
            },
            performance: Performance {
                average_latency_ms: 1_800,
                tokens_per_second: 20.0,
            },
            availability: Availability {
                regions: vec!["on-prem".to_string()],
                status: ModelStatus::Available,
            },
            limits: Limits::default(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_seeded_model_validates() {
        for model in seed_default_catalog() {
            assert!(model.validate().is_ok(), "model {} failed validation", model.id);
        }
    }

    #[test]
    fn seed_contains_the_spec_scenario_models() {
        let ids: Vec<String> = seed_default_catalog().into_iter().map(|m| m.id).collect();
        assert!(ids.contains(&"A".to_string()));
        assert!(ids.contains(&"B".to_string()));
        assert!(ids.contains(&"C".to_string()));
    }
}
