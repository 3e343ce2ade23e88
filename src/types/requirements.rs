//! `ModelRequirements` and the enums the orchestrator derives them from.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Task type, inferred from `options.task_type` or message-content keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    SimpleQa,
    CodeGeneration,
    ComplexReasoning,
    Summarization,
    Classification,
    CreativeWriting,
    Embedding,
}

/// Task complexity, driving which models are worth considering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskComplexity {
    Simple,
    Medium,
    Complex,
}

/// Latency class, mapped to a maximum acceptable average response latency
/// by [`crate::selection::policy::SpeedPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatencyClass {
    Low,
    Medium,
    High,
}

impl LatencyClass {
    /// Maximum acceptable average latency in milliseconds (spec §4.3).
    pub fn max_latency_ms(self) -> u32 {
        match self {
            LatencyClass::Low => 500,
            LatencyClass::Medium => 2000,
            LatencyClass::High => 5000,
        }
    }
}

/// Privacy level; `Restricted` mandates a local/on-prem-tagged provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    Public,
    Internal,
    Confidential,
    Restricted,
}

/// A named ability a model possesses (closed enumeration, spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Chat,
    Embedding,
    Vision,
    ToolCalling,
    Streaming,
    FunctionCalling,
    JsonMode,
    AdvancedReasoning,
    ComplexReasoning,
    CodeGeneration,
    Multimodal,
    CreativeWriting,
}

/// Per-request requirements derived internally by the orchestrator
/// (spec §3 `ModelRequirements`) — never supplied raw by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRequirements {
    pub task_type: TaskType,
    pub task_complexity: TaskComplexity,
    /// Estimated tokens the context window must accommodate.
    pub context_window: u32,
    pub latency_requirement: LatencyClass,
    pub privacy_level: PrivacyLevel,
    pub capabilities: Vec<Capability>,
    pub max_cost: Option<f64>,
    pub preferred_provider: Option<String>,
    pub policy_weights: Option<HashMap<String, f64>>,
}

impl ModelRequirements {
    pub fn requires(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}
