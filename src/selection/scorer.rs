//! Scorer (spec §4.3, component C6): aggregates a candidate's per-policy
//! scores into an overall score and a viability flag.

use super::policy::{PolicyScore, ScoringPolicy};
use crate::types::{ModelMetadata, ModelRequirements};

/// The viability threshold below which a mandatory policy's score sinks the
/// whole candidate, regardless of other policies (spec §4.3).
const MANDATORY_VIABILITY_THRESHOLD: f64 = 0.5;

/// Full scoring outcome for one candidate.
#[derive(Debug, Clone)]
pub struct ScoredModel {
    pub model: ModelMetadata,
    pub overall_score: f64,
    pub per_policy_scores: Vec<PolicyScore>,
    pub is_viable: bool,
    pub reasoning: Vec<String>,
}

/// Aggregates an injected list of [`ScoringPolicy`] instances into an overall
/// score. Adding a ranking factor means appending a policy here, never
/// editing this struct's logic (spec §9).
#[derive(Debug)]
pub struct Scorer {
    policies: Vec<Box<dyn ScoringPolicy>>,
}

impl Scorer {
    pub fn new(policies: Vec<Box<dyn ScoringPolicy>>) -> Self {
        Self { policies }
    }

    pub fn score(&self, model: &ModelMetadata, requirements: &ModelRequirements) -> ScoredModel {
        let per_policy_scores: Vec<PolicyScore> = self
            .policies
            .iter()
            .map(|policy| policy.evaluate(model, requirements))
            .collect();

        let is_viable = per_policy_scores
            .iter()
            .all(|p| !p.is_mandatory || p.score >= MANDATORY_VIABILITY_THRESHOLD);

        let total_weight: f64 = per_policy_scores.iter().map(|p| p.weight).sum();
        let overall_score = if total_weight > 0.0 {
            per_policy_scores
                .iter()
                .map(|p| p.score * p.weight)
                .sum::<f64>()
                / total_weight
        } else {
            0.0
        };

        let reasoning = per_policy_scores
            .iter()
            .map(|p| format!("{}: {:.2} ({})", p.policy_name, p.score, p.reasoning))
            .collect();

        ScoredModel {
            model: model.clone(),
            overall_score,
            per_policy_scores,
            is_viable,
            reasoning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::policy::{CapabilityPolicy, CostPolicy};
    use crate::types::{
        Availability, Capability, LatencyClass, Limits, ModelStatus, Performance, PrivacyLevel,
        Pricing, TaskComplexity, TaskType,
    };

    fn model(caps: Vec<Capability>) -> ModelMetadata {
        ModelMetadata {
            id: "m".to_string(),
            provider: "test".to_string(),
            name: "m".to_string(),
            display_name: "m".to_string(),
            description: String::new(),
            context_window: 8192,
            max_output_tokens: 2048,
            capabilities: caps,
            pricing: Pricing {
                input_tokens: 0.1,
                output_tokens: 0.2,
            },
            performance: Performance {
                average_latency_ms: 500,
                tokens_per_second: 20.0,
            },
            availability: Availability {
                regions: vec!["us".to_string()],
                status: ModelStatus::Available,
            },
            limits: Limits::default(),
        }
    }

    fn requirements(caps: Vec<Capability>) -> ModelRequirements {
        ModelRequirements {
            task_type: TaskType::SimpleQa,
            task_complexity: TaskComplexity::Simple,
            context_window: 1000,
            latency_requirement: LatencyClass::Medium,
            privacy_level: PrivacyLevel::Public,
            capabilities: caps,
            max_cost: None,
            preferred_provider: None,
            policy_weights: None,
        }
    }

    #[test]
    fn mandatory_policy_below_threshold_is_not_viable() {
        let scorer = Scorer::new(vec![Box::new(CapabilityPolicy), Box::new(CostPolicy)]);
        let m = model(vec![]);
        let req = requirements(vec![Capability::Chat, Capability::Vision]);
        let scored = scorer.score(&m, &req);
        assert!(!scored.is_viable);
    }

    #[test]
    fn fully_capable_model_is_viable() {
        let scorer = Scorer::new(vec![Box::new(CapabilityPolicy), Box::new(CostPolicy)]);
        let m = model(vec![Capability::Chat]);
        let req = requirements(vec![Capability::Chat]);
        let scored = scorer.score(&m, &req);
        assert!(scored.is_viable);
        assert!(scored.overall_score > 0.0);
    }
}
