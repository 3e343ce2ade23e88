//! Scoring policies (spec §4.3, component C5): stateless evaluators that
//! each score a candidate model against per-request requirements.

use crate::types::{LatencyClass, ModelMetadata, ModelRequirements};
use std::fmt::Debug;

/// One policy's verdict on a single candidate.
#[derive(Debug, Clone)]
pub struct PolicyScore {
    pub policy_name: &'static str,
    pub score: f64,
    pub weight: f64,
    pub is_mandatory: bool,
    pub reasoning: String,
}

/// A stateless, injectable evaluator. New ranking factors are added by
/// implementing this trait and appending an instance to the Scorer's policy
/// list, never by editing the Scorer itself (spec §9).
pub trait ScoringPolicy: Send + Sync + Debug {
    /// Stable identifier used to look up a weight override in
    /// `requirements.policy_weights`.
    fn name(&self) -> &'static str;

    fn default_weight(&self) -> f64;

    fn is_mandatory(&self) -> bool;

    /// Scores `model` against `requirements`, in `[0, 1]`.
    fn score(&self, model: &ModelMetadata, requirements: &ModelRequirements) -> (f64, String);

    /// Resolves the effective weight: an override from
    /// `requirements.policy_weights` if present, else `default_weight()`.
    fn weight(&self, requirements: &ModelRequirements) -> f64 {
        requirements
            .policy_weights
            .as_ref()
            .and_then(|weights| weights.get(self.name()))
            .copied()
            .unwrap_or_else(|| self.default_weight())
    }

    /// Scores and wraps the result into a [`PolicyScore`].
    fn evaluate(&self, model: &ModelMetadata, requirements: &ModelRequirements) -> PolicyScore {
        let (score, reasoning) = self.score(model, requirements);
        PolicyScore {
            policy_name: self.name(),
            score,
            weight: self.weight(requirements),
            is_mandatory: self.is_mandatory(),
            reasoning,
        }
    }
}

/// Mandatory policy: every required capability must be present. Scores the
/// proportion of required capabilities the model satisfies.
#[derive(Debug, Default)]
pub struct CapabilityPolicy;

impl ScoringPolicy for CapabilityPolicy {
    fn name(&self) -> &'static str {
        "CapabilityPolicy"
    }

    fn default_weight(&self) -> f64 {
        1.0
    }

    fn is_mandatory(&self) -> bool {
        true
    }

    fn score(&self, model: &ModelMetadata, requirements: &ModelRequirements) -> (f64, String) {
        if requirements.capabilities.is_empty() {
            return (1.0, "no capabilities required".to_string());
        }

        let satisfied = requirements
            .capabilities
            .iter()
            .filter(|cap| model.has_capability(**cap))
            .count();
        let score = satisfied as f64 / requirements.capabilities.len() as f64;
        (
            score,
            format!(
                "{satisfied}/{} required capabilities present",
                requirements.capabilities.len()
            ),
        )
    }
}

/// Non-mandatory policy rewarding models under (or near) `max_cost`, or a
/// tiered default when no budget is supplied.
#[derive(Debug, Default)]
pub struct CostPolicy;

impl ScoringPolicy for CostPolicy {
    fn name(&self) -> &'static str {
        "CostPolicy"
    }

    fn default_weight(&self) -> f64 {
        0.8
    }

    fn is_mandatory(&self) -> bool {
        false
    }

    fn score(&self, model: &ModelMetadata, requirements: &ModelRequirements) -> (f64, String) {
        let input_price = model.pricing.input_tokens;

        if let Some(max_cost) = requirements.max_cost {
            return if input_price <= max_cost {
                (1.0, format!("input price {input_price} within budget {max_cost}"))
            } else {
                (0.0, format!("input price {input_price} exceeds budget {max_cost}"))
            };
        }

        let score = if input_price <= 0.2 {
            1.0
        } else if input_price <= 0.6 {
            0.8
        } else if input_price <= 1.0 {
            0.6
        } else if input_price <= 2.0 {
            0.4
        } else {
            0.2
        };
        (score, format!("tiered score for input price {input_price}"))
    }
}

/// Non-mandatory policy rewarding models whose average latency fits the
/// request's latency class.
#[derive(Debug, Default)]
pub struct SpeedPolicy;

impl ScoringPolicy for SpeedPolicy {
    fn name(&self) -> &'static str {
        "SpeedPolicy"
    }

    fn default_weight(&self) -> f64 {
        0.7
    }

    fn is_mandatory(&self) -> bool {
        false
    }

    fn score(&self, model: &ModelMetadata, requirements: &ModelRequirements) -> (f64, String) {
        let max_latency = max_latency_ms(requirements.latency_requirement) as f64;
        let actual = model.performance.average_latency_ms as f64;

        let score = if actual <= max_latency {
            (0.6 + 0.4 * (1.0 - actual / max_latency)).min(1.0)
        } else {
            (0.5 * max_latency / actual).max(0.1)
        };
        (
            score,
            format!("average latency {actual}ms against max {max_latency}ms"),
        )
    }
}

fn max_latency_ms(class: LatencyClass) -> u32 {
    class.max_latency_ms()
}

/// Default reference policy set: Capability, Cost, Speed (spec §4.3).
pub fn default_policies() -> Vec<Box<dyn ScoringPolicy>> {
    vec![
        Box::new(CapabilityPolicy),
        Box::new(CostPolicy),
        Box::new(SpeedPolicy),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Availability, Capability, Limits, ModelStatus, Performance, Pricing, TaskComplexity,
        TaskType,
    };

    fn model(input_price: f64, latency_ms: u32, caps: Vec<Capability>) -> ModelMetadata {
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
                input_tokens: input_price,
                output_tokens: input_price * 2.0,
            },
            performance: Performance {
                average_latency_ms: latency_ms,
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
            privacy_level: crate::types::PrivacyLevel::Public,
            capabilities: caps,
            max_cost: None,
            preferred_provider: None,
            policy_weights: None,
        }
    }

    #[test]
    fn capability_policy_scores_proportion_present() {
        let policy = CapabilityPolicy;
        let m = model(0.1, 500, vec![Capability::Chat]);
        let req = requirements(vec![Capability::Chat, Capability::Vision]);
        let (score, _) = policy.score(&m, &req);
        assert_eq!(score, 0.5);
    }

    #[test]
    fn cost_policy_respects_max_cost() {
        let policy = CostPolicy;
        let m = model(0.1, 500, vec![Capability::Chat]);
        let mut req = requirements(vec![Capability::Chat]);
        req.max_cost = Some(0.15);
        assert_eq!(policy.score(&m, &req).0, 1.0);

        req.max_cost = Some(0.05);
        assert_eq!(policy.score(&m, &req).0, 0.0);
    }

    #[test]
    fn cost_policy_tiered_default() {
        let policy = CostPolicy;
        let req = requirements(vec![Capability::Chat]);
        assert_eq!(policy.score(&model(0.1, 500, vec![]), &req).0, 1.0);
        assert_eq!(policy.score(&model(0.5, 500, vec![]), &req).0, 0.8);
        assert_eq!(policy.score(&model(0.9, 500, vec![]), &req).0, 0.6);
        assert_eq!(policy.score(&model(1.5, 500, vec![]), &req).0, 0.4);
        assert_eq!(policy.score(&model(5.0, 500, vec![]), &req).0, 0.2);
    }

    #[test]
    fn speed_policy_rewards_low_latency() {
        let policy = SpeedPolicy;
        let req = requirements(vec![Capability::Chat]);
        let fast = model(0.1, 500, vec![]);
        let slow = model(0.1, 5000, vec![]);
        assert!(policy.score(&fast, &req).0 > policy.score(&slow, &req).0);
    }

    #[test]
    fn weight_override_takes_precedence() {
        let policy = CapabilityPolicy;
        let mut req = requirements(vec![Capability::Chat]);
        let mut overrides = std::collections::HashMap::new();
        overrides.insert("CapabilityPolicy".to_string(), 5.0);
        req.policy_weights = Some(overrides);
        assert_eq!(policy.weight(&req), 5.0);
    }
}
