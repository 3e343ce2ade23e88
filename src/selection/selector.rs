//! Selector (spec §4.4, component C7): picks the best viable model from a
//! candidate set given requirements and an optional preferred id.

use super::policy::CapabilityPolicy;
use super::policy::ScoringPolicy;
use super::scorer::{ScoredModel, Scorer};
use crate::error::{OrchestratorError, Result};
use crate::types::{ModelMetadata, ModelRequirements};

/// Given `candidates`, `requirements`, and an optional caller-preferred
/// model id, returns the best viable model (spec §4.4).
pub struct Selector {
    scorer: Scorer,
}

impl Selector {
    pub fn new(scorer: Scorer) -> Self {
        Self { scorer }
    }

    pub fn select(
        &self,
        candidates: &[ModelMetadata],
        requirements: &ModelRequirements,
        preferred_id: Option<&str>,
    ) -> Result<ModelMetadata> {
        if candidates.is_empty() {
            return Err(OrchestratorError::NoModelsRegistered);
        }

        if let Some(preferred_id) = preferred_id {
            if let Some(preferred) = candidates.iter().find(|m| m.id == preferred_id) {
                let capability_policy = CapabilityPolicy;
                let (score, _) = capability_policy.score(preferred, requirements);
                if score >= 1.0 {
                    return Ok(preferred.clone());
                }
            }
        }

        let mut scored: Vec<ScoredModel> = candidates
            .iter()
            .map(|model| self.scorer.score(model, requirements))
            .collect();

        scored.retain(|s| s.is_viable);

        if scored.is_empty() {
            let reasoning = candidates
                .iter()
                .map(|m| self.scorer.score(m, requirements))
                .map(|s| format!("{}: {}", s.model.id, s.reasoning.join("; ")))
                .collect::<Vec<_>>()
                .join(" | ");
            return Err(OrchestratorError::ModelSelectionFailed { reasoning });
        }

        scored.sort_by(|a, b| rank(a, b, requirements));

        Ok(scored.into_iter().next().expect("checked non-empty above").model)
    }
}

/// Orders two scored candidates best-first: higher overall score wins; ties
/// broken by preferred-provider match, then lower input price, then
/// lexicographically smaller id (spec §4.4).
fn rank(a: &ScoredModel, b: &ScoredModel, requirements: &ModelRequirements) -> std::cmp::Ordering {
    b.overall_score
        .partial_cmp(&a.overall_score)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| {
            let a_matches = provider_matches(a, requirements);
            let b_matches = provider_matches(b, requirements);
            b_matches.cmp(&a_matches)
        })
        .then_with(|| {
            a.model
                .pricing
                .input_tokens
                .partial_cmp(&b.model.pricing.input_tokens)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .then_with(|| a.model.id.cmp(&b.model.id))
}

fn provider_matches(scored: &ScoredModel, requirements: &ModelRequirements) -> bool {
    requirements
        .preferred_provider
        .as_deref()
        .is_some_and(|preferred| preferred == scored.model.provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::policy::default_policies;
    use crate::types::{
        Availability, Capability, LatencyClass, Limits, ModelStatus, Performance, PrivacyLevel,
        Pricing, TaskComplexity, TaskType,
    };

    fn model(id: &str, input_price: f64, latency_ms: u32, caps: Vec<Capability>) -> ModelMetadata {
        ModelMetadata {
            id: id.to_string(),
            provider: "test".to_string(),
            name: id.to_string(),
            display_name: id.to_string(),
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
            privacy_level: PrivacyLevel::Public,
            capabilities: caps,
            max_cost: None,
            preferred_provider: None,
            policy_weights: None,
        }
    }

    fn spec_catalog() -> Vec<ModelMetadata> {
        vec![
            model("A", 0.1, 2000, vec![Capability::Chat]),
            model(
                "B",
                0.5,
                1000,
                vec![Capability::Chat, Capability::CodeGeneration],
            ),
            model(
                "C",
                1.0,
                500,
                vec![Capability::Chat, Capability::CodeGeneration, Capability::Vision],
            ),
        ]
    }

    fn selector() -> Selector {
        Selector::new(Scorer::new(default_policies()))
    }

    #[test]
    fn hard_cost_budget_selects_a() {
        let candidates = spec_catalog();
        let mut req = requirements(vec![Capability::Chat]);
        req.max_cost = Some(0.15);
        let selected = selector().select(&candidates, &req, None).unwrap();
        assert_eq!(selected.id, "A");
    }

    #[test]
    fn speed_biased_weights_select_c() {
        let candidates = spec_catalog();
        let mut req = requirements(vec![Capability::Chat]);
        let mut weights = std::collections::HashMap::new();
        weights.insert("SpeedPolicy".to_string(), 1.0);
        weights.insert("CostPolicy".to_string(), 0.01);
        weights.insert("CapabilityPolicy".to_string(), 1.0);
        req.policy_weights = Some(weights);
        let selected = selector().select(&candidates, &req, None).unwrap();
        assert_eq!(selected.id, "C");
    }

    #[test]
    fn preferred_id_honored_when_capable() {
        let candidates = spec_catalog();
        let req = requirements(vec![Capability::Chat]);
        let selected = selector().select(&candidates, &req, Some("A")).unwrap();
        assert_eq!(selected.id, "A");
    }

    #[test]
    fn preferred_id_overridden_when_incapable() {
        let candidates = spec_catalog();
        let req = requirements(vec![Capability::Chat, Capability::Vision]);
        let selected = selector().select(&candidates, &req, Some("A")).unwrap();
        assert_eq!(selected.id, "C");
    }

    #[test]
    fn empty_candidates_fails_with_no_models_registered() {
        let req = requirements(vec![Capability::Chat]);
        let result = selector().select(&[], &req, None);
        assert!(matches!(result, Err(OrchestratorError::NoModelsRegistered)));
    }

    #[test]
    fn no_viable_candidate_fails_with_selection_failed() {
        let candidates = vec![model("A", 0.1, 2000, vec![Capability::Chat])];
        let req = requirements(vec![Capability::Chat, Capability::Embedding]);
        let result = selector().select(&candidates, &req, None);
        assert!(matches!(
            result,
            Err(OrchestratorError::ModelSelectionFailed { .. })
        ));
    }
}
