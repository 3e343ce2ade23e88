//! Model registry (spec §4.1, component C3): a concurrent in-memory catalog
//! of [`ModelMetadata`], grounded on the teacher's DashMap-based sharded
//! state (the same concurrency idiom the teacher applies to its router's
//! deployment maps).

mod seed;

pub use seed::seed_default_catalog;

use crate::error::{OrchestratorError, Result};
use crate::types::{Capability, ModelMetadata, ModelRequirements, ModelStatus, PrivacyLevel};
use dashmap::{DashMap, DashSet};
use std::collections::HashSet;

/// Lock-free concurrent catalog of registered models, keyed by model id.
///
/// `provider_index` and `capability_index` are secondary indices kept in
/// step with `models` so `list_by_provider`/`list_by_capability` run in
/// O(k) over the result size rather than scanning the whole catalog (spec
/// §4.1 "indexed by provider and capability"). Every mutation re-derives a
/// model's index membership from the old entry (if any) before writing the
/// new one, so a `register`/`update` that changes `provider` or
/// `capabilities` never leaves a stale index entry behind.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: DashMap<String, ModelMetadata>,
    provider_index: DashMap<String, DashSet<String>>,
    capability_index: DashMap<Capability, DashSet<String>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            models: DashMap::new(),
            provider_index: DashMap::new(),
            capability_index: DashMap::new(),
        }
    }

    /// Registers or replaces a model entry after validating its invariants
    /// (spec §4.1).
    pub fn register(&self, model: ModelMetadata) -> Result<()> {
        model
            .validate()
            .map_err(|reason| OrchestratorError::InvalidModelMetadata {
                model: model.id.clone(),
                reason,
            })?;

        if let Some(entry) = self.models.get(&model.id) {
            let previous = entry.value().clone();
            drop(entry);
            self.deindex(&previous);
        }
        self.index(&model);
        self.models.insert(model.id.clone(), model);
        Ok(())
    }

    /// Removes a model by id, returning it if it was present.
    pub fn remove(&self, id: &str) -> Option<ModelMetadata> {
        let removed = self.models.remove(id).map(|(_, v)| v);
        if let Some(model) = &removed {
            self.deindex(model);
        }
        removed
    }

    /// Replaces an existing entry in place; fails if the model isn't
    /// registered yet.
    pub fn update(&self, model: ModelMetadata) -> Result<()> {
        if !self.models.contains_key(&model.id) {
            return Err(OrchestratorError::ModelNotFound { model: model.id });
        }
        self.register(model)
    }

    pub fn get(&self, id: &str) -> Option<ModelMetadata> {
        self.models.get(id).map(|entry| entry.value().clone())
    }

    /// Snapshot of every registered model.
    pub fn list(&self) -> Vec<ModelMetadata> {
        self.models.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Models for `provider`, via the provider index — O(k) in the number
    /// of models that provider owns, not the whole catalog.
    pub fn list_by_provider(&self, provider: &str) -> Vec<ModelMetadata> {
        let Some(ids) = self.provider_index.get(provider) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| self.models.get(id.as_str()).map(|entry| entry.value().clone()))
            .collect()
    }

    /// Models advertising `capability`, via the capability index — O(k) in
    /// the number of models with that capability.
    pub fn list_by_capability(&self, capability: Capability) -> Vec<ModelMetadata> {
        let Some(ids) = self.capability_index.get(&capability) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| self.models.get(id.as_str()).map(|entry| entry.value().clone()))
            .collect()
    }

    /// Hard-filters the catalog down to models that satisfy `requirements`
    /// (spec §4.1 `listByRequirements`, §4.6 step 2). Narrows via the
    /// provider/capability indices first, then applies the remaining
    /// predicates (status, context window, privacy) the indices don't
    /// cover. Soft/scored selection among the survivors is the selector's
    /// job, not the registry's.
    pub fn list_by_requirements(&self, requirements: &ModelRequirements) -> Vec<ModelMetadata> {
        self.candidate_ids(requirements)
            .into_iter()
            .filter_map(|id| self.models.get(id.as_str()).map(|entry| entry.value().clone()))
            .filter(|model| model_satisfies_requirements(model, requirements))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Smallest index-backed candidate set for `requirements`: the
    /// preferred provider's models if one is pinned (every other viable
    /// model is filtered out downstream anyway), else the intersection of
    /// the required capabilities' index sets, else the full catalog.
    fn candidate_ids(&self, requirements: &ModelRequirements) -> Vec<String> {
        if let Some(provider) = &requirements.preferred_provider {
            return self
                .provider_index
                .get(provider)
                .map(|ids| ids.iter().map(|id| id.clone()).collect())
                .unwrap_or_default();
        }

        let mut capabilities = requirements.capabilities.iter();
        let Some(first) = capabilities.next() else {
            return self.models.iter().map(|entry| entry.key().clone()).collect();
        };

        let mut ids: HashSet<String> = self
            .capability_index
            .get(first)
            .map(|set| set.iter().map(|id| id.clone()).collect())
            .unwrap_or_default();

        for capability in capabilities {
            let set: HashSet<String> = self
                .capability_index
                .get(capability)
                .map(|set| set.iter().map(|id| id.clone()).collect())
                .unwrap_or_default();
            ids.retain(|id| set.contains(id));
        }

        ids.into_iter().collect()
    }

    fn index(&self, model: &ModelMetadata) {
        self.provider_index
            .entry(model.provider.clone())
            .or_insert_with(DashSet::new)
            .insert(model.id.clone());

        for capability in &model.capabilities {
            self.capability_index
                .entry(*capability)
                .or_insert_with(DashSet::new)
                .insert(model.id.clone());
        }
    }

    fn deindex(&self, model: &ModelMetadata) {
        if let Some(set) = self.provider_index.get(&model.provider) {
            set.remove(&model.id);
        }
        for capability in &model.capabilities {
            if let Some(set) = self.capability_index.get(capability) {
                set.remove(&model.id);
            }
        }
    }
}

fn model_satisfies_requirements(model: &ModelMetadata, requirements: &ModelRequirements) -> bool {
    if !matches!(
        model.availability.status,
        ModelStatus::Available | ModelStatus::Beta
    ) {
        return false;
    }

    if !requirements
        .capabilities
        .iter()
        .all(|cap| model.has_capability(*cap))
    {
        return false;
    }

    if model.context_window < requirements.context_window {
        return false;
    }

    if let Some(preferred) = &requirements.preferred_provider {
        if &model.provider != preferred {
            return false;
        }
    }

    if requirements.privacy_level == PrivacyLevel::Restricted && model.provider != "local" {
        return false;
    }

    true
}
