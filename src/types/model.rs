//! `ModelMetadata` — the registry entry type (spec §3).

use super::requirements::Capability;
use serde::{Deserialize, Serialize};

/// Model availability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Available,
    Beta,
    Limited,
    Deprecated,
}

/// Per-1,000,000-token pricing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Pricing {
    pub input_tokens: f64,
    pub output_tokens: f64,
}

/// Observed/advertised performance characteristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Performance {
    pub average_latency_ms: u32,
    pub tokens_per_second: f32,
}

/// Region and rollout status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub regions: Vec<String>,
    pub status: ModelStatus,
}

/// Optional provider-imposed throughput limits.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Limits {
    pub requests_per_minute: Option<u32>,
    pub requests_per_day: Option<u32>,
    pub tokens_per_minute: Option<u32>,
}

/// A registry entry describing one backend model (spec §3 `ModelMetadata`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub id: String,
    pub provider: String,
    pub name: String,
    pub display_name: String,
    pub description: String,

    pub context_window: u32,
    pub max_output_tokens: u32,

    pub capabilities: Vec<Capability>,
    pub pricing: Pricing,
    pub performance: Performance,
    pub availability: Availability,
    pub limits: Limits,
}

impl ModelMetadata {
    /// Checks the invariants of spec §4.1: non-empty capability set,
    /// positive context window, non-negative pricing.
    pub fn validate(&self) -> Result<(), String> {
        if self.capabilities.is_empty() {
            return Err("capabilities must be non-empty".to_string());
        }
        if self.context_window == 0 {
            return Err("context_window must be > 0".to_string());
        }
        if self.pricing.input_tokens < 0.0 || self.pricing.output_tokens < 0.0 {
            return Err("pricing must be non-negative".to_string());
        }
        Ok(())
    }

    pub fn has_capability(&self, cap: Capability) -> bool {
        self.capabilities.contains(&cap)
    }
}
