//! Selector throughput benchmark, adapted from the teacher's
//! `benches/performance_benchmarks.rs` criterion harness.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use llm_orchestrator::registry::seed_default_catalog;
use llm_orchestrator::selection::{default_policies, Scorer, Selector};
use llm_orchestrator::types::{
    Capability, LatencyClass, ModelMetadata, ModelRequirements, PrivacyLevel, TaskComplexity, TaskType,
};
use std::hint::black_box;

fn catalog_of(size: usize) -> Vec<ModelMetadata> {
    let seed = seed_default_catalog();
    (0..size)
        .map(|i| {
            let base = &seed[i % seed.len()];
            ModelMetadata {
                id: format!("{}-{}", base.id, i),
                ..base.clone()
            }
        })
        .collect()
}

fn requirements() -> ModelRequirements {
    ModelRequirements {
        task_type: TaskType::SimpleQa,
        task_complexity: TaskComplexity::Simple,
        context_window: 2_000,
        latency_requirement: LatencyClass::Medium,
        privacy_level: PrivacyLevel::Public,
        capabilities: vec![Capability::Chat],
        max_cost: None,
        preferred_provider: None,
        policy_weights: None,
    }
}

fn bench_selector(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector_select");

    for size in [10usize, 100, 500] {
        let candidates = catalog_of(size);
        let selector = Selector::new(Scorer::new(default_policies()));
        let requirements = requirements();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("select", size), &size, |b, _| {
            b.iter(|| black_box(selector.select(&candidates, &requirements, None)));
        });
    }

    group.finish();
}

fn bench_registry_lookup(c: &mut Criterion) {
    use llm_orchestrator::registry::ModelRegistry;

    let mut group = c.benchmark_group("registry_list_by_requirements");

    for size in [10usize, 100, 1_000] {
        let registry = ModelRegistry::new();
        for model in catalog_of(size) {
            registry.register(model).unwrap();
        }
        let requirements = requirements();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("list_by_requirements", size), &size, |b, _| {
            b.iter(|| black_box(registry.list_by_requirements(&requirements)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_selector, bench_registry_lookup);
criterion_main!(benches);
