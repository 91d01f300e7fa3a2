//! Benchmarks for the analysis engine.
//!
//! Run with: cargo bench --bench engine_benchmark

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use page_audit::model::{Category, PageContext, SiteType, TechStack};
use page_audit::normalize::Normalizer;
use page_audit::pipeline::AuditEngine;
use page_audit::probe::{ProbeOutcome, ProbeRun};
use serde_json::{json, Value};
use std::hint::black_box;

/// Findings with `elements` flagged elements per rule, for every category.
fn generate_runs(elements: usize) -> Vec<ProbeRun> {
    let refs = |prefix: &str| -> Value {
        (0..elements)
            .map(|i| json!({"selector": format!("{prefix}:nth-of-type({i})")}))
            .collect()
    };
    let generic: Vec<Value> = (0..elements.min(50))
        .map(|i| {
            json!({
                "id": format!("custom-rule-{}", i % 10),
                "severity": ["critical", "serious", "moderate", "minor"][i % 4],
                "nodes": [format!("#node-{i}")]
            })
        })
        .collect();

    vec![
        ProbeRun::new(
            Category::Aria,
            ProbeOutcome::from_value(json!({
                "missingAccessibleName": refs("button"),
                "invalidRoles": refs("div"),
                "landmarks": {"hasMain": false},
                "issues": generic
            })),
        ),
        ProbeRun::new(
            Category::Forms,
            ProbeOutcome::from_value(json!({
                "formCount": 2,
                "inputCount": elements,
                "unlabeledInputs": refs("input"),
                "placeholderAsLabel": refs("input.search")
            })),
        ),
        ProbeRun::new(
            Category::ColorContrast,
            ProbeOutcome::from_value(json!({
                "elementsChecked": elements * 4,
                "failures": (0..elements)
                    .map(|i| json!({"selector": format!("p.c{i}"), "ratio": 2.5 + (i % 20) as f64 / 10.0, "required": 4.5}))
                    .collect::<Vec<_>>()
            })),
        ),
        ProbeRun::new(
            Category::Images,
            ProbeOutcome::from_value(json!({"totalImages": elements * 2, "missingAlt": refs("img")})),
        ),
        ProbeRun::new(Category::Tables, ProbeOutcome::from_value(json!({"tableCount": 0}))),
        ProbeRun::new(Category::Keyboard, ProbeOutcome::failed("probe timed out")),
        ProbeRun::new(
            Category::Seo,
            ProbeOutcome::from_value(json!({"title": "Shop", "metaDescription": null, "hasCanonical": false})),
        ),
    ]
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let engine = AuditEngine::default();
    let ctx = PageContext::new("https://shop.example/category/shoes")
        .with_site_type(SiteType::Ecommerce)
        .with_tech_stack(TechStack::React);
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    for size in [10, 100, 1000] {
        let runs = generate_runs(size);
        group.bench_with_input(BenchmarkId::new("elements", size), &runs, |b, runs| {
            b.iter(|| engine.analyze_at(black_box(runs), black_box(&ctx), at));
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let normalizer = Normalizer::default();

    for size in [100, 1000] {
        let runs = generate_runs(size);
        group.bench_with_input(BenchmarkId::new("runs", size), &runs, |b, runs| {
            b.iter(|| normalizer.normalize_runs(black_box(runs)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_analyze, bench_normalize);
criterion_main!(benches);
