//! End-to-end tests for the analysis engine.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use page_audit::config::{ConfigPreset, ScoringConfig};
use page_audit::error::ProbeError;
use page_audit::insights::{LegalRiskTier, PriorityBucket};
use page_audit::model::{
    Category, Completeness, OverallReport, PageContext, ScoreStatus, Severity, SiteType, TechStack,
};
use page_audit::pipeline::AuditEngine;
use page_audit::probe::{Probe, ProbeOutcome, ProbeRun, ProbeRunner, RawFindings};
use page_audit::reports::{JsonReporter, ReportGenerator};
use serde_json::{json, Value};

/// Route engine logs to the test output; set `RUST_LOG=page_audit=debug` to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_test_writer()
        .try_init();
}

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap()
}

fn completed(category: Category, findings: Value) -> ProbeRun {
    ProbeRun::new(category, ProbeOutcome::from_value(findings))
}

/// Six distinct critical ARIA issues; the first one is cheap to fix.
fn six_critical_aria() -> ProbeRun {
    completed(
        Category::Aria,
        json!({
            "missingAccessibleName": ["button.add-to-cart", "button.qty-plus"],
            "ariaHiddenFocusable": [{"selector": "div.modal a.close"}],
            "issues": [
                {"id": "aria-required-children", "severity": "critical", "nodes": ["ul[role=menu]"]},
                {"id": "aria-valid-attr-value", "impact": "blocker", "nodes": ["#size-select"]},
                {"id": "aria-dialog-name", "severity": "error", "count": 2, "fixMinutes": 20},
                {"id": "aria-input-field-name", "severity": "critical", "selectors": ["#search"]}
            ]
        }),
    )
}

fn analyze(runs: &[ProbeRun], ctx: &PageContext) -> OverallReport {
    AuditEngine::default().analyze_at(runs, ctx, at())
}

#[test]
fn ecommerce_page_with_six_critical_aria_issues() {
    init_tracing();
    let runs = vec![
        six_critical_aria(),
        completed(Category::Tables, json!({"tableCount": 0})),
    ];
    let ctx = PageContext::new("https://shop.example/product/42")
        .with_site_type(SiteType::Ecommerce)
        .with_tech_stack(TechStack::React);

    let report = analyze(&runs, &ctx);

    assert_eq!(report.critical_issue_count(), 6);
    assert_eq!(report.business_insights.legal_risk_tier, LegalRiskTier::High);

    let revenue = report
        .business_insights
        .estimated_revenue_loss
        .as_ref()
        .expect("commerce pages carry a revenue estimate");
    assert_eq!(revenue.amount, 15_000.0);

    let quick_aria: Vec<_> = report
        .priority_matrix
        .quick_wins
        .iter()
        .filter(|c| c.category == Category::Aria)
        .collect();
    assert!(!quick_aria.is_empty());
    assert!(quick_aria.iter().all(|c| c.effort_score <= 3));

    // Tables do not apply and are excluded from the overall score.
    assert!(!report.category_scores[&Category::Tables].is_applicable());
    assert_eq!(
        report.overall_score.value(),
        Some(report.category_scores[&Category::Aria].score)
    );

    assert_eq!(report.recommendations[0].bucket, PriorityBucket::QuickWin);
    assert!(report.recommendations[0].code_sample.is_some());
}

#[test]
fn failed_probe_reports_fallback_and_note() {
    init_tracing();
    let runs = vec![
        completed(Category::Images, json!({"totalImages": 2})),
        ProbeRun::new(
            Category::Forms,
            Err::<RawFindings, _>(ProbeError::Navigation("frame detached".to_string())).into(),
        ),
    ];
    let report = analyze(&runs, &PageContext::default());

    let forms = &report.category_scores[&Category::Forms];
    assert_eq!(forms.score, 50.0);
    assert!(matches!(forms.status, ScoreStatus::NoSignal { .. }));
    assert_eq!(report.category_scores[&Category::Images].score, 100.0);
    assert_eq!(report.overall_score.value(), Some(75.0));
    assert_eq!(
        report.completeness,
        Completeness::Partial {
            no_signal: vec![Category::Forms]
        }
    );
    assert!(report.notes[0].starts_with("Analysis incomplete for Forms"));
    assert!(report.issues.is_empty());
}

#[test]
fn inapplicable_category_does_not_change_overall_score() {
    let base = vec![
        six_critical_aria(),
        completed(Category::Seo, json!({"robotsNoindex": false, "hasCanonical": false})),
    ];
    let mut with_tables = base.clone();
    with_tables.push(completed(Category::Tables, json!({"tableCount": 0})));

    let ctx = PageContext::new("https://example.com");
    let a = analyze(&base, &ctx);
    let b = analyze(&with_tables, &ctx);
    assert_eq!(a.overall_score, b.overall_score);
    assert_eq!(b.category_scores.len(), 3);
}

#[test]
fn all_probes_failed_is_insufficient_data() {
    let runs = vec![
        ProbeRun::new(Category::Aria, ProbeOutcome::failed("timeout")),
        ProbeRun::new(Category::Seo, ProbeOutcome::from_value(Value::Null)),
    ];
    let report = analyze(&runs, &PageContext::default());

    assert!(report.overall_score.is_insufficient());
    assert_eq!(report.completeness, Completeness::Incomplete);
    assert!(report.numeric_score().is_err());
    assert_eq!(report.business_insights.user_impact_percent, None);
    assert!(report
        .notes
        .iter()
        .any(|n| n.contains("Not enough data")));
}

#[test]
fn self_reported_error_is_not_a_clean_pass() {
    let runs = vec![
        completed(
            Category::Seo,
            json!({"error": "selector engine crashed", "score": 0, "issues": []}),
        ),
        completed(
            Category::Technical,
            json!({"issues": [{"id": "x", "count": 1e30}, {"id": "x", "count": 1e30}]}),
        ),
    ];
    let report = analyze(&runs, &PageContext::default());

    let seo = &report.category_scores[&Category::Seo];
    assert_eq!(seo.score, 50.0);
    assert!(seo.is_no_signal());
    assert!(report.category_scores[&Category::Technical].score < 100.0);
    assert_eq!(report.issues[0].occurrences, usize::MAX);
}

#[test]
fn only_inapplicable_categories_is_insufficient_data() {
    let runs = vec![
        completed(Category::Tables, json!({"tableCount": 0})),
        completed(Category::Images, json!({"totalImages": 0})),
    ];
    let report = analyze(&runs, &PageContext::default());
    assert!(report.overall_score.is_insufficient());
    assert_eq!(report.completeness, Completeness::Complete);
}

#[test]
fn clean_page_scores_100() {
    let runs = vec![
        completed(Category::Aria, json!({"missingAccessibleName": [], "landmarks": {"hasMain": true}})),
        completed(Category::Keyboard, json!({"interactiveCount": 0})),
    ];
    let report = analyze(&runs, &PageContext::default());
    assert_eq!(report.overall_score.value(), Some(100.0));
    assert!(report.recommendations.is_empty());
    assert!(report.priority_matrix.is_empty());
}

#[test]
fn issues_follow_category_order_of_runs() {
    let runs = vec![
        completed(Category::Seo, json!({"robotsNoindex": true})),
        completed(Category::Images, json!({"totalImages": 1, "missingAlt": ["img.hero"]})),
        completed(Category::Seo, json!({"hasCanonical": false})),
    ];
    let report = analyze(&runs, &PageContext::default());
    let order: Vec<(Category, &str)> = report
        .issues
        .iter()
        .map(|i| (i.category, i.id.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            (Category::Seo, "noindex"),
            (Category::Seo, "missing-canonical"),
            (Category::Images, "missing-alt"),
        ]
    );
}

#[test]
fn report_is_deterministic_for_fixed_timestamp() {
    let runs = vec![six_critical_aria()];
    let ctx = PageContext::new("https://example.com").with_site_type(SiteType::Saas);
    let a = serde_json::to_value(analyze(&runs, &ctx)).unwrap();
    let b = serde_json::to_value(analyze(&runs, &ctx)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn strict_preset_scores_lower() {
    let runs = vec![completed(
        Category::Navigation,
        json!({"emptyLinks": ["a.icon"], "brokenLinks": ["a[href='/old']"]}),
    )];
    let ctx = PageContext::default();

    let balanced = AuditEngine::default().analyze_at(&runs, &ctx, at());
    let strict = AuditEngine::new(ScoringConfig::from_preset(ConfigPreset::Strict))
        .unwrap()
        .analyze_at(&runs, &ctx, at());

    let b = balanced.overall_score.value().unwrap();
    let s = strict.overall_score.value().unwrap();
    assert!(s < b, "strict {s} should be below balanced {b}");
}

#[test]
fn config_file_overrides_penalties() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "penalties:\n  overrides:\n    images/missing-alt:\n      per_occurrence: 1\n      cap: 2\nfallback:\n  default_score: 40"
    )
    .unwrap();

    let engine = AuditEngine::from_config_file(file.path()).unwrap();
    let runs = vec![
        completed(Category::Images, json!({"totalImages": 9, "missingAlt": 9})),
        ProbeRun::new(Category::Forms, ProbeOutcome::failed("timeout")),
    ];
    let report = engine.analyze_at(&runs, &PageContext::default(), at());

    assert_eq!(report.category_scores[&Category::Images].score, 98.0);
    assert_eq!(report.category_scores[&Category::Forms].score, 40.0);
}

#[test]
fn invalid_config_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "fallback:\n  default_score: 100").unwrap();
    assert!(AuditEngine::from_config_file(file.path()).is_err());
}

struct StaticProbe {
    category: Category,
    findings: Value,
}

impl Probe for StaticProbe {
    fn category(&self) -> Category {
        self.category
    }

    fn inspect(&self) -> Result<RawFindings, ProbeError> {
        Ok(RawFindings::new(self.findings.clone()))
    }
}

struct StuckProbe;

impl Probe for StuckProbe {
    fn category(&self) -> Category {
        Category::Technical
    }

    fn inspect(&self) -> Result<RawFindings, ProbeError> {
        std::thread::sleep(Duration::from_millis(400));
        Ok(RawFindings::new(json!({"consoleErrors": 3})))
    }
}

#[test]
fn probe_runner_feeds_engine() {
    init_tracing();
    let probes: Vec<Arc<dyn Probe>> = vec![
        Arc::new(StaticProbe {
            category: Category::Mobile,
            findings: json!({"hasViewportMeta": true, "viewportBlocksZoom": true}),
        }),
        Arc::new(StuckProbe),
    ];
    let runs = ProbeRunner::new(Duration::from_millis(100)).run(&probes);
    let report = analyze(&runs, &PageContext::default());

    let mobile = &report.category_scores[&Category::Mobile];
    assert_eq!(mobile.score, 85.0);
    assert_eq!(report.issues[0].severity, Severity::Critical);
    assert!(report.category_scores[&Category::Technical].is_no_signal());
}

#[test]
fn stored_report_reads_back() {
    let runs = vec![six_critical_aria()];
    let report = analyze(&runs, &PageContext::new("https://example.com"));
    let dir = tempfile::tempdir().unwrap();
    let path = JsonReporter::new().write_to_dir(&report, dir.path()).unwrap();

    let restored = JsonReporter::read(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(restored.analysis_id, report.analysis_id);
    assert_eq!(restored.timestamp, report.timestamp);
    assert_eq!(restored.overall_score, report.overall_score);
    assert_eq!(restored.priority_matrix, report.priority_matrix);
}
