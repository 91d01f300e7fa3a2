//! The analysis engine: normalize, score, aggregate, prioritize, estimate.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use xxhash_rust::xxh3::xxh3_64;

use crate::config::{load_config_file, ScoringConfig, Validatable};
use crate::error::{AuditError, ErrorContext, Result};
use crate::insights::{
    BusinessImpactEstimator, PriorityClassifier, RecommendationComposer,
};
use crate::model::{Issue, OverallReport, PageContext};
use crate::normalize::{CategorySignal, Normalizer};
use crate::probe::ProbeRun;
use crate::scoring::{Aggregator, CategoryScorer, SCORING_ENGINE_VERSION};

/// Runs the full scoring pipeline over collected probe outcomes.
///
/// The engine holds only configuration; every call to [`Self::analyze`]
/// builds a fresh report and shares nothing with other runs.
#[derive(Debug, Clone)]
pub struct AuditEngine {
    config: ScoringConfig,
    normalizer: Normalizer,
    scorer: CategoryScorer,
    aggregator: Aggregator,
    classifier: PriorityClassifier,
    estimator: BusinessImpactEstimator,
    composer: RecommendationComposer,
}

impl Default for AuditEngine {
    fn default() -> Self {
        Self::build(ScoringConfig::default())
    }
}

impl AuditEngine {
    /// Create an engine after validating `config`.
    pub fn new(config: ScoringConfig) -> Result<Self> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(AuditError::config(
                format!("{} invalid setting(s)", errors.len()),
                errors,
            ));
        }
        Ok(Self::build(config))
    }

    /// Create an engine from a YAML configuration file.
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = load_config_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
        Self::new(config).with_context(|| format!("validating {}", path.display()))
    }

    fn build(config: ScoringConfig) -> Self {
        Self {
            normalizer: Normalizer::new(&config.normalization),
            scorer: CategoryScorer::new(&config),
            aggregator: Aggregator::new(&config),
            classifier: PriorityClassifier::new(&config),
            estimator: BusinessImpactEstimator::new(&config),
            composer: RecommendationComposer::new(),
            config,
        }
    }

    /// Replace the recommendation composer, e.g. to plug in a code sample provider.
    #[must_use]
    pub fn with_composer(mut self, composer: RecommendationComposer) -> Self {
        self.composer = composer;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Analyze one page, timestamped now.
    pub fn analyze(&self, runs: &[ProbeRun], context: &PageContext) -> OverallReport {
        self.analyze_at(runs, context, Utc::now())
    }

    /// Analyze one page with an explicit timestamp.
    ///
    /// Identical inputs always produce identical reports.
    pub fn analyze_at(
        &self,
        runs: &[ProbeRun],
        context: &PageContext,
        timestamp: DateTime<Utc>,
    ) -> OverallReport {
        let normalized = self.normalizer.normalize_runs(runs);

        let mut scores = Vec::with_capacity(normalized.len());
        let mut issues: Vec<Issue> = Vec::new();
        for item in normalized {
            scores.push(self.scorer.score(item.category, &item.signal));
            if let CategorySignal::Issues(found) = item.signal {
                issues.extend(found);
            }
        }

        let aggregate = self.aggregator.aggregate(scores, issues);
        let matrix = self.classifier.build_matrix(&aggregate.issues);
        let business_insights = self.estimator.estimate(&aggregate, &matrix, context);
        let recommendations =
            self.composer
                .compose(&aggregate, &matrix, &business_insights, context);

        let analysis_id = analysis_id(context.url.as_deref(), timestamp);
        match aggregate.overall_score.value() {
            Some(score) => tracing::info!(
                analysis_id = %analysis_id,
                score,
                issues = aggregate.issues.len(),
                "Page analysis complete"
            ),
            None => tracing::warn!(
                analysis_id = %analysis_id,
                "Page analysis produced insufficient data for an overall score"
            ),
        }

        OverallReport {
            analysis_id,
            timestamp,
            engine_version: SCORING_ENGINE_VERSION.to_string(),
            page: context.clone(),
            category_scores: aggregate.category_scores,
            overall_score: aggregate.overall_score,
            completeness: aggregate.completeness,
            issues: aggregate.issues,
            priority_matrix: matrix,
            business_insights,
            recommendations,
            notes: aggregate.notes,
        }
    }
}

/// Stable identifier for one analysis: xxh3 of url and timestamp, as hex.
#[must_use]
pub fn analysis_id(url: Option<&str>, timestamp: DateTime<Utc>) -> String {
    let input = format!(
        "{}|{}",
        url.unwrap_or_default(),
        timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    );
    format!("{:016x}", xxh3_64(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFileError;
    use crate::model::Category;
    use crate::probe::ProbeOutcome;
    use chrono::TimeZone;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ScoringConfig::builder().location_preview_limit(0).build();
        match AuditEngine::new(config) {
            Err(AuditError::Config { errors, .. }) => {
                assert!(errors.iter().any(|e| e.field.contains("location_preview_limit")));
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_config_file_has_context() {
        let err = AuditEngine::from_config_file(Path::new("/nonexistent/.page-audit.yaml")).unwrap_err();
        match err {
            AuditError::ConfigFile { context, source } => {
                assert!(context.starts_with("loading"));
                assert!(matches!(source, ConfigFileError::Io(_) | ConfigFileError::NotFound(_)));
            }
            other => panic!("expected config file error, got {other:?}"),
        }
    }

    #[test]
    fn test_analysis_id_stable() {
        let a = analysis_id(Some("https://example.com"), at());
        let b = analysis_id(Some("https://example.com"), at());
        let c = analysis_id(Some("https://example.org"), at());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let engine = AuditEngine::default();
        let runs = vec![
            ProbeRun::new(Category::Images, ProbeOutcome::from_value(json!({"totalImages": 3, "missingAlt": ["#hero"]}))),
            ProbeRun::new(Category::Forms, ProbeOutcome::failed("timeout")),
        ];
        let ctx = PageContext::new("https://example.com");
        let first = serde_json::to_string(&engine.analyze_at(&runs, &ctx, at())).unwrap();
        let second = serde_json::to_string(&engine.analyze_at(&runs, &ctx, at())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_runs_is_insufficient() {
        let report = AuditEngine::default().analyze_at(&[], &PageContext::default(), at());
        assert!(report.overall_score.is_insufficient());
        assert!(report.numeric_score().is_err());
        assert!(report.recommendations.is_empty());
    }
}
