//! Weighted aggregation of category scores.

use indexmap::IndexMap;

use crate::config::{ScoringConfig, WeightsConfig};
use crate::model::{Category, CategoryScore, Completeness, Issue, OverallScore, ScoreStatus};

/// Scored categories and the overall score, before prioritization.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub category_scores: IndexMap<Category, CategoryScore>,
    pub overall_score: OverallScore,
    pub completeness: Completeness,
    /// All issues, grouped in category order
    pub issues: Vec<Issue>,
    pub notes: Vec<String>,
}

impl Aggregate {
    #[must_use]
    pub fn critical_issue_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_critical()).count()
    }
}

/// Combines category scores into one overall score.
#[derive(Debug, Clone)]
pub struct Aggregator {
    weights: WeightsConfig,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl Aggregator {
    #[must_use]
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            weights: config.weights.clone(),
        }
    }

    /// Aggregate category scores.
    ///
    /// Not-applicable categories are excluded and their weight is spread
    /// over the remaining categories. Fallback scores of failed probes are
    /// included. With nothing applicable or nothing measured the overall
    /// score is [`OverallScore::InsufficientData`].
    ///
    /// Issues are reordered so categories appear in score order; order
    /// within a category is preserved.
    pub fn aggregate(&self, category_scores: Vec<CategoryScore>, mut issues: Vec<Issue>) -> Aggregate {
        let mut scores: IndexMap<Category, CategoryScore> = IndexMap::with_capacity(category_scores.len());
        for score in category_scores {
            if scores.contains_key(&score.category) {
                tracing::warn!(category = %score.category, "Duplicate category score; keeping the first");
                continue;
            }
            scores.insert(score.category, score);
        }

        issues.sort_by_key(|issue| scores.get_index_of(&issue.category).unwrap_or(usize::MAX));

        let overall_score = self.overall(&scores);
        let no_signal: Vec<Category> = scores
            .values()
            .filter(|s| s.is_no_signal())
            .map(|s| s.category)
            .collect();
        let measured = scores.values().filter(|s| s.is_measured()).count();

        let completeness = if no_signal.is_empty() {
            Completeness::Complete
        } else if measured == 0 {
            Completeness::Incomplete
        } else {
            Completeness::Partial { no_signal }
        };

        let mut notes: Vec<String> = scores
            .values()
            .filter_map(|s| match &s.status {
                ScoreStatus::NoSignal { reason } => Some(format!(
                    "Analysis incomplete for {}: {reason}",
                    s.category.name()
                )),
                ScoreStatus::Measured | ScoreStatus::NotApplicable { .. } => None,
            })
            .collect();
        if overall_score.is_insufficient() {
            notes.push("Not enough data to compute an overall score".to_string());
        }

        tracing::debug!(
            categories = scores.len(),
            measured,
            issues = issues.len(),
            "Aggregated category scores"
        );

        Aggregate {
            category_scores: scores,
            overall_score,
            completeness,
            issues,
            notes,
        }
    }

    fn overall(&self, scores: &IndexMap<Category, CategoryScore>) -> OverallScore {
        if !scores.values().any(CategoryScore::is_measured) {
            return OverallScore::InsufficientData;
        }

        let (weighted, total_weight) = scores
            .values()
            .filter(|s| s.is_applicable())
            .map(|s| (s.score, self.weights.weight_for(s.category).max(0.0)))
            .fold((0.0_f32, 0.0_f32), |(sum, total), (score, weight)| {
                (sum + score * weight, total + weight)
            });

        if total_weight <= 0.0 {
            return OverallScore::InsufficientData;
        }

        let value = (weighted / total_weight).clamp(0.0, 100.0);
        OverallScore::scored((value * 10.0).round() / 10.0)
    }
}
