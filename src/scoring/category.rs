//! Capped-penalty category scorer.

use indexmap::IndexMap;

use crate::config::{FallbackConfig, PenaltyConfig, ScoringConfig};
use crate::model::{Category, CategoryScore, Deduction, Issue, ScoreStatus, Severity};
use crate::normalize::CategorySignal;

const MAX_SCORE: f32 = 100.0;

/// Scores one category from its normalized signal.
#[derive(Debug, Clone)]
pub struct CategoryScorer {
    penalties: PenaltyConfig,
    fallback: FallbackConfig,
}

impl Default for CategoryScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl CategoryScorer {
    /// Build a scorer from `config`.
    ///
    /// The config is not validated here; [`crate::pipeline::AuditEngine::new`]
    /// does that. A fallback outside the open range (0, 100) is still never
    /// used: the built-in neutral fallback replaces it at scoring time.
    #[must_use]
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            penalties: config.penalties.clone(),
            fallback: config.fallback.clone(),
        }
    }

    /// Score a category.
    ///
    /// A probe that ran and found nothing scores exactly 100. A failed probe
    /// gets the category's fallback score. A category that does not apply
    /// scores 100 and is marked so the aggregator can exclude it.
    pub fn score(&self, category: Category, signal: &CategorySignal) -> CategoryScore {
        match signal {
            CategorySignal::Issues(issues) => self.score_issues(category, issues),
            CategorySignal::NoSignal { reason } => CategoryScore {
                category,
                score: self.fallback_for(category),
                deductions: Vec::new(),
                status: ScoreStatus::NoSignal {
                    reason: reason.clone(),
                },
            },
            CategorySignal::NotApplicable { reason } => CategoryScore {
                category,
                score: MAX_SCORE,
                deductions: Vec::new(),
                status: ScoreStatus::NotApplicable {
                    reason: reason.clone(),
                },
            },
        }
    }

    /// Fallback for a failed probe, strictly between 0 and 100.
    fn fallback_for(&self, category: Category) -> f32 {
        let configured = self.fallback.score_for(category);
        if configured > 0.0 && configured < MAX_SCORE {
            return configured;
        }
        let neutral = FallbackConfig::default().default_score;
        tracing::warn!(
            category = %category,
            "Fallback score {configured} would read as a measured result; using {neutral}"
        );
        neutral
    }

    fn score_issues(&self, category: Category, issues: &[Issue]) -> CategoryScore {
        // Each kind is charged once, however many records report it.
        let mut kinds: IndexMap<String, (&str, usize, Severity)> = IndexMap::new();
        for issue in issues.iter().filter(|i| i.category == category) {
            let entry = kinds
                .entry(issue.kind_key())
                .or_insert((issue.id.as_str(), 0, issue.severity));
            entry.1 = entry.1.saturating_add(issue.occurrences);
            entry.2 = entry.2.max(issue.severity);
        }

        let deductions: Vec<Deduction> = kinds
            .into_iter()
            .filter_map(|(key, (id, occurrences, severity))| {
                let rule = self.penalties.rule_for(&key, severity);
                let amount = rule.deduction(occurrences);
                (amount > 0.0).then(|| Deduction {
                    reason: format!(
                        "{id}: {occurrences} {} x {} (cap {})",
                        if occurrences == 1 { "occurrence" } else { "occurrences" },
                        rule.per_occurrence,
                        rule.cap
                    ),
                    amount,
                })
            })
            .collect();

        let total: f32 = deductions.iter().map(|d| d.amount).sum();
        CategoryScore {
            category,
            score: (MAX_SCORE - total).clamp(0.0, MAX_SCORE),
            deductions,
            status: ScoreStatus::Measured,
        }
    }
}
