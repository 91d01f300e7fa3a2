//! Business impact estimates.
//!
//! Every figure here comes from fixed, configurable calibration constants.
//! They are estimates for prioritization, not measurements.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::priority::{PriorityBucket, PriorityMatrix};
use crate::config::{BusinessConfig, ScoringConfig};
use crate::model::{Issue, PageContext};
use crate::scoring::Aggregate;

/// Shown with every set of business insights.
pub const ESTIMATE_DISCLAIMER: &str = "All business figures are estimates derived from fixed \
     calibration constants. They indicate relative priority and are not measured outcomes.";

/// Legal exposure tier from the number of critical issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegalRiskTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for LegalRiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueEstimate {
    pub amount: f64,
    pub currency: String,
}

/// How soon fixing things starts paying off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeToValue {
    /// Summed fix estimate of all quick wins
    pub quick_win_minutes: u64,
    /// Summed fix estimate of all issues
    pub total_minutes: u64,
    /// Human range until the first improvements ship
    pub first_value: String,
    /// Human range for the whole backlog
    pub full_remediation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInsights {
    /// Estimated share of users affected, absent when there is no overall score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_impact_percent: Option<f32>,
    pub legal_risk_tier: LegalRiskTier,
    pub critical_issue_count: usize,
    /// Only estimated for commerce sites
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_revenue_loss: Option<RevenueEstimate>,
    pub time_to_value: TimeToValue,
    /// Industry the estimates were framed for, from the page context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub disclaimer: String,
}

/// Human range for a summed fix estimate.
#[must_use]
pub const fn time_range(minutes: u64) -> &'static str {
    match minutes {
        0..=60 => "under 1 hour",
        61..=240 => "1-4 hours",
        241..=480 => "1 day",
        481..=1440 => "2-3 days",
        1441..=2400 => "1 week",
        2401..=4800 => "1-2 weeks",
        _ => "2+ weeks",
    }
}

/// Summed fix minutes of a set of issues
pub(crate) fn total_minutes<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> u64 {
    issues
        .into_iter()
        .map(|i| u64::from(i.estimated_fix_minutes))
        .sum()
}

/// Derives business estimates from the scored report.
#[derive(Debug, Clone)]
pub struct BusinessImpactEstimator {
    config: BusinessConfig,
}

impl Default for BusinessImpactEstimator {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl BusinessImpactEstimator {
    #[must_use]
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            config: config.business.clone(),
        }
    }

    #[must_use]
    pub fn estimate(
        &self,
        aggregate: &Aggregate,
        matrix: &PriorityMatrix,
        context: &PageContext,
    ) -> BusinessInsights {
        let critical_issue_count = aggregate.critical_issue_count();

        let user_impact_percent = aggregate.overall_score.value().map(|overall| {
            let percent = ((100.0 - overall) * self.config.user_impact_factor).clamp(0.0, 100.0);
            (percent * 10.0).round() / 10.0
        });

        let estimated_revenue_loss = context.site_type.is_commerce().then(|| RevenueEstimate {
            amount: critical_issue_count as f64 * self.config.revenue_loss_per_critical,
            currency: self.config.currency.clone(),
        });

        let quick_win_minutes = total_minutes(
            matrix
                .bucket(PriorityBucket::QuickWin)
                .iter()
                .filter_map(|c| aggregate.issues.get(c.issue_index)),
        );
        let all_minutes = total_minutes(&aggregate.issues);
        // With no quick wins, value arrives with the first fix of any kind.
        let first_value_minutes = if quick_win_minutes > 0 {
            quick_win_minutes
        } else {
            aggregate
                .issues
                .iter()
                .map(|i| u64::from(i.estimated_fix_minutes))
                .min()
                .unwrap_or(0)
        };

        BusinessInsights {
            user_impact_percent,
            legal_risk_tier: self.legal_risk(critical_issue_count),
            critical_issue_count,
            estimated_revenue_loss,
            time_to_value: TimeToValue {
                quick_win_minutes,
                total_minutes: all_minutes,
                first_value: time_range(first_value_minutes).to_string(),
                full_remediation: time_range(all_minutes).to_string(),
            },
            industry: context
                .industry
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            disclaimer: ESTIMATE_DISCLAIMER.to_string(),
        }
    }

    fn legal_risk(&self, critical: usize) -> LegalRiskTier {
        if critical > self.config.legal_high_above {
            LegalRiskTier::High
        } else if critical > self.config.legal_medium_above {
            LegalRiskTier::Medium
        } else {
            LegalRiskTier::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Completeness, OverallScore, Severity, SiteType};
    use indexmap::IndexMap;

    fn aggregate(overall: OverallScore, criticals: usize) -> Aggregate {
        let issues = (0..criticals)
            .map(|i| Issue {
                id: format!("kind-{i}"),
                category: Category::Aria,
                severity: Severity::Critical,
                summary: String::new(),
                locations: Vec::new(),
                occurrences: 1,
                wcag_criterion: None,
                estimated_fix_minutes: 45,
                business_impact: None,
                user_benefit: None,
            })
            .collect();
        Aggregate {
            category_scores: IndexMap::new(),
            overall_score: overall,
            completeness: Completeness::Complete,
            issues,
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_time_ranges() {
        assert_eq!(time_range(0), "under 1 hour");
        assert_eq!(time_range(60), "under 1 hour");
        assert_eq!(time_range(61), "1-4 hours");
        assert_eq!(time_range(480), "1 day");
        assert_eq!(time_range(1000), "2-3 days");
        assert_eq!(time_range(2400), "1 week");
        assert_eq!(time_range(4000), "1-2 weeks");
        assert_eq!(time_range(10_000), "2+ weeks");
    }

    #[test]
    fn test_legal_risk_thresholds() {
        let estimator = BusinessImpactEstimator::default();
        assert_eq!(estimator.legal_risk(6), LegalRiskTier::High);
        assert_eq!(estimator.legal_risk(5), LegalRiskTier::Medium);
        assert_eq!(estimator.legal_risk(3), LegalRiskTier::Medium);
        assert_eq!(estimator.legal_risk(2), LegalRiskTier::Low);
    }

    #[test]
    fn test_revenue_only_for_commerce() {
        let estimator = BusinessImpactEstimator::default();
        let agg = aggregate(OverallScore::scored(60.0), 3);
        let matrix = PriorityMatrix::default();

        let shop = PageContext::new("https://shop.example").with_site_type(SiteType::Ecommerce);
        let insights = estimator.estimate(&agg, &matrix, &shop);
        let revenue = insights.estimated_revenue_loss.unwrap();
        assert_eq!(revenue.amount, 7500.0);
        assert_eq!(revenue.currency, "USD");

        let blog = PageContext::new("https://blog.example").with_site_type(SiteType::Content);
        let insights = estimator.estimate(&agg, &matrix, &blog);
        assert!(insights.estimated_revenue_loss.is_none());
        let json = serde_json::to_value(&insights).unwrap();
        assert!(json.get("estimatedRevenueLoss").is_none());
        assert!(json.get("industry").is_none());
    }

    #[test]
    fn test_industry_carried_from_context() {
        let estimator = BusinessImpactEstimator::default();
        let agg = aggregate(OverallScore::scored(80.0), 1);
        let ctx = PageContext::new("https://clinic.example").with_industry("  healthcare ");
        let insights = estimator.estimate(&agg, &PriorityMatrix::default(), &ctx);
        assert_eq!(insights.industry.as_deref(), Some("healthcare"));

        let blank = PageContext::default().with_industry(" ");
        let insights = estimator.estimate(&agg, &PriorityMatrix::default(), &blank);
        assert_eq!(insights.industry, None);
    }

    #[test]
    fn test_user_impact_needs_overall_score() {
        let estimator = BusinessImpactEstimator::default();
        let ctx = PageContext::default();
        let matrix = PriorityMatrix::default();

        let insights = estimator.estimate(&aggregate(OverallScore::scored(70.0), 0), &matrix, &ctx);
        assert_eq!(insights.user_impact_percent, Some(6.0));

        let insights = estimator.estimate(&aggregate(OverallScore::InsufficientData, 0), &matrix, &ctx);
        assert_eq!(insights.user_impact_percent, None);
        assert!(insights.disclaimer.contains("estimates"));
    }

    #[test]
    fn test_time_to_value_without_quick_wins() {
        let estimator = BusinessImpactEstimator::default();
        let insights = estimator.estimate(
            &aggregate(OverallScore::scored(50.0), 8),
            &PriorityMatrix::default(),
            &PageContext::default(),
        );
        assert_eq!(insights.time_to_value.quick_win_minutes, 0);
        assert_eq!(insights.time_to_value.total_minutes, 360);
        assert_eq!(insights.time_to_value.first_value, "under 1 hour");
        assert_eq!(insights.time_to_value.full_remediation, "1 day");
    }
}
