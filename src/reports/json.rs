//! JSON report generator.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{ReportFormat, ReportGenerator};
use crate::error::{ErrorContext, Result};
use crate::insights::LegalRiskTier;
use crate::model::{Category, Completeness, OverallReport, OverallScore};

/// JSON report generator
#[derive(Debug, Clone)]
pub struct JsonReporter {
    /// Whether to only include summary
    summary_only: bool,
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            summary_only: false,
            pretty: true,
        }
    }

    /// Create a summary-only reporter
    #[must_use]
    pub const fn summary_only() -> Self {
        Self {
            summary_only: true,
            pretty: true,
        }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Load a full report previously written by this reporter.
    pub fn read(json: &str) -> Result<OverallReport> {
        serde_json::from_str(json).context("reading stored report")
    }

    fn to_string<T: Serialize>(&self, value: &T) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.context("rendering JSON report")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, report: &OverallReport) -> Result<String> {
        if self.summary_only {
            self.to_string(&JsonSummary::from_report(report))
        } else {
            self.to_string(report)
        }
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

/// Compact view of a report: scores and headline figures, no issue lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSummary {
    pub analysis_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub overall_score: OverallScore,
    pub completeness: Completeness,
    pub category_scores: IndexMap<Category, f32>,
    pub issue_count: usize,
    pub critical_issue_count: usize,
    pub quick_win_count: usize,
    pub legal_risk_tier: LegalRiskTier,
    pub notes: Vec<String>,
}

impl JsonSummary {
    #[must_use]
    pub fn from_report(report: &OverallReport) -> Self {
        Self {
            analysis_id: report.analysis_id.clone(),
            timestamp: report.timestamp,
            url: report.page.url.clone(),
            overall_score: report.overall_score,
            completeness: report.completeness.clone(),
            category_scores: report
                .category_scores
                .iter()
                .filter(|(_, s)| s.is_applicable())
                .map(|(c, s)| (*c, s.score))
                .collect(),
            issue_count: report.issues.len(),
            critical_issue_count: report.critical_issue_count(),
            quick_win_count: report.priority_matrix.quick_wins.len(),
            legal_risk_tier: report.business_insights.legal_risk_tier,
            notes: report.notes.clone(),
        }
    }
}
