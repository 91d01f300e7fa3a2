//! Scores and the final report handed to renderers.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Category, Issue, PageContext};
use crate::error::{AuditError, ReportErrorKind, Result};
use crate::insights::{BusinessInsights, PriorityMatrix, Recommendation};

/// One line of a category's deduction ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    pub reason: String,
    pub amount: f32,
}

/// How a category score was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScoreStatus {
    /// The probe ran and its findings were scored
    Measured,
    /// The probe failed; the score is the category's neutral fallback
    NoSignal { reason: String },
    /// Nothing on the page this category could apply to
    NotApplicable { reason: String },
}

/// Bounded score for one category. Immutable once built by the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: Category,
    /// Score in `[0, 100]`
    pub score: f32,
    pub deductions: Vec<Deduction>,
    pub status: ScoreStatus,
}

impl CategoryScore {
    #[must_use]
    pub const fn is_applicable(&self) -> bool {
        !matches!(self.status, ScoreStatus::NotApplicable { .. })
    }

    #[must_use]
    pub const fn is_measured(&self) -> bool {
        matches!(self.status, ScoreStatus::Measured)
    }

    #[must_use]
    pub const fn is_no_signal(&self) -> bool {
        matches!(self.status, ScoreStatus::NoSignal { .. })
    }

    /// Sum of all deductions applied
    #[must_use]
    pub fn total_deducted(&self) -> f32 {
        self.deductions.iter().map(|d| d.amount).sum()
    }
}

/// Letter grade for an overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Grade {
    /// Excellent: 90-100
    A,
    /// Good: 80-89
    B,
    /// Fair: 70-79
    C,
    /// Poor: 60-69
    D,
    /// Failing: <60
    F,
}

impl Grade {
    /// Create grade from score
    #[must_use]
    pub fn from_score(score: f32) -> Self {
        match score as u32 {
            90..=100 => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }

    #[must_use]
    pub const fn letter(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::A => "Excellent",
            Self::B => "Good",
            Self::C => "Fair",
            Self::D => "Poor",
            Self::F => "Failing",
        }
    }
}

/// Overall page score, or the explicit sentinel for "nothing to average".
///
/// Callers must check for `InsufficientData` before rendering a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum OverallScore {
    Scored { value: f32, grade: Grade },
    InsufficientData,
}

impl OverallScore {
    #[must_use]
    pub fn scored(value: f32) -> Self {
        Self::Scored {
            value,
            grade: Grade::from_score(value),
        }
    }

    #[must_use]
    pub const fn value(&self) -> Option<f32> {
        match self {
            Self::Scored { value, .. } => Some(*value),
            Self::InsufficientData => None,
        }
    }

    #[must_use]
    pub const fn is_insufficient(&self) -> bool {
        matches!(self, Self::InsufficientData)
    }
}

/// Whether every probe contributed a signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Completeness {
    Complete,
    /// Some categories only carry fallback scores
    Partial {
        #[serde(rename = "noSignal")]
        no_signal: Vec<Category>,
    },
    /// No category could be scored from real findings
    Incomplete,
}

/// The complete result of one analysis run.
///
/// Built once by [`crate::pipeline::AuditEngine`] and never mutated after.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct OverallReport {
    /// Stable identifier for persistence, derived from url and timestamp
    pub analysis_id: String,
    pub timestamp: DateTime<Utc>,
    pub engine_version: String,
    pub page: PageContext,
    pub category_scores: IndexMap<Category, CategoryScore>,
    pub overall_score: OverallScore,
    pub completeness: Completeness,
    pub issues: Vec<Issue>,
    pub priority_matrix: PriorityMatrix,
    pub business_insights: BusinessInsights,
    pub recommendations: Vec<Recommendation>,
    /// User-visible notes such as "analysis incomplete for forms"
    pub notes: Vec<String>,
}

impl OverallReport {
    /// Categories that only carry a fallback score
    pub fn incomplete_categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.category_scores
            .values()
            .filter(|s| s.is_no_signal())
            .map(|s| s.category)
    }

    /// The overall score as a number, for renderers that must show one.
    pub fn numeric_score(&self) -> Result<f32> {
        self.overall_score.value().ok_or_else(|| {
            AuditError::report(
                format!("analysis {}", self.analysis_id),
                ReportErrorKind::InsufficientData(self.notes.join("; ")),
            )
        })
    }

    #[must_use]
    pub fn critical_issue_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_critical()).count()
    }

    #[must_use]
    pub fn issues_in(&self, category: Category) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.category == category).collect()
    }
}
