//! Impact/effort classification into the 2x2 priority matrix.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{PriorityConfig, ScoringConfig};
use crate::model::{Category, Issue};

/// Impact at or above which an issue counts as high impact
pub const HIGH_IMPACT_THRESHOLD: u8 = 7;
/// Effort at or below which an issue counts as low effort
pub const LOW_EFFORT_THRESHOLD: u8 = 3;
/// Upper bound of both axes
pub const MAX_AXIS_SCORE: u8 = 10;

/// Quadrant of the impact/effort matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriorityBucket {
    /// High impact, low effort
    QuickWin,
    /// High impact, high effort
    MajorProject,
    /// Low impact, low effort
    FillIn,
    /// Low impact, high effort
    Questionable,
}

impl PriorityBucket {
    /// Buckets in remediation order
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::QuickWin,
            Self::MajorProject,
            Self::FillIn,
            Self::Questionable,
        ]
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::QuickWin => "Quick Wins",
            Self::MajorProject => "Major Projects",
            Self::FillIn => "Fill-ins",
            Self::Questionable => "Questionable",
        }
    }

    /// 1 for quick wins through 4 for questionable work
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::QuickWin => 1,
            Self::MajorProject => 2,
            Self::FillIn => 3,
            Self::Questionable => 4,
        }
    }
}

impl fmt::Display for PriorityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bucket for an (impact, effort) pair.
///
/// The rule is the same for every category.
#[must_use]
pub const fn bucket_for(impact: u8, effort: u8) -> PriorityBucket {
    let high_impact = impact >= HIGH_IMPACT_THRESHOLD;
    let low_effort = effort <= LOW_EFFORT_THRESHOLD;
    match (high_impact, low_effort) {
        (true, true) => PriorityBucket::QuickWin,
        (true, false) => PriorityBucket::MajorProject,
        (false, true) => PriorityBucket::FillIn,
        (false, false) => PriorityBucket::Questionable,
    }
}

/// Impact and effort of one issue on a 0-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub impact_score: u8,
    pub effort_score: u8,
    pub bucket: PriorityBucket,
}

/// A classified issue, referring back to the report's issue list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedIssue {
    /// Index into `OverallReport::issues`
    pub issue_index: usize,
    pub category: Category,
    pub id: String,
    pub impact_score: u8,
    pub effort_score: u8,
}

/// Issues grouped by bucket, each group in report issue order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityMatrix {
    pub quick_wins: Vec<ClassifiedIssue>,
    pub major_projects: Vec<ClassifiedIssue>,
    pub fill_ins: Vec<ClassifiedIssue>,
    pub questionable: Vec<ClassifiedIssue>,
}

impl PriorityMatrix {
    #[must_use]
    pub fn bucket(&self, bucket: PriorityBucket) -> &[ClassifiedIssue] {
        match bucket {
            PriorityBucket::QuickWin => &self.quick_wins,
            PriorityBucket::MajorProject => &self.major_projects,
            PriorityBucket::FillIn => &self.fill_ins,
            PriorityBucket::Questionable => &self.questionable,
        }
    }

    fn bucket_mut(&mut self, bucket: PriorityBucket) -> &mut Vec<ClassifiedIssue> {
        match bucket {
            PriorityBucket::QuickWin => &mut self.quick_wins,
            PriorityBucket::MajorProject => &mut self.major_projects,
            PriorityBucket::FillIn => &mut self.fill_ins,
            PriorityBucket::Questionable => &mut self.questionable,
        }
    }

    /// Bucket an issue was placed in, by its index in the report
    #[must_use]
    pub fn bucket_of(&self, issue_index: usize) -> Option<PriorityBucket> {
        PriorityBucket::all()
            .iter()
            .copied()
            .find(|b| self.bucket(*b).iter().any(|c| c.issue_index == issue_index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        PriorityBucket::all().iter().map(|b| self.bucket(*b).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scores issues on impact and effort.
#[derive(Debug, Clone)]
pub struct PriorityClassifier {
    config: PriorityConfig,
}

impl Default for PriorityClassifier {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl PriorityClassifier {
    #[must_use]
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            config: config.priority.clone(),
        }
    }

    /// Classify one issue.
    #[must_use]
    pub fn classify(&self, issue: &Issue) -> Classification {
        let impact_score = self.impact(issue);
        let effort_score = self.effort(issue);
        Classification {
            impact_score,
            effort_score,
            bucket: bucket_for(impact_score, effort_score),
        }
    }

    /// Classify every issue into the matrix.
    #[must_use]
    pub fn build_matrix(&self, issues: &[Issue]) -> PriorityMatrix {
        let mut matrix = PriorityMatrix::default();
        for (issue_index, issue) in issues.iter().enumerate() {
            let c = self.classify(issue);
            matrix.bucket_mut(c.bucket).push(ClassifiedIssue {
                issue_index,
                category: issue.category,
                id: issue.id.clone(),
                impact_score: c.impact_score,
                effort_score: c.effort_score,
            });
        }
        tracing::debug!(
            quick_wins = matrix.quick_wins.len(),
            major_projects = matrix.major_projects.len(),
            fill_ins = matrix.fill_ins.len(),
            questionable = matrix.questionable.len(),
            "Built priority matrix"
        );
        matrix
    }

    fn impact(&self, issue: &Issue) -> u8 {
        let cfg = &self.config;
        let mut impact = cfg.severity_points.for_severity(issue.severity);
        let substantive = issue
            .user_benefit
            .as_deref()
            .is_some_and(|text| text.trim().chars().count() >= cfg.substantive_benefit_chars);
        if substantive {
            impact = impact.saturating_add(cfg.user_benefit_bonus);
        }
        if let Some(business) = issue.business_impact {
            impact = impact.saturating_add(cfg.business_impact_bonus.for_impact(business));
        }
        impact.min(MAX_AXIS_SCORE)
    }

    fn effort(&self, issue: &Issue) -> u8 {
        let cfg = &self.config;
        let mut effort = cfg
            .effort_bands
            .iter()
            .find(|band| issue.estimated_fix_minutes <= band.max_minutes)
            .map_or(cfg.effort_ceiling, |band| band.effort);
        if issue.category == Category::Technical {
            effort = effort.saturating_add(cfg.technical_bump);
        }
        if issue.occurrences > cfg.spread_threshold {
            effort = effort.saturating_add(cfg.spread_bump);
        }
        effort.min(MAX_AXIS_SCORE)
    }
}
