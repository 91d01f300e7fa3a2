//! Prioritization and business insights.
//!
//! Built on top of the aggregated scores:
//!
//! - [`PriorityClassifier`]: places each issue in the impact/effort matrix
//! - [`BusinessImpactEstimator`]: legal risk, revenue and time-to-value estimates
//! - [`RecommendationComposer`]: one advisory recommendation per priority bucket

mod business;
mod priority;
mod recommend;

pub use business::{
    time_range, BusinessImpactEstimator, BusinessInsights, LegalRiskTier, RevenueEstimate,
    TimeToValue, ESTIMATE_DISCLAIMER,
};
pub use priority::{
    bucket_for, Classification, ClassifiedIssue, PriorityBucket, PriorityClassifier,
    PriorityMatrix, HIGH_IMPACT_THRESHOLD, LOW_EFFORT_THRESHOLD, MAX_AXIS_SCORE,
};
pub use recommend::{
    BuiltinSnippets, CodeSample, CodeSampleError, CodeSampleProvider, IssueRef, Recommendation,
    RecommendationComposer, MAX_ISSUE_REFS,
};
