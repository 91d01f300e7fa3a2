//! Recommendation composition.
//!
//! One advisory recommendation per non-empty priority bucket. Code samples
//! are an optional enrichment from a [`CodeSampleProvider`]; a provider that
//! fails only costs the sample, never the recommendation.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::business::{time_range, total_minutes, BusinessInsights, LegalRiskTier};
use super::priority::{ClassifiedIssue, PriorityBucket, PriorityMatrix};
use crate::model::{Category, Issue, PageContext, Severity, TechStack};
use crate::scoring::Aggregate;

/// Issues referenced per recommendation
pub const MAX_ISSUE_REFS: usize = 5;

/// Pointer from a recommendation to one report issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRef {
    /// Index into `OverallReport::issues`
    pub issue_index: usize,
    pub category: Category,
    pub id: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSample {
    pub issue_id: String,
    pub language: String,
    pub code: String,
}

/// Advisory text for one priority bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// 1 = do first
    pub priority: u8,
    pub bucket: PriorityBucket,
    pub title: String,
    pub description: String,
    pub business_impact: String,
    /// Human range from the summed fix estimates, e.g. "1-2 weeks"
    pub time_estimate: String,
    pub total_fix_minutes: u64,
    pub issue_count: usize,
    /// Highest-impact issues of the bucket
    pub issues: Vec<IssueRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_sample: Option<CodeSample>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodeSampleError {
    #[error("no sample for '{issue_id}' on {stack}")]
    Unsupported { issue_id: String, stack: String },

    #[error("sample generation failed: {0}")]
    Failed(String),
}

/// Source of fix snippets for a technology stack.
pub trait CodeSampleProvider: Send + Sync {
    /// Sample for an issue, `Ok(None)` when there is nothing to show.
    fn sample(&self, stack: TechStack, issue: &Issue) -> Result<Option<CodeSample>, CodeSampleError>;
}

/// Built-in snippets for the most common fixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSnippets;

impl CodeSampleProvider for BuiltinSnippets {
    fn sample(&self, stack: TechStack, issue: &Issue) -> Result<Option<CodeSample>, CodeSampleError> {
        let code = match (issue.id.as_str(), stack) {
            ("missing-alt", TechStack::React) => {
                r#"<img src={product.image} alt={product.name} />"#
            }
            ("missing-alt", TechStack::Vue) => r#"<img :src="product.image" :alt="product.name" />"#,
            ("missing-alt", TechStack::Angular) => {
                r#"<img [src]="product.image" [alt]="product.name" />"#
            }
            ("missing-alt", TechStack::Svelte) => r#"<img src={product.image} alt={product.name} />"#,
            ("missing-alt", _) => r#"<img src="/img/blue-sneaker.jpg" alt="Blue running sneaker, side view" />"#,

            ("missing-label", TechStack::React) => {
                "<label htmlFor=\"email\">Email address</label>\n<input id=\"email\" type=\"email\" autoComplete=\"email\" />"
            }
            ("missing-label", _) => {
                "<label for=\"email\">Email address</label>\n<input id=\"email\" type=\"email\" autocomplete=\"email\" />"
            }

            ("missing-accessible-name", TechStack::React) => {
                "<button aria-label=\"Close dialog\" onClick={onClose}>\n  <CloseIcon aria-hidden=\"true\" />\n</button>"
            }
            ("missing-accessible-name", TechStack::Angular) => {
                "<button [attr.aria-label]=\"closeLabel\" (click)=\"close()\">\n  <svg aria-hidden=\"true\">...</svg>\n</button>"
            }
            ("missing-accessible-name", _) => {
                "<button type=\"button\" aria-label=\"Close dialog\">\n  <svg aria-hidden=\"true\">...</svg>\n</button>"
            }

            ("zoom-disabled" | "missing-viewport", _) => {
                r#"<meta name="viewport" content="width=device-width, initial-scale=1" />"#
            }
            ("missing-lang", TechStack::React | TechStack::Vue | TechStack::Angular | TechStack::Svelte) => {
                "<!-- index.html -->\n<html lang=\"en\">"
            }
            ("missing-lang", _) => r#"<html lang="en">"#,
            ("missing-skip-link", _) => {
                "<a class=\"skip-link\" href=\"#main\">Skip to main content</a>\n...\n<main id=\"main\">"
            }
            ("missing-meta-description", _) => {
                r#"<meta name="description" content="Hand-made leather bags, shipped free across Europe." />"#
            }
            _ => {
                return Err(CodeSampleError::Unsupported {
                    issue_id: issue.id.clone(),
                    stack: stack.name().to_string(),
                })
            }
        };

        Ok(Some(CodeSample {
            issue_id: issue.id.clone(),
            language: stack.snippet_language().to_string(),
            code: code.to_string(),
        }))
    }
}

/// Turns the priority matrix into ordered recommendations.
#[derive(Clone)]
pub struct RecommendationComposer {
    provider: Option<Arc<dyn CodeSampleProvider>>,
}

impl std::fmt::Debug for RecommendationComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationComposer")
            .field("code_samples", &self.provider.is_some())
            .finish()
    }
}

impl Default for RecommendationComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationComposer {
    /// Composer using the built-in snippets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: Some(Arc::new(BuiltinSnippets)),
        }
    }

    #[must_use]
    pub fn with_provider(provider: Arc<dyn CodeSampleProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    #[must_use]
    pub const fn without_code_samples() -> Self {
        Self { provider: None }
    }

    /// One recommendation per non-empty bucket, quick wins first.
    #[must_use]
    pub fn compose(
        &self,
        aggregate: &Aggregate,
        matrix: &PriorityMatrix,
        insights: &BusinessInsights,
        context: &PageContext,
    ) -> Vec<Recommendation> {
        PriorityBucket::all()
            .iter()
            .filter(|bucket| !matrix.bucket(**bucket).is_empty())
            .map(|bucket| self.compose_bucket(*bucket, matrix.bucket(*bucket), aggregate, insights, context))
            .collect()
    }

    fn compose_bucket(
        &self,
        bucket: PriorityBucket,
        classified: &[ClassifiedIssue],
        aggregate: &Aggregate,
        insights: &BusinessInsights,
        context: &PageContext,
    ) -> Recommendation {
        let issues: Vec<&Issue> = classified
            .iter()
            .filter_map(|c| aggregate.issues.get(c.issue_index))
            .collect();
        let total_fix_minutes = total_minutes(issues.iter().copied());

        // Highest impact first, then cheapest; ties keep report order.
        let mut ranked: Vec<&ClassifiedIssue> = classified.iter().collect();
        ranked.sort_by(|a, b| {
            b.impact_score
                .cmp(&a.impact_score)
                .then(a.effort_score.cmp(&b.effort_score))
        });
        let refs: Vec<IssueRef> = ranked
            .iter()
            .filter_map(|c| {
                aggregate.issues.get(c.issue_index).map(|issue| IssueRef {
                    issue_index: c.issue_index,
                    category: issue.category,
                    id: issue.id.clone(),
                    summary: issue.summary.clone(),
                })
            })
            .take(MAX_ISSUE_REFS)
            .collect();

        let code_sample = context
            .tech_stack
            .and_then(|stack| self.code_sample(stack, &refs, aggregate));

        Recommendation {
            priority: bucket.rank(),
            bucket,
            title: title(bucket, classified.len()),
            description: description(bucket, &issues),
            business_impact: business_impact(bucket, &issues, insights),
            time_estimate: time_range(total_fix_minutes).to_string(),
            total_fix_minutes,
            issue_count: classified.len(),
            issues: refs,
            code_sample,
        }
    }

    /// First sample the provider can produce for the referenced issues.
    fn code_sample(&self, stack: TechStack, refs: &[IssueRef], aggregate: &Aggregate) -> Option<CodeSample> {
        let provider = self.provider.as_ref()?;
        refs.iter()
            .filter_map(|r| aggregate.issues.get(r.issue_index))
            .find_map(|issue| match provider.sample(stack, issue) {
                Ok(sample) => sample,
                Err(CodeSampleError::Unsupported { .. }) => None,
                Err(e) => {
                    tracing::warn!(issue = %issue.id, "Skipping code sample: {e}");
                    None
                }
            })
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn title(bucket: PriorityBucket, count: usize) -> String {
    match bucket {
        PriorityBucket::QuickWin => format!("Quick wins: fix {} first", plural(count, "high-impact issue")),
        PriorityBucket::MajorProject => {
            format!("Plan a project for {}", plural(count, "high-impact issue"))
        }
        PriorityBucket::FillIn => format!("Fill in {} between other work", plural(count, "small fix")),
        PriorityBucket::Questionable => {
            format!("Revisit {} later", plural(count, "costly low-impact issue"))
        }
    }
}

fn description(bucket: PriorityBucket, issues: &[&Issue]) -> String {
    let categories: BTreeSet<Category> = issues.iter().map(|i| i.category).collect();
    let names: Vec<&str> = categories.iter().map(Category::name).collect();
    let scope = match names.len() {
        0 => String::new(),
        1 => format!(" in {}", names[0]),
        _ => format!(" across {}", names.join(", ")),
    };
    let body = match bucket {
        PriorityBucket::QuickWin => "They affect users noticeably and each takes little effort to fix.",
        PriorityBucket::MajorProject => {
            "They affect users noticeably but need design or engineering time to resolve properly."
        }
        PriorityBucket::FillIn => "Each is cheap to fix; batch them with related changes.",
        PriorityBucket::Questionable => {
            "The effort is high relative to the benefit; address them once higher priorities are done."
        }
    };
    format!("{}{scope}. {body}", plural(issues.len(), "issue"))
}

fn business_impact(bucket: PriorityBucket, issues: &[&Issue], insights: &BusinessInsights) -> String {
    let mut text = match bucket {
        PriorityBucket::QuickWin => "Fast, visible improvement for affected users",
        PriorityBucket::MajorProject => "Removes significant barriers for affected users",
        PriorityBucket::FillIn => "Incremental polish that adds up over time",
        PriorityBucket::Questionable => "Limited return for the effort involved",
    }
    .to_string();

    let critical = issues.iter().filter(|i| i.severity == Severity::Critical).count();
    if critical > 0 {
        text.push_str(&format!("; resolves {}", plural(critical, "critical issue")));
        if insights.legal_risk_tier >= LegalRiskTier::Medium {
            text.push_str(&format!(" behind the {} legal risk", insights.legal_risk_tier));
        }
        if let Some(revenue) = &insights.estimated_revenue_loss {
            if insights.critical_issue_count > 0 {
                let share = revenue.amount * critical as f64 / insights.critical_issue_count as f64;
                text.push_str(&format!(
                    " and an estimated {} {share:.0} in revenue at risk",
                    revenue.currency
                ));
            }
        }
    }
    match &insights.industry {
        Some(industry) => text.push_str(&format!(" (estimate for a {industry} business)")),
        None => text.push_str(" (estimate)"),
    }
    text
}
