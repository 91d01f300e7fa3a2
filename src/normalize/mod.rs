//! Issue normalization.
//!
//! Converts each probe's opaque findings into canonical [`Issue`] records.
//! Every category has a registered [`ProbeMapping`] (see [`mapping_for`])
//! describing its raw shape. Normalization never fails: malformed parts of a
//! payload are skipped with a warning and whatever can be read is kept.

mod fields;
mod mappings;

pub use mappings::{mapping_for, ProbeMapping};

use std::sync::LazyLock;

use indexmap::IndexMap;
use rayon::prelude::*;
use regex::Regex;
use serde_json::Value;

use crate::config::NormalizationConfig;
use crate::model::{BusinessImpact, Category, Issue, Severity};
use crate::probe::{ProbeOutcome, ProbeRun};
use mappings::EmptyPageRule;

static WCAG_CRITERION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+\.\d+\.\d+)\b").expect("static regex"));

/// Partially read issue, before canonicalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct IssueDraft {
    pub id: Option<String>,
    pub severity: Option<Severity>,
    pub summary: Option<String>,
    pub locations: Vec<String>,
    pub occurrences: Option<usize>,
    pub wcag_criterion: Option<String>,
    pub fix_minutes: Option<u32>,
    pub business_impact: Option<BusinessImpact>,
    pub user_benefit: Option<String>,
}

/// What a category's probe told us.
#[derive(Debug, Clone, PartialEq)]
pub enum CategorySignal {
    /// The probe ran; the list may be empty
    Issues(Vec<Issue>),
    /// Nothing on the page this category applies to
    NotApplicable { reason: String },
    /// The probe failed or returned nothing usable
    NoSignal { reason: String },
}

impl CategorySignal {
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Issues(issues) => issues,
            Self::NotApplicable { .. } | Self::NoSignal { .. } => &[],
        }
    }

    /// Combine two signals reported for the same category.
    ///
    /// Findings win over markers; not-applicable wins over no-signal.
    fn merge(self, other: Self, normalizer: &Normalizer) -> Self {
        match (self, other) {
            (Self::Issues(mut a), Self::Issues(b)) => {
                a.extend(b);
                Self::Issues(normalizer.merge_duplicates(a))
            }
            (issues @ Self::Issues(_), _) | (_, issues @ Self::Issues(_)) => issues,
            (na @ Self::NotApplicable { .. }, _) | (_, na @ Self::NotApplicable { .. }) => na,
            (first @ Self::NoSignal { .. }, Self::NoSignal { .. }) => first,
        }
    }
}

/// Normalized signal for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCategory {
    pub category: Category,
    pub signal: CategorySignal,
}

/// Converts probe outcomes into canonical issues.
#[derive(Debug, Clone)]
pub struct Normalizer {
    location_preview_limit: usize,
    default_fix_minutes: u32,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NormalizationConfig::default())
    }
}

impl Normalizer {
    #[must_use]
    pub fn new(config: &NormalizationConfig) -> Self {
        Self {
            location_preview_limit: config.location_preview_limit.max(1),
            default_fix_minutes: config.default_fix_minutes,
        }
    }

    /// Canonical issues found by one probe.
    ///
    /// A failed probe, or one whose category does not apply to the page,
    /// yields an empty list. Use [`Self::normalize_outcome`] to tell those
    /// apart from a clean result.
    #[must_use]
    pub fn normalize(&self, category: Category, outcome: &ProbeOutcome) -> Vec<Issue> {
        match self.normalize_outcome(category, outcome).signal {
            CategorySignal::Issues(issues) => issues,
            CategorySignal::NotApplicable { .. } | CategorySignal::NoSignal { .. } => Vec::new(),
        }
    }

    /// Normalize one probe outcome into its category signal.
    #[must_use]
    pub fn normalize_outcome(&self, category: Category, outcome: &ProbeOutcome) -> NormalizedCategory {
        let signal = match outcome {
            ProbeOutcome::Failed(failure) => CategorySignal::NoSignal {
                reason: failure.reason.clone(),
            },
            ProbeOutcome::Completed(findings) => self.map_findings(category, findings.as_value()),
        };
        NormalizedCategory { category, signal }
    }

    /// Normalize a batch of probe runs in parallel.
    ///
    /// Runs reporting the same category are merged. Output follows the order
    /// in which categories first appear in `runs`.
    #[must_use]
    pub fn normalize_runs(&self, runs: &[ProbeRun]) -> Vec<NormalizedCategory> {
        let normalized: Vec<NormalizedCategory> = runs
            .par_iter()
            .map(|run| self.normalize_outcome(run.category, &run.outcome))
            .collect();

        let mut by_category: IndexMap<Category, CategorySignal> = IndexMap::new();
        for item in normalized {
            match by_category.get_mut(&item.category) {
                Some(existing) => {
                    let current = std::mem::replace(existing, CategorySignal::Issues(Vec::new()));
                    *existing = current.merge(item.signal, self);
                }
                None => {
                    by_category.insert(item.category, item.signal);
                }
            }
        }

        by_category
            .into_iter()
            .map(|(category, signal)| NormalizedCategory { category, signal })
            .collect()
    }

    fn map_findings(&self, category: Category, root: &Value) -> CategorySignal {
        if !root.is_object() {
            tracing::warn!(
                category = %category,
                "Probe findings are not an object; treating as no signal"
            );
            return CategorySignal::NoSignal {
                reason: "probe findings had an unexpected shape".to_string(),
            };
        }

        let mapping = mapping_for(category);
        if let Some((rule, reason)) = mapping.applicability.and_then(|a| a.evaluate(root)) {
            tracing::debug!(category = %category, "Category does not apply: {reason}");
            return match rule {
                EmptyPageRule::NotApplicable => CategorySignal::NotApplicable {
                    reason: reason.to_string(),
                },
                EmptyPageRule::NothingToFail => CategorySignal::Issues(Vec::new()),
            };
        }

        let mut drafts = mapping.drafts(root);
        drafts.extend(fields::generic_issues(root));

        let total = drafts.len();
        let issues: Vec<Issue> = drafts
            .into_iter()
            .filter_map(|draft| self.canonicalize(category, draft))
            .collect();
        if issues.len() < total {
            tracing::debug!(
                category = %category,
                "Skipped {} issue entries without an id or occurrences",
                total - issues.len()
            );
        }

        // An error reported next to no findings means nothing was measured.
        if issues.is_empty() {
            if let Some(error) = root.get("error").filter(|e| !e.is_null()) {
                let reason = error
                    .as_str()
                    .map_or_else(|| error.to_string(), str::to_string);
                tracing::warn!(category = %category, "Probe reported an error and no findings: {reason}");
                return CategorySignal::NoSignal { reason };
            }
        }

        CategorySignal::Issues(self.merge_duplicates(issues))
    }

    /// Enforce the canonical shape on one draft.
    fn canonicalize(&self, category: Category, draft: IssueDraft) -> Option<Issue> {
        let id = draft.id.as_deref().and_then(canonical_id)?;

        let occurrences = match draft.occurrences {
            Some(0) if draft.locations.is_empty() => return None,
            Some(count) => count.max(draft.locations.len()),
            None => draft.locations.len().max(1),
        };

        let mut locations = draft.locations;
        locations.truncate(self.location_preview_limit);

        let wcag_criterion = draft.wcag_criterion.as_deref().and_then(|raw| {
            let found = WCAG_CRITERION.captures(raw).map(|c| c[1].to_string());
            if found.is_none() {
                tracing::debug!(category = %category, "Ignoring malformed WCAG criterion '{raw}'");
            }
            found
        });

        let summary = draft
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| humanize(&id));

        Some(Issue {
            id,
            category,
            severity: draft.severity.unwrap_or_default(),
            summary,
            locations,
            occurrences,
            wcag_criterion,
            estimated_fix_minutes: draft.fix_minutes.unwrap_or(self.default_fix_minutes),
            business_impact: draft.business_impact,
            user_benefit: draft.user_benefit.filter(|s| !s.trim().is_empty()),
        })
    }

    /// Merge issues sharing an id, keeping first-seen order.
    fn merge_duplicates(&self, issues: Vec<Issue>) -> Vec<Issue> {
        let mut merged: IndexMap<String, Issue> = IndexMap::with_capacity(issues.len());
        for issue in issues {
            match merged.get_mut(&issue.id) {
                Some(existing) => {
                    existing.occurrences = existing.occurrences.saturating_add(issue.occurrences);
                    let room = self.location_preview_limit.saturating_sub(existing.locations.len());
                    existing
                        .locations
                        .extend(issue.locations.into_iter().take(room));
                    existing.severity = existing.severity.max(issue.severity);
                    existing.wcag_criterion = existing.wcag_criterion.take().or(issue.wcag_criterion);
                    existing.business_impact = existing.business_impact.or(issue.business_impact);
                    existing.user_benefit = existing.user_benefit.take().or(issue.user_benefit);
                }
                None => {
                    merged.insert(issue.id.clone(), issue);
                }
            }
        }
        merged.into_values().collect()
    }
}

/// Kebab-case issue id: `buttonName`, `button_name` and `Button Name` all
/// become `button-name`.
fn canonical_id(raw: &str) -> Option<String> {
    let mut id = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && prev_lower {
                id.push('-');
            }
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            id.push(c.to_ascii_lowercase());
        } else if !id.ends_with('-') && !id.is_empty() {
            id.push('-');
            prev_lower = false;
        }
    }
    let id = id.trim_end_matches('-').to_string();
    (!id.is_empty()).then_some(id)
}

fn humanize(id: &str) -> String {
    let text = id.replace('-', " ");
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn completed(value: Value) -> ProbeOutcome {
        ProbeOutcome::from_value(value)
    }

    #[test]
    fn test_canonical_id() {
        assert_eq!(canonical_id("buttonName").as_deref(), Some("button-name"));
        assert_eq!(canonical_id("button_name").as_deref(), Some("button-name"));
        assert_eq!(canonical_id("  Button Name ").as_deref(), Some("button-name"));
        assert_eq!(canonical_id("wcag2.4.4").as_deref(), Some("wcag2-4-4"));
        assert_eq!(canonical_id("  --  "), None);
    }

    #[test]
    fn test_failure_marker_yields_no_issues() {
        let normalizer = Normalizer::default();
        let outcome = ProbeOutcome::failed("timed out");
        assert!(normalizer.normalize(Category::Forms, &outcome).is_empty());
        assert_eq!(
            normalizer.normalize_outcome(Category::Forms, &outcome).signal,
            CategorySignal::NoSignal {
                reason: "timed out".to_string()
            }
        );
    }

    #[test]
    fn test_locations_truncated_but_occurrences_kept() {
        let normalizer = Normalizer::default();
        let selectors: Vec<String> = (0..12).map(|i| format!("img:nth-of-type({i})")).collect();
        let issues = normalizer.normalize(
            Category::Images,
            &completed(json!({"totalImages": 20, "missingAlt": selectors})),
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].locations.len(), 5);
        assert_eq!(issues[0].occurrences, 12);
        assert_eq!(issues[0].wcag_criterion.as_deref(), Some("1.1.1"));
    }

    #[test]
    fn test_defaults_applied() {
        let normalizer = Normalizer::default();
        let issues = normalizer.normalize(
            Category::Technical,
            &completed(json!({"issues": [{"id": "mixed_content", "wcag": "n/a"}]})),
        );
        assert_eq!(issues[0].id, "mixed-content");
        assert_eq!(issues[0].severity, Severity::Moderate);
        assert_eq!(issues[0].estimated_fix_minutes, 30);
        assert_eq!(issues[0].occurrences, 1);
        assert_eq!(issues[0].summary, "Mixed content");
        assert_eq!(issues[0].wcag_criterion, None);
    }

    #[test]
    fn test_duplicates_merge() {
        let normalizer = Normalizer::default();
        let issues = normalizer.normalize(
            Category::Aria,
            &completed(json!({
                "missingAccessibleName": ["#a", "#b"],
                "issues": [
                    {"id": "missing-accessible-name", "severity": "minor", "selectors": ["#c"]},
                    {"id": "region", "severity": "moderate", "count": 0}
                ]
            })),
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].occurrences, 3);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].locations, vec!["#a", "#b", "#c"]);
    }

    #[test]
    fn test_applicability_rules() {
        let normalizer = Normalizer::default();
        let tables = normalizer.normalize_outcome(Category::Tables, &completed(json!({"tableCount": 0})));
        assert!(matches!(tables.signal, CategorySignal::NotApplicable { .. }));

        let keyboard =
            normalizer.normalize_outcome(Category::Keyboard, &completed(json!({"interactiveCount": 0})));
        assert_eq!(keyboard.signal, CategorySignal::Issues(Vec::new()));
    }

    #[test]
    fn test_non_object_payload_is_no_signal() {
        let normalizer = Normalizer::default();
        let result = normalizer.normalize_outcome(Category::Seo, &completed(json!([1, 2, 3])));
        assert!(matches!(result.signal, CategorySignal::NoSignal { .. }));
    }

    #[test]
    fn test_runs_merge_by_category_in_first_seen_order() {
        let normalizer = Normalizer::default();
        let runs = vec![
            ProbeRun::new(Category::Seo, ProbeOutcome::failed("navigation failed")),
            ProbeRun::new(Category::Tables, completed(json!({"tableCount": 0}))),
            ProbeRun::new(Category::Seo, completed(json!({"robotsNoindex": true}))),
        ];
        let normalized = normalizer.normalize_runs(&runs);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].category, Category::Seo);
        assert_eq!(normalized[0].signal.issues().len(), 1);
        assert_eq!(normalized[1].category, Category::Tables);
    }

    #[test]
    fn test_signal_merge_precedence() {
        let normalizer = Normalizer::default();
        let na = CategorySignal::NotApplicable {
            reason: "no tables".to_string(),
        };
        let none = CategorySignal::NoSignal {
            reason: "timeout".to_string(),
        };
        assert_eq!(none.clone().merge(na.clone(), &normalizer), na);
        assert_eq!(
            na.merge(CategorySignal::Issues(Vec::new()), &normalizer),
            CategorySignal::Issues(Vec::new())
        );
    }
}
