//! Per-probe mappings from raw findings to issue drafts.
//!
//! Each category registers one [`ProbeMapping`]: a table of rules over the
//! probe's documented payload fields, an optional applicability rule and
//! an optional function for findings that need arithmetic (contrast ratios,
//! readability scores, text lengths). Every probe may additionally report
//! a generic `issues` array, which the normalizer reads for all categories.
//!
//! Raw shapes, by category (all fields optional):
//!
//! | Category | Fields |
//! |---|---|
//! | aria | `missingAccessibleName`, `ariaHiddenFocusable`, `invalidRoles`, `duplicateIds`, `redundantRoles`, `landmarks.hasMain` |
//! | forms | `formCount`, `inputCount`, `unlabeledInputs`, `errorsNotAssociated`, `requiredWithoutIndicator`, `placeholderAsLabel`, `missingAutocomplete` |
//! | keyboard | `interactiveCount`, `keyboardTraps`, `notFocusable`, `focusIndicatorMissing`, `positiveTabindex`, `skipLinkPresent` |
//! | color-contrast | `elementsChecked`, `failures[{selector, ratio, required}]` |
//! | images | `totalImages`, `missingAlt`, `complexWithoutDescription`, `suspiciousAlt`, `decorativeNotHidden` |
//! | tables | `tableCount`, `missingHeaders`, `headersWithoutScope`, `layoutTables`, `missingCaption` |
//! | structure | `h1Count`, `skippedLevels`, `missingLang`, `missingTitle` |
//! | navigation | `emptyLinks`, `brokenLinks`, `ambiguousLinkText`, `hasCurrentPageIndicator` |
//! | content-structure | `emptyHeadings`, `fakeLists`, `wallsOfText` |
//! | text-readability | `fleschScore`, `averageSentenceLength`, `smallText`, `justifiedText`, `allCapsBlocks` |
//! | mobile | `hasViewportMeta`, `viewportBlocksZoom`, `horizontalScroll`, `smallTouchTargets` |
//! | seo | `title`, `metaDescription`, `robotsNoindex`, `hasCanonical`, `missingOpenGraph` |
//! | technical | `consoleErrors`, `renderBlockingResources` |
//!
//! Element-list fields accept an array of selectors, an array of element
//! descriptors (`{selector}`, `{target}`, ...) or a bare count.

use serde_json::Value;

use super::fields::{as_bool, as_count, as_f64, element_refs, first_str, lookup};
use super::IssueDraft;
use crate::model::{BusinessImpact, Category, Severity};

// ============================================================================
// Mapping building blocks
// ============================================================================

/// Static description of the issue a rule emits.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Template {
    pub id: &'static str,
    pub severity: Severity,
    pub summary: &'static str,
    pub wcag: Option<&'static str>,
    pub fix_minutes: Option<u32>,
    pub business_impact: Option<BusinessImpact>,
    pub user_benefit: Option<&'static str>,
}

const fn issue(severity: Severity, id: &'static str, summary: &'static str) -> Template {
    Template {
        id,
        severity,
        summary,
        wcag: None,
        fix_minutes: None,
        business_impact: None,
        user_benefit: None,
    }
}

impl Template {
    const fn wcag(self, criterion: &'static str) -> Self {
        Self {
            wcag: Some(criterion),
            ..self
        }
    }

    const fn minutes(self, minutes: u32) -> Self {
        Self {
            fix_minutes: Some(minutes),
            ..self
        }
    }

    const fn impact(self, impact: BusinessImpact) -> Self {
        Self {
            business_impact: Some(impact),
            ..self
        }
    }

    const fn benefit(self, text: &'static str) -> Self {
        Self {
            user_benefit: Some(text),
            ..self
        }
    }

    pub(crate) fn draft(&self) -> IssueDraft {
        IssueDraft {
            id: Some(self.id.to_string()),
            severity: Some(self.severity),
            summary: Some(self.summary.to_string()),
            wcag_criterion: self.wcag.map(str::to_string),
            fix_minutes: self.fix_minutes,
            business_impact: self.business_impact,
            user_benefit: self.user_benefit.map(str::to_string),
            ..IssueDraft::default()
        }
    }
}

/// What makes a rule fire.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Trigger {
    /// Element list (or count) at a path; one occurrence per element
    Elements(&'static str),
    /// Boolean at a path equal to the given value
    Flag(&'static str, bool),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Rule {
    pub trigger: Trigger,
    pub template: Template,
}

const fn elements(path: &'static str, template: Template) -> Rule {
    Rule {
        trigger: Trigger::Elements(path),
        template,
    }
}

const fn flag(path: &'static str, fires_when: bool, template: Template) -> Rule {
    Rule {
        trigger: Trigger::Flag(path, fires_when),
        template,
    }
}

/// What a category means when the page has nothing for it to inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EmptyPageRule {
    /// Excluded from the overall score
    NotApplicable,
    /// Nothing to fail, so the category scores a clean 100
    NothingToFail,
}

/// Fires when every listed count is present and zero.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Applicability {
    pub counts: &'static [&'static str],
    pub rule: EmptyPageRule,
    pub reason: &'static str,
}

impl Applicability {
    pub(crate) fn evaluate(&self, root: &Value) -> Option<(EmptyPageRule, &'static str)> {
        let all_zero = self
            .counts
            .iter()
            .all(|path| lookup(root, path).and_then(as_count) == Some(0));
        all_zero.then_some((self.rule, self.reason))
    }
}

type DeriveFn = fn(&Value, &mut Vec<IssueDraft>);

/// Registered normalization for one probe category.
#[derive(Debug, Clone, Copy)]
pub struct ProbeMapping {
    pub category: Category,
    pub(crate) applicability: Option<Applicability>,
    pub(crate) rules: &'static [Rule],
    pub(crate) derive: Option<DeriveFn>,
}

impl ProbeMapping {
    /// Apply rule table and derive function to a payload.
    pub(crate) fn drafts(&self, root: &Value) -> Vec<IssueDraft> {
        let mut drafts = Vec::new();
        for rule in self.rules {
            match rule.trigger {
                Trigger::Elements(path) => {
                    if let Some((refs, count)) = lookup(root, path).and_then(element_refs) {
                        if count > 0 {
                            let mut draft = rule.template.draft();
                            draft.locations = refs;
                            draft.occurrences = Some(count);
                            drafts.push(draft);
                        }
                    }
                }
                Trigger::Flag(path, fires_when) => {
                    if lookup(root, path).and_then(as_bool) == Some(fires_when) {
                        drafts.push(rule.template.draft());
                    }
                }
            }
        }
        if let Some(derive) = self.derive {
            derive(root, &mut drafts);
        }
        drafts
    }
}

// ============================================================================
// Registered mappings
// ============================================================================

const ARIA_RULES: &[Rule] = &[
    elements(
        "missingAccessibleName",
        issue(Severity::Critical, "missing-accessible-name", "Interactive elements have no accessible name")
            .wcag("4.1.2")
            .minutes(15)
            .benefit("Screen reader users can tell what each control does before activating it"),
    ),
    elements(
        "ariaHiddenFocusable",
        issue(Severity::Critical, "aria-hidden-focusable", "Focusable elements are hidden from assistive technology")
            .wcag("4.1.2")
            .minutes(15),
    ),
    elements(
        "invalidRoles",
        issue(Severity::Serious, "invalid-role", "Elements use ARIA roles that do not exist")
            .wcag("4.1.2")
            .minutes(15),
    ),
    flag(
        "/landmarks/hasMain",
        false,
        issue(Severity::Serious, "missing-main-landmark", "Page has no main landmark")
            .wcag("1.3.1")
            .minutes(30)
            .benefit("Keyboard and screen reader users can jump straight to the content"),
    ),
    elements(
        "duplicateIds",
        issue(Severity::Moderate, "duplicate-id", "IDs referenced by ARIA attributes are not unique")
            .wcag("4.1.1")
            .minutes(10),
    ),
    elements(
        "redundantRoles",
        issue(Severity::Minor, "redundant-role", "Elements repeat their implicit ARIA role").minutes(5),
    ),
];

const FORMS_RULES: &[Rule] = &[
    elements(
        "unlabeledInputs",
        issue(Severity::Critical, "missing-label", "Form fields have no programmatic label")
            .wcag("1.3.1")
            .minutes(10)
            .impact(BusinessImpact::High)
            .benefit("Every visitor can complete sign-up and checkout forms with assistive technology"),
    ),
    elements(
        "errorsNotAssociated",
        issue(Severity::Serious, "error-not-associated", "Validation errors are not linked to their fields")
            .wcag("3.3.1")
            .minutes(60)
            .impact(BusinessImpact::Medium),
    ),
    elements(
        "requiredWithoutIndicator",
        issue(Severity::Moderate, "required-not-indicated", "Required fields are not marked as required")
            .wcag("3.3.2")
            .minutes(15),
    ),
    elements(
        "placeholderAsLabel",
        issue(Severity::Moderate, "placeholder-as-label", "Placeholders are used instead of labels")
            .wcag("3.3.2")
            .minutes(15),
    ),
    elements(
        "missingAutocomplete",
        issue(Severity::Minor, "missing-autocomplete", "Personal data fields lack autocomplete hints")
            .wcag("1.3.5")
            .minutes(5),
    ),
];

const KEYBOARD_RULES: &[Rule] = &[
    elements(
        "keyboardTraps",
        issue(Severity::Critical, "keyboard-trap", "Keyboard focus cannot leave some components")
            .wcag("2.1.2")
            .minutes(120)
            .impact(BusinessImpact::High),
    ),
    elements(
        "notFocusable",
        issue(Severity::Critical, "not-focusable", "Interactive elements cannot be reached with the keyboard")
            .wcag("2.1.1")
            .minutes(30)
            .benefit("Keyboard-only users can operate every control on the page"),
    ),
    elements(
        "focusIndicatorMissing",
        issue(Severity::Serious, "missing-focus-indicator", "Focused elements show no visible indicator")
            .wcag("2.4.7")
            .minutes(30),
    ),
    elements(
        "positiveTabindex",
        issue(Severity::Moderate, "positive-tabindex", "Positive tabindex values disturb the focus order")
            .wcag("2.4.3")
            .minutes(10),
    ),
    flag(
        "skipLinkPresent",
        false,
        issue(Severity::Moderate, "missing-skip-link", "No link to skip repeated navigation")
            .wcag("2.4.1")
            .minutes(30),
    ),
];

const IMAGES_RULES: &[Rule] = &[
    elements(
        "missingAlt",
        issue(Severity::Critical, "missing-alt", "Images have no text alternative")
            .wcag("1.1.1")
            .minutes(5)
            .impact(BusinessImpact::Medium)
            .benefit("Blind visitors and search engines understand what each image shows"),
    ),
    elements(
        "complexWithoutDescription",
        issue(Severity::Serious, "missing-long-description", "Charts and diagrams have no long description")
            .wcag("1.1.1")
            .minutes(60),
    ),
    elements(
        "suspiciousAlt",
        issue(Severity::Moderate, "suspicious-alt", "Alt text looks like a file name or placeholder")
            .wcag("1.1.1")
            .minutes(5),
    ),
    elements(
        "decorativeNotHidden",
        issue(Severity::Minor, "decorative-not-hidden", "Decorative images are announced to screen readers")
            .wcag("1.1.1")
            .minutes(5),
    ),
];

const TABLES_RULES: &[Rule] = &[
    elements(
        "missingHeaders",
        issue(Severity::Serious, "missing-headers", "Data tables have no header cells")
            .wcag("1.3.1")
            .minutes(30),
    ),
    elements(
        "headersWithoutScope",
        issue(Severity::Moderate, "header-missing-scope", "Header cells do not declare their scope")
            .wcag("1.3.1")
            .minutes(15),
    ),
    elements(
        "layoutTables",
        issue(Severity::Moderate, "layout-table", "Tables are used for page layout")
            .wcag("1.3.2")
            .minutes(240),
    ),
    elements(
        "missingCaption",
        issue(Severity::Minor, "missing-caption", "Data tables have no caption")
            .wcag("1.3.1")
            .minutes(10),
    ),
];

const STRUCTURE_RULES: &[Rule] = &[
    flag(
        "missingLang",
        true,
        issue(Severity::Serious, "missing-lang", "Document language is not declared")
            .wcag("3.1.1")
            .minutes(5),
    ),
    flag(
        "missingTitle",
        true,
        issue(Severity::Serious, "missing-title", "Document has no title")
            .wcag("2.4.2")
            .minutes(5),
    ),
    elements(
        "skippedLevels",
        issue(Severity::Moderate, "skipped-heading-level", "Heading levels are skipped")
            .wcag("1.3.1")
            .minutes(15),
    ),
];

const NAVIGATION_RULES: &[Rule] = &[
    elements(
        "emptyLinks",
        issue(Severity::Serious, "empty-link", "Links have no text")
            .wcag("2.4.4")
            .minutes(10),
    ),
    elements(
        "brokenLinks",
        issue(Severity::Serious, "broken-link", "Links point to missing pages")
            .minutes(15)
            .impact(BusinessImpact::Medium),
    ),
    elements(
        "ambiguousLinkText",
        issue(Severity::Moderate, "ambiguous-link-text", "Link text such as \"click here\" gives no context")
            .wcag("2.4.4")
            .minutes(10),
    ),
    flag(
        "hasCurrentPageIndicator",
        false,
        issue(Severity::Minor, "missing-current-page-indicator", "Navigation does not mark the current page")
            .minutes(30),
    ),
];

const CONTENT_STRUCTURE_RULES: &[Rule] = &[
    elements(
        "emptyHeadings",
        issue(Severity::Moderate, "empty-heading", "Headings contain no text")
            .wcag("2.4.6")
            .minutes(5),
    ),
    elements(
        "fakeLists",
        issue(Severity::Minor, "fake-list", "List-like content is not marked up as a list")
            .wcag("1.3.1")
            .minutes(15),
    ),
    elements(
        "wallsOfText",
        issue(Severity::Minor, "wall-of-text", "Long passages have no headings or paragraphs").minutes(60),
    ),
];

const TEXT_READABILITY_RULES: &[Rule] = &[
    elements(
        "smallText",
        issue(Severity::Moderate, "small-text", "Body text is smaller than 12px")
            .wcag("1.4.4")
            .minutes(15),
    ),
    elements(
        "justifiedText",
        issue(Severity::Minor, "justified-text", "Fully justified text creates uneven spacing")
            .wcag("1.4.8")
            .minutes(5),
    ),
    elements(
        "allCapsBlocks",
        issue(Severity::Minor, "all-caps-text", "Long passages are set in capitals").minutes(5),
    ),
];

const MOBILE_RULES: &[Rule] = &[
    flag(
        "viewportBlocksZoom",
        true,
        issue(Severity::Critical, "zoom-disabled", "Viewport settings prevent pinch zoom")
            .wcag("1.4.4")
            .minutes(5)
            .impact(BusinessImpact::Medium)
            .benefit("Low-vision visitors can enlarge text on their phones"),
    ),
    flag(
        "hasViewportMeta",
        false,
        issue(Severity::Serious, "missing-viewport", "Page has no responsive viewport declaration")
            .wcag("1.4.10")
            .minutes(10)
            .impact(BusinessImpact::High),
    ),
    flag(
        "horizontalScroll",
        true,
        issue(Severity::Serious, "horizontal-scroll", "Content scrolls horizontally on small screens")
            .wcag("1.4.10")
            .minutes(240),
    ),
    elements(
        "smallTouchTargets",
        issue(Severity::Moderate, "small-touch-target", "Touch targets are smaller than 24x24px")
            .wcag("2.5.8")
            .minutes(30),
    ),
];

const SEO_RULES: &[Rule] = &[
    flag(
        "robotsNoindex",
        true,
        issue(Severity::Critical, "noindex", "Page tells search engines not to index it")
            .minutes(5)
            .impact(BusinessImpact::High),
    ),
    flag(
        "hasCanonical",
        false,
        issue(Severity::Moderate, "missing-canonical", "Page declares no canonical URL").minutes(10),
    ),
    elements(
        "missingOpenGraph",
        issue(Severity::Minor, "missing-open-graph", "Open Graph tags for social sharing are missing")
            .minutes(15)
            .impact(BusinessImpact::Low),
    ),
];

const TECHNICAL_RULES: &[Rule] = &[
    elements(
        "consoleErrors",
        issue(Severity::Serious, "console-error", "Scripts raise errors while the page loads").minutes(60),
    ),
    elements(
        "renderBlockingResources",
        issue(Severity::Moderate, "render-blocking-resource", "Resources block the first render").minutes(120),
    ),
];

/// Mapping registered for a category.
#[must_use]
pub fn mapping_for(category: Category) -> ProbeMapping {
    let (applicability, rules, derive): (Option<Applicability>, &'static [Rule], Option<DeriveFn>) =
        match category {
            Category::Aria => (None, ARIA_RULES, None),
            Category::Forms => (
                Some(Applicability {
                    counts: &["formCount", "inputCount"],
                    rule: EmptyPageRule::NotApplicable,
                    reason: "no forms or form fields on the page",
                }),
                FORMS_RULES,
                None,
            ),
            Category::Keyboard => (
                Some(Applicability {
                    counts: &["interactiveCount"],
                    rule: EmptyPageRule::NothingToFail,
                    reason: "no interactive elements on the page",
                }),
                KEYBOARD_RULES,
                None,
            ),
            Category::ColorContrast => (
                Some(Applicability {
                    counts: &["elementsChecked"],
                    rule: EmptyPageRule::NotApplicable,
                    reason: "no text elements to check",
                }),
                &[],
                Some(derive_contrast),
            ),
            Category::Images => (
                Some(Applicability {
                    counts: &["totalImages"],
                    rule: EmptyPageRule::NotApplicable,
                    reason: "no images on the page",
                }),
                IMAGES_RULES,
                None,
            ),
            Category::Tables => (
                Some(Applicability {
                    counts: &["tableCount"],
                    rule: EmptyPageRule::NotApplicable,
                    reason: "no tables on the page",
                }),
                TABLES_RULES,
                None,
            ),
            Category::Structure => (None, STRUCTURE_RULES, Some(derive_headings)),
            Category::Navigation => (None, NAVIGATION_RULES, None),
            Category::ContentStructure => (None, CONTENT_STRUCTURE_RULES, None),
            Category::TextReadability => (None, TEXT_READABILITY_RULES, Some(derive_readability)),
            Category::Mobile => (None, MOBILE_RULES, None),
            Category::Seo => (None, SEO_RULES, Some(derive_seo)),
            Category::Technical => (None, TECHNICAL_RULES, None),
        };
    ProbeMapping {
        category,
        applicability,
        rules,
        derive,
    }
}

// ============================================================================
// Derived findings
// ============================================================================

/// Contrast ratio below which a failure counts as serious rather than moderate.
const SEVERE_CONTRAST_RATIO: f64 = 3.0;

fn derive_contrast(root: &Value, drafts: &mut Vec<IssueDraft>) {
    let Some(failures) = lookup(root, "failures") else {
        return;
    };
    let Some((plain_refs, count)) = element_refs(failures) else {
        return;
    };
    if count == 0 {
        return;
    }

    let mut severity = Severity::Moderate;
    let mut locations = Vec::new();
    if let Some(items) = failures.as_array() {
        locations.reserve(items.len());
        for item in items {
            let Some(obj) = item.as_object() else {
                if let Some(s) = item.as_str() {
                    locations.push(s.to_string());
                }
                continue;
            };
            let selector = first_str(obj, &["selector", "target", "element"]);
            let ratio = obj.get("ratio").and_then(as_f64);
            let required = obj.get("required").and_then(as_f64);
            if ratio.is_some_and(|r| r < SEVERE_CONTRAST_RATIO) {
                severity = Severity::Serious;
            }
            if let Some(selector) = selector {
                locations.push(match (ratio, required) {
                    (Some(r), Some(req)) => format!("{selector} ({r:.1}:1, needs {req:.1}:1)"),
                    (Some(r), None) => format!("{selector} ({r:.1}:1)"),
                    _ => selector,
                });
            }
        }
    } else {
        locations = plain_refs;
    }

    let mut draft = issue(
        severity,
        "insufficient-contrast",
        "Text does not have enough contrast against its background",
    )
    .wcag("1.4.3")
    .minutes(20)
    .benefit("Low-vision visitors and anyone reading in sunlight can read the text")
    .draft();
    draft.locations = locations;
    draft.occurrences = Some(count);
    drafts.push(draft);
}

fn derive_headings(root: &Value, drafts: &mut Vec<IssueDraft>) {
    match lookup(root, "h1Count").and_then(as_count) {
        Some(0) => drafts.push(
            issue(Severity::Serious, "missing-h1", "Page has no top-level heading")
                .wcag("2.4.6")
                .minutes(10)
                .draft(),
        ),
        Some(n) if n > 1 => {
            let mut draft = issue(Severity::Minor, "multiple-h1", "Page has several top-level headings")
                .minutes(15)
                .draft();
            draft.occurrences = Some(n);
            drafts.push(draft);
        }
        _ => {}
    }
}

/// Flesch reading ease below which text is hard for a general audience.
const DIFFICULT_READING_EASE: f64 = 50.0;
/// Flesch reading ease below which text is very hard to read.
const VERY_DIFFICULT_READING_EASE: f64 = 30.0;
/// Average words per sentence above which sentences count as long.
const LONG_SENTENCE_WORDS: f64 = 25.0;

fn derive_readability(root: &Value, drafts: &mut Vec<IssueDraft>) {
    if let Some(score) = lookup(root, "fleschScore").and_then(as_f64) {
        let severity = if score < VERY_DIFFICULT_READING_EASE {
            Some(Severity::Serious)
        } else if score < DIFFICULT_READING_EASE {
            Some(Severity::Moderate)
        } else {
            None
        };
        if let Some(severity) = severity {
            let mut draft = issue(severity, "low-readability", "Body copy is hard to read")
                .wcag("3.1.5")
                .minutes(240)
                .benefit("Visitors with cognitive disabilities or limited literacy can follow the content")
                .draft();
            draft.summary = Some(format!(
                "Body copy is hard to read (reading ease {score:.0})"
            ));
            drafts.push(draft);
        }
    }

    if lookup(root, "averageSentenceLength")
        .and_then(as_f64)
        .is_some_and(|avg| avg > LONG_SENTENCE_WORDS)
    {
        drafts.push(
            issue(Severity::Minor, "long-sentences", "Sentences are long on average")
                .minutes(60)
                .draft(),
        );
    }
}

/// Recommended title length range, in characters.
const TITLE_LENGTH: std::ops::RangeInclusive<usize> = 30..=60;
/// Recommended meta description length range, in characters.
const DESCRIPTION_LENGTH: std::ops::RangeInclusive<usize> = 70..=160;

/// Length of a text field given as a string or as `{present, length}`.
fn text_length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.trim().chars().count()),
        Value::Object(obj) => {
            if obj.get("present").and_then(Value::as_bool) == Some(false) {
                return Some(0);
            }
            obj.get("length")
                .and_then(as_count)
                .or_else(|| obj.get("text").and_then(Value::as_str).map(|s| s.trim().chars().count()))
        }
        Value::Null => Some(0),
        _ => None,
    }
}

fn derive_seo(root: &Value, drafts: &mut Vec<IssueDraft>) {
    match lookup(root, "title").and_then(text_length) {
        Some(0) => drafts.push(
            issue(Severity::Critical, "missing-title", "Page has no title for search results")
                .minutes(5)
                .impact(BusinessImpact::High)
                .draft(),
        ),
        Some(len) if !TITLE_LENGTH.contains(&len) => {
            let mut draft = issue(Severity::Minor, "title-length", "Title length is outside 30-60 characters")
                .minutes(10)
                .impact(BusinessImpact::Low)
                .draft();
            draft.summary = Some(format!("Title is {len} characters; aim for 30-60"));
            drafts.push(draft);
        }
        _ => {}
    }

    match lookup(root, "metaDescription").and_then(text_length) {
        Some(0) => drafts.push(
            issue(Severity::Serious, "missing-meta-description", "Page has no meta description")
                .minutes(10)
                .impact(BusinessImpact::Medium)
                .draft(),
        ),
        Some(len) if !DESCRIPTION_LENGTH.contains(&len) => {
            let mut draft = issue(
                Severity::Minor,
                "meta-description-length",
                "Meta description length is outside 70-160 characters",
            )
            .minutes(10)
            .draft();
            draft.summary = Some(format!("Meta description is {len} characters; aim for 70-160"));
            drafts.push(draft);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_category_has_a_mapping() {
        for category in Category::all() {
            assert_eq!(mapping_for(*category).category, *category);
        }
    }

    #[test]
    fn test_rule_ids_unique_per_category() {
        for category in Category::all() {
            let mapping = mapping_for(*category);
            let mut ids: Vec<&str> = mapping.rules.iter().map(|r| r.template.id).collect();
            let before = ids.len();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(before, ids.len(), "duplicate rule id in {category}");
        }
    }

    #[test]
    fn test_applicability_requires_present_zero_counts() {
        let forms = mapping_for(Category::Forms);
        let applicability = forms.applicability.unwrap();
        assert!(applicability
            .evaluate(&json!({"formCount": 0, "inputCount": 0}))
            .is_some());
        assert!(applicability
            .evaluate(&json!({"formCount": 0, "inputCount": 2}))
            .is_none());
        // Missing count means we cannot tell; treat as applicable.
        assert!(applicability.evaluate(&json!({"formCount": 0})).is_none());
    }

    #[test]
    fn test_contrast_severity_from_ratio() {
        let mapping = mapping_for(Category::ColorContrast);
        let drafts = mapping.drafts(&json!({
            "elementsChecked": 40,
            "failures": [
                {"selector": ".muted", "ratio": 3.9, "required": 4.5},
                {"selector": ".ghost", "ratio": 2.1, "required": 4.5}
            ]
        }));
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].severity, Some(Severity::Serious));
        assert_eq!(drafts[0].occurrences, Some(2));
        assert_eq!(drafts[0].locations[0], ".muted (3.9:1, needs 4.5:1)");
    }

    #[test]
    fn test_flag_rules_need_explicit_value() {
        let mapping = mapping_for(Category::Mobile);
        assert!(mapping.drafts(&json!({})).is_empty());
        let drafts = mapping.drafts(&json!({"hasViewportMeta": false, "viewportBlocksZoom": "true"}));
        let ids: Vec<_> = drafts.iter().filter_map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec!["zoom-disabled", "missing-viewport"]);
    }

    #[test]
    fn test_seo_lengths() {
        let mapping = mapping_for(Category::Seo);
        let drafts = mapping.drafts(&json!({
            "title": "Shop",
            "metaDescription": {"present": false}
        }));
        let ids: Vec<_> = drafts.iter().filter_map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec!["title-length", "missing-meta-description"]);
    }

    #[test]
    fn test_readability_thresholds() {
        let mapping = mapping_for(Category::TextReadability);
        assert!(mapping.drafts(&json!({"fleschScore": 65})).is_empty());
        let drafts = mapping.drafts(&json!({"fleschScore": 22, "averageSentenceLength": 31}));
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].severity, Some(Severity::Serious));
    }
}
