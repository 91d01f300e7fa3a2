//! Canonical issue representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProbeError;

/// Fixed grouping of issues by concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum Category {
    Aria,
    Forms,
    Keyboard,
    ColorContrast,
    Images,
    Tables,
    Structure,
    Navigation,
    ContentStructure,
    TextReadability,
    Mobile,
    Seo,
    Technical,
}

impl Category {
    /// Get all categories in report order
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Aria,
            Self::Forms,
            Self::Keyboard,
            Self::ColorContrast,
            Self::Images,
            Self::Tables,
            Self::Structure,
            Self::Navigation,
            Self::ContentStructure,
            Self::TextReadability,
            Self::Mobile,
            Self::Seo,
            Self::Technical,
        ]
    }

    /// Wire tag, as used in configuration keys and serialized reports
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Aria => "aria",
            Self::Forms => "forms",
            Self::Keyboard => "keyboard",
            Self::ColorContrast => "color-contrast",
            Self::Images => "images",
            Self::Tables => "tables",
            Self::Structure => "structure",
            Self::Navigation => "navigation",
            Self::ContentStructure => "content-structure",
            Self::TextReadability => "text-readability",
            Self::Mobile => "mobile",
            Self::Seo => "seo",
            Self::Technical => "technical",
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Aria => "ARIA",
            Self::Forms => "Forms",
            Self::Keyboard => "Keyboard",
            Self::ColorContrast => "Color Contrast",
            Self::Images => "Images",
            Self::Tables => "Tables",
            Self::Structure => "Page Structure",
            Self::Navigation => "Navigation",
            Self::ContentStructure => "Content Structure",
            Self::TextReadability => "Text Readability",
            Self::Mobile => "Mobile",
            Self::Seo => "SEO",
            Self::Technical => "Technical",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ProbeError;

    /// Parse a probe tag. Accepts kebab, snake and camel case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "aria" | "landmarks" => Ok(Self::Aria),
            "forms" | "form" => Ok(Self::Forms),
            "keyboard" | "focus" => Ok(Self::Keyboard),
            "colorcontrast" | "contrast" => Ok(Self::ColorContrast),
            "images" | "image" | "alttext" => Ok(Self::Images),
            "tables" | "table" => Ok(Self::Tables),
            "structure" | "headings" => Ok(Self::Structure),
            "navigation" | "nav" => Ok(Self::Navigation),
            "contentstructure" | "content" => Ok(Self::ContentStructure),
            "textreadability" | "readability" => Ok(Self::TextReadability),
            "mobile" => Ok(Self::Mobile),
            "seo" => Ok(Self::Seo),
            "technical" | "tech" => Ok(Self::Technical),
            _ => Err(ProbeError::UnknownCategory(s.to_string())),
        }
    }
}

/// Issue severity on a four-point ordinal scale.
///
/// Ordering is by increasing severity, so `Severity::Critical` is the max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Serious,
    Critical,
}

impl Severity {
    /// Collapse a probe's severity vocabulary onto the canonical scale.
    ///
    /// Returns `None` for words outside every known vocabulary.
    #[must_use]
    pub fn from_vocabulary(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "critical" | "blocker" | "error" | "fatal" => Some(Self::Critical),
            "serious" | "high" | "major" | "severe" => Some(Self::Serious),
            "moderate" | "medium" | "warning" | "warn" => Some(Self::Moderate),
            "minor" | "low" | "info" | "notice" | "suggestion" => Some(Self::Minor),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Serious => "serious",
            Self::Critical => "critical",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Moderate
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business impact a probe attached to an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessImpact {
    Low,
    Medium,
    High,
}

impl BusinessImpact {
    #[must_use]
    pub fn from_vocabulary(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "low" | "minor" => Some(Self::Low),
            "medium" | "moderate" => Some(Self::Medium),
            "high" | "critical" | "major" => Some(Self::High),
            _ => None,
        }
    }
}

/// A normalized record of one detected defect.
///
/// `locations` is a bounded preview; `occurrences` carries the full count
/// the probe reported, which is what the penalty model charges for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Issue kind, unique within its category for one run
    pub id: String,
    pub category: Category,
    pub severity: Severity,
    /// Short human-readable description
    pub summary: String,
    /// Element references or selectors, truncated to the preview bound
    pub locations: Vec<String>,
    /// Total number of occurrences found (at least 1)
    pub occurrences: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wcag_criterion: Option<String>,
    pub estimated_fix_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_impact: Option<BusinessImpact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_benefit: Option<String>,
}

impl Issue {
    /// Key used by penalty overrides: `"<category>/<id>"`
    #[must_use]
    pub fn kind_key(&self) -> String {
        format!("{}/{}", self.category, self.id)
    }

    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}
