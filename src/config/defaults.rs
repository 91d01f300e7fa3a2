//! Default configurations and presets for the scoring engine.
//!
//! Provides named presets for common audit focuses and the hand-tuned
//! penalty table for the issue kinds the built-in probe mappings emit.

use std::collections::BTreeMap;

use super::types::{PenaltyRule, ScoringConfig, SeverityPenalties};
use crate::model::Category;

// ============================================================================
// Built-in penalty table
// ============================================================================

/// Hand-tuned penalties for known issue kinds, keyed by `"category/id"`.
///
/// Kinds not listed here use the severity defaults. The numbers are
/// heuristics; changing them changes scores, not correctness.
const BUILTIN_PENALTIES: &[(&str, f32, f32)] = &[
    ("aria/missing-accessible-name", 6.0, 30.0),
    ("aria/aria-hidden-focusable", 8.0, 24.0),
    ("aria/invalid-role", 4.0, 16.0),
    ("aria/missing-main-landmark", 10.0, 10.0),
    ("forms/missing-label", 8.0, 32.0),
    ("forms/error-not-associated", 5.0, 15.0),
    ("forms/missing-autocomplete", 1.0, 6.0),
    ("keyboard/keyboard-trap", 15.0, 30.0),
    ("keyboard/not-focusable", 6.0, 30.0),
    ("keyboard/missing-focus-indicator", 3.0, 18.0),
    ("keyboard/missing-skip-link", 5.0, 5.0),
    ("color-contrast/insufficient-contrast", 2.0, 24.0),
    ("images/missing-alt", 5.0, 25.0),
    ("images/suspicious-alt", 2.0, 10.0),
    ("tables/missing-headers", 6.0, 24.0),
    ("structure/missing-lang", 10.0, 10.0),
    ("structure/missing-title", 10.0, 10.0),
    ("structure/skipped-heading-level", 2.0, 10.0),
    ("navigation/ambiguous-link-text", 2.0, 10.0),
    ("navigation/empty-link", 4.0, 16.0),
    ("text-readability/low-readability", 12.0, 12.0),
    ("text-readability/small-text", 1.0, 8.0),
    ("mobile/zoom-disabled", 15.0, 15.0),
    ("mobile/missing-viewport", 20.0, 20.0),
    ("mobile/small-touch-target", 1.5, 15.0),
    ("seo/noindex", 40.0, 40.0),
    ("seo/missing-title", 20.0, 20.0),
    ("seo/missing-meta-description", 10.0, 10.0),
];

/// Built-in per-kind penalty rules.
#[must_use]
pub fn builtin_penalty_rules() -> BTreeMap<String, PenaltyRule> {
    BUILTIN_PENALTIES
        .iter()
        .map(|&(kind, per, cap)| (kind.to_string(), PenaltyRule::new(per, cap)))
        .collect()
}

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common audit focuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Every category weighted equally
    Balanced,
    /// Accessibility categories dominate the overall score
    Accessibility,
    /// Search visibility categories dominate the overall score
    Seo,
    /// Heavier severity penalties and a lower failure fallback
    Strict,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Accessibility => "accessibility",
            Self::Seo => "seo",
            Self::Strict => "strict",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "balanced" | "default" => Some(Self::Balanced),
            "accessibility" | "a11y" | "wcag" => Some(Self::Accessibility),
            "seo" | "search" => Some(Self::Seo),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Balanced => "All categories weighted equally",
            Self::Accessibility => "Emphasizes WCAG-related categories over SEO and technical",
            Self::Seo => "Emphasizes search visibility and content structure",
            Self::Strict => "Heavier penalties for severe issues",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Balanced, Self::Accessibility, Self::Seo, Self::Strict]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl ScoringConfig {
    /// Create a `ScoringConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Balanced => Self::default(),
            ConfigPreset::Accessibility => Self::accessibility_preset(),
            ConfigPreset::Seo => Self::seo_preset(),
            ConfigPreset::Strict => Self::strict_preset(),
        }
    }

    /// Accessibility-focused preset.
    #[must_use]
    pub fn accessibility_preset() -> Self {
        let mut config = Self::default();
        for category in [
            Category::Aria,
            Category::Forms,
            Category::Keyboard,
            Category::ColorContrast,
            Category::Images,
        ] {
            config.weights.overrides.insert(category, 1.5);
        }
        config.weights.overrides.insert(Category::Seo, 0.5);
        config.weights.overrides.insert(Category::Technical, 0.5);
        config
    }

    /// SEO-focused preset.
    #[must_use]
    pub fn seo_preset() -> Self {
        let mut config = Self::default();
        config.weights.overrides.insert(Category::Seo, 3.0);
        config.weights.overrides.insert(Category::ContentStructure, 1.5);
        config.weights.overrides.insert(Category::Structure, 1.5);
        config.weights.overrides.insert(Category::Mobile, 1.5);
        config
    }

    /// Strict preset.
    ///
    /// - Severity defaults roughly 1.5x heavier
    /// - Failed probes fall back to 40 instead of 50
    #[must_use]
    pub fn strict_preset() -> Self {
        let mut config = Self::default();
        config.penalties.severity_defaults = SeverityPenalties {
            critical: PenaltyRule::new(15.0, 45.0),
            serious: PenaltyRule::new(8.0, 30.0),
            moderate: PenaltyRule::new(4.0, 16.0),
            minor: PenaltyRule::new(1.5, 8.0),
        };
        config.fallback.default_score = 40.0;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Validatable;

    #[test]
    fn test_preset_names_roundtrip() {
        for preset in ConfigPreset::all() {
            assert_eq!(ConfigPreset::from_name(preset.name()), Some(*preset));
        }
        assert_eq!(ConfigPreset::from_name("a11y"), Some(ConfigPreset::Accessibility));
        assert_eq!(ConfigPreset::from_name("nope"), None);
    }

    #[test]
    fn test_all_presets_are_valid() {
        for preset in ConfigPreset::all() {
            let config = ScoringConfig::from_preset(*preset);
            let errors = config.validate();
            assert!(errors.is_empty(), "{preset} preset invalid: {errors:?}");
        }
    }

    #[test]
    fn test_builtin_penalties_respect_their_caps() {
        for (kind, rule) in builtin_penalty_rules() {
            assert!(
                rule.per_occurrence <= rule.cap,
                "{kind}: per-occurrence {} exceeds cap {}",
                rule.per_occurrence,
                rule.cap
            );
        }
    }
}
