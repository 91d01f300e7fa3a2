//! Configuration types for the scoring engine.
//!
//! Every tunable constant used by the scorer, the classifier and the
//! business estimator lives here so that tuning is auditable in one place.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{BusinessImpact, Category, Severity};

// ============================================================================
// Unified Scoring Configuration
// ============================================================================

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScoringConfig {
    /// Canonical issue shape (preview bounds, defaults)
    pub normalization: NormalizationConfig,
    /// Per-issue-kind penalty table
    pub penalties: PenaltyConfig,
    /// Neutral scores for categories whose probe failed
    pub fallback: FallbackConfig,
    /// Category weights for the overall score
    pub weights: WeightsConfig,
    /// Impact/effort classification constants
    pub priority: PriorityConfig,
    /// Business estimate calibration constants
    pub business: BusinessConfig,
}

impl ScoringConfig {
    /// Create a new `ScoringConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `ScoringConfig` builder.
    pub fn builder() -> ScoringConfigBuilder {
        ScoringConfigBuilder::default()
    }
}

// ============================================================================
// Builder for ScoringConfig
// ============================================================================

/// Builder for constructing `ScoringConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct ScoringConfigBuilder {
    config: ScoringConfig,
}

impl ScoringConfigBuilder {
    /// Start from a preset instead of the defaults.
    pub fn preset(mut self, preset: super::ConfigPreset) -> Self {
        self.config = ScoringConfig::from_preset(preset);
        self
    }

    /// Set the location preview bound.
    pub const fn location_preview_limit(mut self, limit: usize) -> Self {
        self.config.normalization.location_preview_limit = limit;
        self
    }

    /// Override the penalty rule for one issue kind (`"category/id"`).
    pub fn penalty(mut self, kind: impl Into<String>, per_occurrence: f32, cap: f32) -> Self {
        self.config.penalties.overrides.insert(
            kind.into(),
            PenaltyRule {
                per_occurrence,
                cap,
            },
        );
        self
    }

    /// Set the fallback score for one category.
    pub fn fallback_score(mut self, category: Category, score: f32) -> Self {
        self.config.fallback.overrides.insert(category, score);
        self
    }

    /// Set the weight of one category in the overall score.
    pub fn weight(mut self, category: Category, weight: f32) -> Self {
        self.config.weights.overrides.insert(category, weight);
        self
    }

    /// Set the per-critical-issue revenue loss constant.
    pub const fn revenue_loss_per_critical(mut self, amount: f64) -> Self {
        self.config.business.revenue_loss_per_critical = amount;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ScoringConfig {
        self.config
    }
}

// ============================================================================
// Normalization
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Maximum number of locations kept per issue
    pub location_preview_limit: usize,
    /// Fix estimate used when a probe gives none
    pub default_fix_minutes: u32,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            location_preview_limit: 5,
            default_fix_minutes: 30,
        }
    }
}

// ============================================================================
// Penalties
// ============================================================================

/// Bounded penalty for one issue kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PenaltyRule {
    /// Points deducted per occurrence
    pub per_occurrence: f32,
    /// Maximum total deduction for the kind
    pub cap: f32,
}

impl PenaltyRule {
    #[must_use]
    pub const fn new(per_occurrence: f32, cap: f32) -> Self {
        Self {
            per_occurrence,
            cap,
        }
    }

    /// Deduction for `occurrences` instances of this kind.
    #[must_use]
    pub fn deduction(&self, occurrences: usize) -> f32 {
        (self.per_occurrence * occurrences as f32).min(self.cap)
    }
}

/// Penalty defaults per severity, used for kinds with no explicit rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SeverityPenalties {
    pub critical: PenaltyRule,
    pub serious: PenaltyRule,
    pub moderate: PenaltyRule,
    pub minor: PenaltyRule,
}

impl SeverityPenalties {
    #[must_use]
    pub const fn for_severity(&self, severity: Severity) -> PenaltyRule {
        match severity {
            Severity::Critical => self.critical,
            Severity::Serious => self.serious,
            Severity::Moderate => self.moderate,
            Severity::Minor => self.minor,
        }
    }
}

impl Default for SeverityPenalties {
    fn default() -> Self {
        Self {
            critical: PenaltyRule::new(10.0, 30.0),
            serious: PenaltyRule::new(5.0, 20.0),
            moderate: PenaltyRule::new(3.0, 12.0),
            minor: PenaltyRule::new(1.0, 5.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PenaltyConfig {
    pub severity_defaults: SeverityPenalties,
    /// Hand-tuned rules keyed by `"category/id"`
    pub overrides: BTreeMap<String, PenaltyRule>,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            severity_defaults: SeverityPenalties::default(),
            overrides: super::defaults::builtin_penalty_rules(),
        }
    }
}

impl PenaltyConfig {
    /// Rule for an issue kind, falling back to its severity default.
    #[must_use]
    pub fn rule_for(&self, kind_key: &str, severity: Severity) -> PenaltyRule {
        self.overrides
            .get(kind_key)
            .copied()
            .unwrap_or_else(|| self.severity_defaults.for_severity(severity))
    }
}

// ============================================================================
// Fallback scores
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FallbackConfig {
    /// Neutral score for a category whose probe failed
    pub default_score: f32,
    pub overrides: BTreeMap<Category, f32>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            default_score: 50.0,
            overrides: BTreeMap::new(),
        }
    }
}

impl FallbackConfig {
    #[must_use]
    pub fn score_for(&self, category: Category) -> f32 {
        self.overrides
            .get(&category)
            .copied()
            .unwrap_or(self.default_score)
    }
}

// ============================================================================
// Category weights
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WeightsConfig {
    pub default_weight: f32,
    pub overrides: BTreeMap<Category, f32>,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            default_weight: 1.0,
            overrides: BTreeMap::new(),
        }
    }
}

impl WeightsConfig {
    #[must_use]
    pub fn weight_for(&self, category: Category) -> f32 {
        self.overrides
            .get(&category)
            .copied()
            .unwrap_or(self.default_weight)
    }
}

// ============================================================================
// Priority classification
// ============================================================================

/// Points per severity on the 0-10 impact scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SeverityPoints {
    pub critical: u8,
    pub serious: u8,
    pub moderate: u8,
    pub minor: u8,
}

impl SeverityPoints {
    #[must_use]
    pub const fn for_severity(&self, severity: Severity) -> u8 {
        match severity {
            Severity::Critical => self.critical,
            Severity::Serious => self.serious,
            Severity::Moderate => self.moderate,
            Severity::Minor => self.minor,
        }
    }
}

impl Default for SeverityPoints {
    fn default() -> Self {
        Self {
            critical: 8,
            serious: 6,
            moderate: 4,
            minor: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BusinessImpactBonus {
    pub low: u8,
    pub medium: u8,
    pub high: u8,
}

impl BusinessImpactBonus {
    #[must_use]
    pub const fn for_impact(&self, impact: BusinessImpact) -> u8 {
        match impact {
            BusinessImpact::Low => self.low,
            BusinessImpact::Medium => self.medium,
            BusinessImpact::High => self.high,
        }
    }
}

impl Default for BusinessImpactBonus {
    fn default() -> Self {
        Self {
            low: 1,
            medium: 2,
            high: 3,
        }
    }
}

/// Fix time band: estimates up to `max_minutes` score `effort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EffortBand {
    pub max_minutes: u32,
    pub effort: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PriorityConfig {
    pub severity_points: SeverityPoints,
    /// Added when the issue carries substantive user benefit text
    pub user_benefit_bonus: u8,
    /// Minimum trimmed length for benefit text to count as substantive
    pub substantive_benefit_chars: usize,
    pub business_impact_bonus: BusinessImpactBonus,
    /// Ascending fix time bands
    pub effort_bands: Vec<EffortBand>,
    /// Effort for estimates beyond the last band
    pub effort_ceiling: u8,
    /// Complexity bump for technical issues
    pub technical_bump: u8,
    /// Complexity bump for widespread issues
    pub spread_bump: u8,
    /// Occurrence count above which the spread bump applies
    pub spread_threshold: usize,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            severity_points: SeverityPoints::default(),
            user_benefit_bonus: 2,
            substantive_benefit_chars: 20,
            business_impact_bonus: BusinessImpactBonus::default(),
            effort_bands: vec![
                EffortBand {
                    max_minutes: 15,
                    effort: 1,
                },
                EffortBand {
                    max_minutes: 60,
                    effort: 3,
                },
                EffortBand {
                    max_minutes: 240,
                    effort: 6,
                },
            ],
            effort_ceiling: 10,
            technical_bump: 2,
            spread_bump: 2,
            spread_threshold: 10,
        }
    }
}

// ============================================================================
// Business estimates
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BusinessConfig {
    /// Multiplier applied to `100 - overall score`
    pub user_impact_factor: f32,
    /// Critical issue count above which legal risk is high
    pub legal_high_above: usize,
    /// Critical issue count above which legal risk is medium
    pub legal_medium_above: usize,
    /// Estimated revenue loss per critical issue on commerce sites
    pub revenue_loss_per_critical: f64,
    pub currency: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            user_impact_factor: 0.2,
            legal_high_above: 5,
            legal_medium_above: 2,
            revenue_loss_per_critical: 2500.0,
            currency: "USD".to_string(),
        }
    }
}
