//! Configuration validation for the scoring engine.

use super::types::{
    BusinessConfig, FallbackConfig, NormalizationConfig, PenaltyConfig, PenaltyRule,
    PriorityConfig, ScoringConfig, WeightsConfig,
};
use crate::model::Category;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for ScoringConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.normalization.validate());
        errors.extend(self.penalties.validate());
        errors.extend(self.fallback.validate());
        errors.extend(self.weights.validate());
        errors.extend(self.priority.validate());
        errors.extend(self.business.validate());
        errors
    }
}

impl Validatable for NormalizationConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.location_preview_limit == 0 {
            errors.push(ConfigError::new(
                "normalization.location_preview_limit",
                "Preview limit must be at least 1",
            ));
        }
        errors
    }
}

fn validate_rule(field: &str, rule: &PenaltyRule, errors: &mut Vec<ConfigError>) {
    if !rule.per_occurrence.is_finite() || rule.per_occurrence < 0.0 {
        errors.push(ConfigError::new(
            format!("{field}.per_occurrence"),
            format!("Penalty must be a non-negative number, got {}", rule.per_occurrence),
        ));
    }
    if !rule.cap.is_finite() || !(0.0..=100.0).contains(&rule.cap) {
        errors.push(ConfigError::new(
            format!("{field}.cap"),
            format!("Cap must be between 0 and 100, got {}", rule.cap),
        ));
    }
}

impl Validatable for PenaltyConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let defaults = &self.severity_defaults;
        for (name, rule) in [
            ("critical", &defaults.critical),
            ("serious", &defaults.serious),
            ("moderate", &defaults.moderate),
            ("minor", &defaults.minor),
        ] {
            validate_rule(&format!("penalties.severity_defaults.{name}"), rule, &mut errors);
        }

        for (kind, rule) in &self.overrides {
            let field = format!("penalties.overrides.{kind}");
            match kind.split_once('/') {
                Some((category, id)) if !id.is_empty() => {
                    if category.parse::<Category>().is_err() {
                        errors.push(ConfigError::new(
                            &field,
                            format!("Unknown category '{category}'"),
                        ));
                    }
                }
                _ => errors.push(ConfigError::new(
                    &field,
                    "Issue kind keys must have the form 'category/id'",
                )),
            }
            validate_rule(&field, rule, &mut errors);
        }
        errors
    }
}

fn validate_fallback(field: &str, score: f32, errors: &mut Vec<ConfigError>) {
    // A fallback of 0 or 100 would read as evidence of violation or compliance.
    if !(score > 0.0 && score < 100.0) {
        errors.push(ConfigError::new(
            field,
            format!("Fallback score must be strictly between 0 and 100, got {score}"),
        ));
    }
}

impl Validatable for FallbackConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        validate_fallback("fallback.default_score", self.default_score, &mut errors);
        for (category, score) in &self.overrides {
            validate_fallback(&format!("fallback.overrides.{category}"), *score, &mut errors);
        }
        errors
    }
}

impl Validatable for WeightsConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let check = |field: String, weight: f32, errors: &mut Vec<ConfigError>| {
            if !weight.is_finite() || weight < 0.0 {
                errors.push(ConfigError::new(
                    field,
                    format!("Weight must be a non-negative number, got {weight}"),
                ));
            }
        };
        check("weights.default_weight".to_string(), self.default_weight, &mut errors);
        for (category, weight) in &self.overrides {
            check(format!("weights.overrides.{category}"), *weight, &mut errors);
        }
        errors
    }
}

impl Validatable for PriorityConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let points = &self.severity_points;
        for (name, value) in [
            ("critical", points.critical),
            ("serious", points.serious),
            ("moderate", points.moderate),
            ("minor", points.minor),
        ] {
            if value > 10 {
                errors.push(ConfigError::new(
                    format!("priority.severity_points.{name}"),
                    format!("Impact points must be at most 10, got {value}"),
                ));
            }
        }

        if self.effort_bands.is_empty() {
            errors.push(ConfigError::new(
                "priority.effort_bands",
                "At least one effort band is required",
            ));
        }
        for pair in self.effort_bands.windows(2) {
            if pair[1].max_minutes <= pair[0].max_minutes {
                errors.push(ConfigError::new(
                    "priority.effort_bands",
                    format!(
                        "Bands must be in ascending order of max_minutes ({} then {})",
                        pair[0].max_minutes, pair[1].max_minutes
                    ),
                ));
            }
        }
        for band in &self.effort_bands {
            if band.effort > 10 {
                errors.push(ConfigError::new(
                    "priority.effort_bands",
                    format!("Band effort must be at most 10, got {}", band.effort),
                ));
            }
        }
        if self.effort_ceiling > 10 {
            errors.push(ConfigError::new(
                "priority.effort_ceiling",
                format!("Effort ceiling must be at most 10, got {}", self.effort_ceiling),
            ));
        }

        errors
    }
}

impl Validatable for BusinessConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !self.user_impact_factor.is_finite() || self.user_impact_factor < 0.0 {
            errors.push(ConfigError::new(
                "business.user_impact_factor",
                format!(
                    "Factor must be a non-negative number, got {}",
                    self.user_impact_factor
                ),
            ));
        }
        if self.legal_high_above < self.legal_medium_above {
            errors.push(ConfigError::new(
                "business.legal_high_above",
                format!(
                    "High threshold ({}) must not be below medium threshold ({})",
                    self.legal_high_above, self.legal_medium_above
                ),
            ));
        }
        if !self.revenue_loss_per_critical.is_finite() || self.revenue_loss_per_critical < 0.0 {
            errors.push(ConfigError::new(
                "business.revenue_loss_per_critical",
                "Revenue loss must be a non-negative number",
            ));
        }
        if self.currency.trim().is_empty() {
            errors.push(ConfigError::new("business.currency", "Currency must not be empty"));
        }
        errors
    }
}
