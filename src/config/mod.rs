//! Configuration module for page-audit.
//!
//! One explicit [`ScoringConfig`] carries every constant the engine uses:
//! penalty table, fallback scores, category weights, impact/effort tables
//! and business calibration factors.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use page_audit::config::{ConfigPreset, ScoringConfig};
//!
//! // Use defaults
//! let config = ScoringConfig::default();
//!
//! // Use a preset
//! let config = ScoringConfig::from_preset(ConfigPreset::Accessibility);
//!
//! // Use builder
//! let config = ScoringConfig::builder()
//!     .penalty("images/missing-alt", 4.0, 16.0)
//!     .fallback_score(Category::Forms, 45.0)
//!     .build();
//!
//! // Load from file
//! use page_audit::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.page-audit.yaml` file in your project root or `~/.config/page-audit/`:
//!
//! ```yaml
//! fallback:
//!   default_score: 50
//! penalties:
//!   overrides:
//!     images/missing-alt:
//!       per_occurrence: 5
//!       cap: 25
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{builtin_penalty_rules, ConfigPreset};
pub use types::{
    BusinessConfig, BusinessImpactBonus, EffortBand, FallbackConfig, NormalizationConfig,
    PenaltyConfig, PenaltyRule, PriorityConfig, ScoringConfig, ScoringConfigBuilder,
    SeverityPenalties, SeverityPoints, WeightsConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `ScoringConfig` configuration format.
///
/// Editors can use it to validate and autocomplete `.page-audit.yaml` files.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(ScoringConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_mentions_sections() {
        let schema = generate_json_schema();
        assert!(schema.contains("ScoringConfig"));
        assert!(schema.contains("penalties"));
        assert!(schema.contains("business"));
    }
}
