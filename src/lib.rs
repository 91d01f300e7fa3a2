//! **Issue scoring and prioritization for web page audits.**
//!
//! `page-audit` turns the raw findings of many independent page probes
//! (accessibility, SEO and usability heuristics run against a rendered page)
//! into one explainable report: bounded per-category scores, an overall
//! score, an impact/effort priority matrix, business estimates and ordered
//! recommendations.
//!
//! Probes themselves are external. The crate receives their outcomes, either
//! opaque JSON findings or a failure marker, and every stage after that is a
//! pure, deterministic transformation.
//!
//! ## Core Concepts & Modules
//!
//! - **[`probe`]**: The probe boundary. [`ProbeOutcome`] keeps "the probe failed"
//!   distinct from "the probe found nothing", and [`ProbeRunner`] timeboxes
//!   probe execution so no failure escapes as an error.
//! - **[`normalize`]**: Maps each probe's raw shape onto canonical [`Issue`]s.
//! - **[`scoring`]**: The capped-penalty [`CategoryScorer`] and the weighted
//!   [`Aggregator`].
//! - **[`insights`]**: Impact/effort classification, business estimates and
//!   recommendations.
//! - **[`pipeline`]**: [`AuditEngine`], which runs every stage and assembles the
//!   [`OverallReport`].
//! - **[`config`]**: One [`ScoringConfig`] holding every tunable constant,
//!   with presets, YAML loading and validation.
//! - **[`reports`]**: JSON persistence of finished reports.
//!
//! ## Getting Started
//!
//! ```
//! use page_audit::{AuditEngine, Category, PageContext, ProbeOutcome, ProbeRun, SiteType};
//! use serde_json::json;
//!
//! let runs = vec![
//!     ProbeRun::new(Category::Aria, ProbeOutcome::from_value(json!({
//!         "missingAccessibleName": ["button.add-to-cart", "a.wishlist"],
//!         "landmarks": {"hasMain": true}
//!     }))),
//!     ProbeRun::new(Category::Seo, ProbeOutcome::from_value(json!({
//!         "title": "Trail running shoes for every terrain | Example Shop",
//!         "metaDescription": null
//!     }))),
//! ];
//! let context = PageContext::new("https://shop.example/shoes")
//!     .with_site_type(SiteType::Ecommerce);
//!
//! let report = AuditEngine::default().analyze(&runs, &context);
//! match report.overall_score.value() {
//!     Some(score) => println!("Overall: {score:.1}"),
//!     None => println!("Not enough data for an overall score"),
//! }
//! for rec in &report.recommendations {
//!     println!("{}. {} ({})", rec.priority, rec.title, rec.time_estimate);
//! }
//! ```
//!
//! ## Loading Configuration
//!
//! ```no_run
//! use page_audit::config::load_or_default;
//! use page_audit::AuditEngine;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (config, source) = load_or_default(None);
//!     if let Some(path) = source {
//!         println!("Using {}", path.display());
//!     }
//!     let _engine = AuditEngine::new(config)?;
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Occurrence counts and scores are small; usize/f32/f64 casts are bounded in practice
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Variable names like `impact`/`effort` pairs are clear in context
    clippy::similar_names
)]

pub mod config;
pub mod error;
pub mod insights;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod probe;
pub mod reports;
pub mod scoring;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigPreset, ScoringConfig, ScoringConfigBuilder, Validatable};
pub use error::{AuditError, ErrorContext, OptionContext, Result};
pub use insights::{
    BusinessInsights, PriorityBucket, PriorityMatrix, Recommendation, RecommendationComposer,
};
pub use model::{
    Category, CategoryScore, Completeness, Issue, OverallReport, OverallScore, PageContext,
    Severity, SiteType, TechStack,
};
pub use normalize::{CategorySignal, Normalizer};
pub use pipeline::AuditEngine;
pub use probe::{Probe, ProbeOutcome, ProbeRun, ProbeRunner, RawFindings};
pub use reports::{JsonReporter, ReportFormat, ReportGenerator};
pub use scoring::{Aggregator, CategoryScorer};
