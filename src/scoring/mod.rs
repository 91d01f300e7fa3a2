//! Category scoring and aggregation.
//!
//! Every category is scored by the same parameterized capped-penalty model:
//! start at 100, deduct a bounded amount per distinct issue kind, clamp to
//! `[0, 100]`. Category scores are then combined into one weighted overall
//! score, excluding categories that do not apply to the page.
//!
//! # Usage
//!
//! ```
//! use page_audit::config::ScoringConfig;
//! use page_audit::model::Category;
//! use page_audit::normalize::CategorySignal;
//! use page_audit::scoring::{Aggregator, CategoryScorer};
//!
//! let config = ScoringConfig::default();
//! let scorer = CategoryScorer::new(&config);
//! let score = scorer.score(Category::Seo, &CategorySignal::Issues(Vec::new()));
//! assert_eq!(score.score, 100.0);
//!
//! let aggregate = Aggregator::new(&config).aggregate(vec![score], Vec::new());
//! assert_eq!(aggregate.overall_score.value(), Some(100.0));
//! ```

mod aggregate;
mod category;

pub use aggregate::{Aggregate, Aggregator};
pub use category::CategoryScorer;

/// Scoring engine version, recorded on every report
pub const SCORING_ENGINE_VERSION: &str = "1.0";
