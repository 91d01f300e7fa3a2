//! Pipeline orchestration.
//!
//! Ties the stages together: probe outcomes are normalized, each category
//! is scored, scores are aggregated, issues are prioritized and business
//! estimates and recommendations are derived. The result is one immutable
//! [`OverallReport`](crate::model::OverallReport).
//!
//! ```
//! use page_audit::model::{Category, PageContext, SiteType};
//! use page_audit::pipeline::AuditEngine;
//! use page_audit::probe::{ProbeOutcome, ProbeRun};
//! use serde_json::json;
//!
//! let runs = vec![
//!     ProbeRun::new(Category::Images, ProbeOutcome::from_value(json!({
//!         "totalImages": 4,
//!         "missingAlt": ["img.hero", "img.logo"]
//!     }))),
//!     ProbeRun::new(Category::Tables, ProbeOutcome::from_value(json!({"tableCount": 0}))),
//!     ProbeRun::new(Category::Forms, ProbeOutcome::failed("probe timed out")),
//! ];
//! let context = PageContext::new("https://shop.example").with_site_type(SiteType::Ecommerce);
//!
//! let report = AuditEngine::default().analyze(&runs, &context);
//! assert!(report.business_insights.estimated_revenue_loss.is_some());
//! assert_eq!(report.incomplete_categories().collect::<Vec<_>>(), vec![Category::Forms]);
//! ```

mod engine;

pub use engine::{analysis_id, AuditEngine};
