//! Data model shared by every stage of the engine.
//!
//! All entities are created and fully populated within one analysis run.
//! A new page analysis builds an entirely new graph of these values.

mod context;
mod issue;
mod report;

pub use context::{PageContext, SiteType, TechStack};
pub use issue::{BusinessImpact, Category, Issue, Severity};
pub use report::{
    CategoryScore, Completeness, Deduction, Grade, OverallReport, OverallScore, ScoreStatus,
};
