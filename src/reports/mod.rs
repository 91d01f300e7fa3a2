//! Report serialization.
//!
//! The engine hands one [`OverallReport`] to renderers. This module owns the
//! persistence format: a single JSON document per analysis, keyed by its
//! analysis id and timestamp.

mod json;

pub use json::{JsonReporter, JsonSummary};

use std::io::Write;
use std::path::Path;

use crate::error::{AuditError, Result};
use crate::model::OverallReport;

/// Output format of a reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportFormat {
    Json,
}

impl ReportFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
        }
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render a report
    fn generate(&self, report: &OverallReport) -> Result<String>;

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;

    /// Write report to a writer
    fn write_report(&self, report: &OverallReport, writer: &mut dyn Write) -> Result<()> {
        let rendered = self.generate(report)?;
        writer.write_all(rendered.as_bytes())?;
        Ok(())
    }

    /// Write report into `dir` as `<analysis id>.<ext>`, returning the path.
    fn write_to_dir(&self, report: &OverallReport, dir: &Path) -> Result<std::path::PathBuf> {
        let path = dir.join(format!("{}.{}", report.analysis_id, self.format().extension()));
        let rendered = self.generate(report)?;
        std::fs::write(&path, rendered).map_err(|e| AuditError::io(&path, e))?;
        tracing::debug!("Wrote report to {}", path.display());
        Ok(path)
    }
}
