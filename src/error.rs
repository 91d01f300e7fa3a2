//! Unified error types for page-audit.
//!
//! The scoring engine itself never fails: probe failures and malformed
//! findings degrade to "no signal" inside the pipeline. Errors surface only
//! at the edges of the crate, when loading or validating configuration,
//! when a probe boundary reports a failure, and when a report is serialized.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::{ConfigError, ConfigFileError};

/// Main error type for page-audit operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AuditError {
    /// Configuration values failed validation
    #[error("Invalid configuration: {context}")]
    Config {
        context: String,
        errors: Vec<ConfigError>,
    },

    /// Configuration file could not be loaded
    #[error("Failed to load configuration: {context}")]
    ConfigFile {
        context: String,
        #[source]
        source: ConfigFileError,
    },

    /// Errors during report serialization
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// A probe failed at its boundary
    #[error("Probe failed: {context}")]
    Probe {
        context: String,
        #[source]
        source: ProbeError,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Failure raised by a probe before it is converted into a failure marker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProbeError {
    #[error("probe timed out after {millis} ms")]
    Timeout { millis: u64 },

    #[error("DOM query failed: {0}")]
    Query(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("probe panicked: {0}")]
    Panicked(String),

    #[error("not started: the harness is still running the timed-out {0} probe")]
    HarnessBusy(String),

    #[error("unknown probe category '{0}'")]
    UnknownCategory(String),
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),

    #[error("Report has no numeric score: {0}")]
    InsufficientData(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for page-audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl AuditError {
    /// Create a configuration error from validation results
    pub fn config(context: impl Into<String>, errors: Vec<ConfigError>) -> Self {
        Self::Config {
            context: context.into(),
            errors,
        }
    }

    /// Create a report error with context
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }

    /// Create a probe error with context
    pub fn probe(context: impl Into<String>, source: ProbeError) -> Self {
        Self::Probe {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for AuditError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::report(
            "JSON serialization",
            ReportErrorKind::JsonSerializationError(err.to_string()),
        )
    }
}

impl From<ConfigFileError> for AuditError {
    fn from(err: ConfigFileError) -> Self {
        Self::ConfigFile {
            context: String::new(),
            source: err,
        }
    }
}

impl From<ProbeError> for AuditError {
    fn from(err: ProbeError) -> Self {
        Self::probe(String::new(), err)
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain outward, so an error that crossed two layers reads
/// `"outer: inner: original"`.
///
/// ```ignore
/// use page_audit::error::ErrorContext;
///
/// let config = load_config_file(path)
///     .with_context(|| format!("loading {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<AuditError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: AuditError, new_ctx: &str) -> AuditError {
    match err {
        AuditError::Config {
            context: existing,
            errors,
        } => AuditError::Config {
            context: chain_context(new_ctx, &existing),
            errors,
        },
        AuditError::ConfigFile {
            context: existing,
            source,
        } => AuditError::ConfigFile {
            context: chain_context(new_ctx, &existing),
            source,
        },
        AuditError::Report {
            context: existing,
            source,
        } => AuditError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        AuditError::Probe {
            context: existing,
            source,
        } => AuditError::Probe {
            context: chain_context(new_ctx, &existing),
            source,
        },
        AuditError::Io {
            path,
            message,
            source,
        } => AuditError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        AuditError::Validation(msg) => AuditError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| AuditError::Validation(context.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuditError::probe("aria", ProbeError::Timeout { millis: 5000 });
        assert_eq!(err.to_string(), "Probe failed: aria");

        let err = AuditError::validation("score out of range");
        assert!(err.to_string().contains("score out of range"));
    }

    #[test]
    fn test_io_error_has_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = AuditError::io("/path/to/config.yaml", io_err);
        assert!(err.to_string().contains("/path/to/config.yaml"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(AuditError::report(
                "base",
                ReportErrorKind::InsufficientData("no categories".to_string()),
            ))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(AuditError::Report { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Report error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(AuditError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_probe_error_converts_with_empty_context() {
        let result: std::result::Result<(), ProbeError> =
            Err(ProbeError::Query("querySelectorAll threw".to_string()));
        match result.context("keyboard probe") {
            Err(AuditError::Probe { context, source }) => {
                assert_eq!(context, "keyboard probe");
                assert!(matches!(source, ProbeError::Query(_)));
            }
            other => panic!("Expected Probe error, got {other:?}"),
        }
    }

    #[test]
    fn test_option_context() {
        assert_eq!(Some(42).context_none("missing").unwrap(), 42);

        let none_value: Option<i32> = None;
        match none_value.context_none("missing value") {
            Err(AuditError::Validation(msg)) => assert_eq!(msg, "missing value"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
