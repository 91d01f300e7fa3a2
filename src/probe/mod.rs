//! Probe adapter boundary.
//!
//! Probes are external DOM inspections, one per concern. This module owns
//! the contract between them and the engine: a probe either hands back an
//! opaque [`RawFindings`] payload or a failure marker, and nothing a probe
//! does (error, timeout, panic) ever crosses into the engine as an error.

mod runner;

pub use runner::{Probe, ProbeRunner, DEFAULT_PROBE_TIMEOUT};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProbeError;
use crate::model::Category;

/// Opaque, probe-specific findings. Each probe documents its own shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFindings(Value);

impl RawFindings {
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Whether the payload is itself a failure marker.
    ///
    /// Probes that swallow their own exceptions report `null` or an object
    /// carrying only an `error` message. An `error` next to other fields is
    /// left to the normalizer, which treats it as no signal when nothing
    /// else in the payload reads as a finding.
    #[must_use]
    pub fn failure_reason(&self) -> Option<String> {
        match &self.0 {
            Value::Null => Some("probe returned no findings".to_string()),
            Value::Object(map) => {
                let error = map.get("error")?;
                let meaningful = map
                    .iter()
                    .filter(|(k, _)| !matches!(k.as_str(), "error" | "message" | "stack"))
                    .count();
                if meaningful > 0 {
                    return None;
                }
                Some(match error {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
            }
            _ => None,
        }
    }
}

impl From<Value> for RawFindings {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Why a probe produced no signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeFailure {
    pub reason: String,
}

impl From<ProbeError> for ProbeFailure {
    fn from(err: ProbeError) -> Self {
        Self {
            reason: err.to_string(),
        }
    }
}

/// Result of running one probe: findings, or the failure marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "payload", rename_all = "camelCase")]
pub enum ProbeOutcome {
    Completed(RawFindings),
    Failed(ProbeFailure),
}

impl ProbeOutcome {
    /// Wrap a raw payload, recognizing in-band failure markers.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let findings = RawFindings::new(value);
        match findings.failure_reason() {
            Some(reason) => Self::Failed(ProbeFailure { reason }),
            None => Self::Completed(findings),
        }
    }

    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(ProbeFailure {
            reason: reason.into(),
        })
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl From<Result<RawFindings, ProbeError>> for ProbeOutcome {
    fn from(result: Result<RawFindings, ProbeError>) -> Self {
        match result {
            Ok(findings) => Self::from_value(findings.into_value()),
            Err(err) => Self::Failed(err.into()),
        }
    }
}

/// One probe's outcome tagged with its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeRun {
    pub category: Category,
    pub outcome: ProbeOutcome,
}

impl ProbeRun {
    #[must_use]
    pub const fn new(category: Category, outcome: ProbeOutcome) -> Self {
        Self { category, outcome }
    }

    /// Build from a probe's category tag, as the browser harness reports it.
    pub fn from_tag(tag: &str, outcome: ProbeOutcome) -> Result<Self, ProbeError> {
        Ok(Self::new(tag.parse()?, outcome))
    }
}
