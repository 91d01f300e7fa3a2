//! Lenient readers over untyped probe payloads.
//!
//! Every accessor returns `None` instead of failing when a field is missing
//! or has the wrong shape, so a partially malformed payload still yields
//! whatever can be read from it.

use serde_json::{Map, Value};

use super::IssueDraft;
use crate::model::{BusinessImpact, Severity};

/// Keys that identify an element inside an element descriptor object.
const ELEMENT_KEYS: &[&str] = &["selector", "target", "element", "xpath", "id", "src", "html"];

/// Read a value at a JSON pointer (`/a/b`), or a plain top-level key.
pub(crate) fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.starts_with('/') {
        root.pointer(path)
    } else {
        root.get(path)
    }
}

/// First string value among `keys`.
pub(crate) fn first_str(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
}

pub(crate) fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Non-negative count. Arrays count their elements.
pub(crate) fn as_count(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::Bool(_) | Value::Null | Value::Object(_) => None,
        other => as_f64(other)
            .filter(|f| *f >= 0.0)
            .map(|f| f.round() as usize),
    }
}

pub(crate) fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Describe one element reference, if the descriptor carries one.
fn element_ref(item: &Value) -> Option<String> {
    match item {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(obj) => first_str(obj, ELEMENT_KEYS),
        Value::Array(parts) => {
            // axe-style targets: ["iframe", "#inner"]
            let joined: Vec<String> = parts.iter().filter_map(element_ref).collect();
            (!joined.is_empty()).then(|| joined.join(" >> "))
        }
        _ => None,
    }
}

/// Element references and occurrence count for an element-list field.
///
/// Accepts an array of selectors or descriptors, or a bare count.
/// Descriptors without a usable reference still count as occurrences.
pub(crate) fn element_refs(value: &Value) -> Option<(Vec<String>, usize)> {
    match value {
        Value::Array(items) => Some((items.iter().filter_map(element_ref).collect(), items.len())),
        other => as_count(other).map(|n| (Vec::new(), n)),
    }
}

/// Parse entries of a generic `issues` / `violations` array.
///
/// This is the shape most probes fall back to when their concern has no
/// dedicated structure, and it is accepted alongside every dedicated shape.
pub(crate) fn generic_issues(root: &Value) -> Vec<IssueDraft> {
    let Some(obj) = root.as_object() else {
        return Vec::new();
    };
    ["issues", "violations"]
        .iter()
        .filter_map(|key| obj.get(*key))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(generic_issue)
        .collect()
}

fn generic_issue(item: &Value) -> Option<IssueDraft> {
    let Some(obj) = item.as_object() else {
        tracing::debug!("Skipping non-object issue entry: {item}");
        return None;
    };

    let mut draft = IssueDraft {
        id: first_str(obj, &["id", "rule", "ruleId", "type", "code"]),
        severity: first_str(obj, &["severity", "impact", "level"])
            .and_then(|s| Severity::from_vocabulary(&s)),
        summary: first_str(obj, &["message", "description", "help", "title"]),
        wcag_criterion: first_str(obj, &["wcagCriterion", "wcag", "criterion"]),
        business_impact: first_str(obj, &["businessImpact"])
            .and_then(|s| BusinessImpact::from_vocabulary(&s)),
        user_benefit: first_str(obj, &["userBenefit", "benefit"]),
        ..IssueDraft::default()
    };

    for key in ["elements", "nodes", "selectors", "locations", "targets"] {
        if let Some((refs, count)) = obj.get(key).and_then(element_refs) {
            draft.locations.extend(refs);
            draft.occurrences = Some(draft.occurrences.unwrap_or(0).saturating_add(count));
        }
    }
    if let Some(count) = obj.get("count").and_then(as_count) {
        draft.occurrences = Some(draft.occurrences.unwrap_or(0).max(count));
    }
    draft.fix_minutes = ["estimatedFixMinutes", "fixMinutes", "effortMinutes"]
        .iter()
        .filter_map(|k| obj.get(*k))
        .find_map(as_count)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX));

    Some(draft)
}
