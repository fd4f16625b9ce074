/// Result document model
///
/// This module handles:
/// - Converting a raw k6 summary (arbitrary JSON) into a typed representation
/// - Safe two-level metric lookup where absence is a normal outcome
/// - Collecting check records from the root group and its nested groups
///
/// Nothing in here fails on a partial document. Only text that is not a JSON
/// object at all is rejected.
use crate::error::{NotifierError, Result};
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

/// Shared sentinel returned by lookups that find nothing
static MISSING: MetricValue = MetricValue::Missing;

/// Label used for check records that carry no name
pub const UNNAMED_CHECK: &str = "(unnamed check)";

/// A single value inside a metric's `values` mapping
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Missing,
    Number(f64),
    Text(String),
    Map(BTreeMap<String, MetricValue>),
}

impl MetricValue {
    /// Numeric view of this value, if it is a finite number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, MetricValue::Missing)
    }

    /// Look up a key when this value is a map
    pub fn get(&self, key: &str) -> &MetricValue {
        match self {
            MetricValue::Map(map) => map.get(key).unwrap_or(&MISSING),
            _ => &MISSING,
        }
    }
}

impl From<&Value> for MetricValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => MetricValue::Missing,
            Value::Number(n) => n.as_f64().map(MetricValue::Number).unwrap_or(MetricValue::Missing),
            Value::String(s) => MetricValue::Text(s.clone()),
            // k6 never emits booleans or arrays inside `values`; keep them visible as text
            Value::Bool(b) => MetricValue::Text(b.to_string()),
            Value::Array(_) => MetricValue::Text(value.to_string()),
            Value::Object(map) => {
                MetricValue::Map(map.iter().map(|(k, v)| (k.clone(), MetricValue::from(v))).collect())
            }
        }
    }
}

/// One entry of the document's `metrics` mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metric {
    /// k6 metric type ("trend", "counter", "rate", "gauge")
    pub metric_type: Option<String>,
    /// What the values contain ("time", "data", "default")
    pub contains: Option<String>,
    pub values: BTreeMap<String, MetricValue>,
}

/// Keys of a `--summary-export` metric that are not values
const EXPORT_NON_VALUE_KEYS: &[&str] = &["type", "contains", "thresholds"];

impl Metric {
    fn from_json(value: &Value) -> Self {
        let values = match (value.get("values"), value) {
            (Some(Value::Object(map)), _) => map.iter().map(|(k, v)| (k.clone(), MetricValue::from(v))).collect(),
            // `--summary-export` keeps the values flat on the metric itself
            (None, Value::Object(map)) => export_values(map),
            _ => BTreeMap::new(),
        };

        Metric {
            metric_type: value.get("type").and_then(Value::as_str).map(str::to_string),
            contains: value.get("contains").and_then(Value::as_str).map(str::to_string),
            values,
        }
    }
}

/// Values of a flat `--summary-export` metric
///
/// Rate metrics there carry their ratio as `value` next to `passes`/`fails`;
/// it is also exposed as `rate` so both layouts answer the same lookups.
fn export_values(map: &serde_json::Map<String, Value>) -> BTreeMap<String, MetricValue> {
    let mut values: BTreeMap<String, MetricValue> = map
        .iter()
        .filter(|(k, _)| !EXPORT_NON_VALUE_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), MetricValue::from(v)))
        .collect();

    let is_rate = values.contains_key("passes") || values.contains_key("fails");
    if is_rate && !values.contains_key("rate") {
        if let Some(ratio) = values.get("value").cloned() {
            values.insert("rate".to_string(), ratio);
        }
    }
    values
}

/// A check record as found in a group's `checks` list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    pub name: String,
    pub passes: u64,
    pub fails: u64,
}

/// Typed view of a k6 end-of-test summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultDocument {
    pub metrics: BTreeMap<String, Metric>,
    /// Check records in document order, root group first, then nested groups depth first
    pub checks: Vec<CheckRecord>,
}

impl ResultDocument {
    /// Parse summary JSON text
    ///
    /// Fails only when the text is not JSON or its top level is not an object.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| NotifierError::MalformedInput(e.to_string()))?;
        Self::from_json(&value)
    }

    /// Build from an already-parsed JSON value
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(NotifierError::MalformedInput(format!(
                "expected a JSON object at the top level, found {}",
                json_kind(value)
            )));
        };

        let metrics: BTreeMap<String, Metric> = match root.get("metrics") {
            Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), Metric::from_json(v))).collect(),
            _ => BTreeMap::new(),
        };

        let mut checks = Vec::new();
        if let Some(group) = root.get("root_group") {
            collect_checks(group, &mut checks);
        }

        debug!("parsed result document: {} metrics, {} check records", metrics.len(), checks.len());

        Ok(ResultDocument { metrics, checks })
    }

    /// Shorthand for [`lookup`] on this document's metrics
    pub fn lookup(&self, metric_name: &str, field_name: &str) -> &MetricValue {
        lookup(&self.metrics, metric_name, field_name)
    }
}

/// Two-level lookup: `metrics[metric_name].values[field_name]`
///
/// Any missing level yields `MetricValue::Missing`.
pub fn lookup<'a>(metrics: &'a BTreeMap<String, Metric>, metric_name: &str, field_name: &str) -> &'a MetricValue {
    metrics.get(metric_name).and_then(|m| m.values.get(field_name)).unwrap_or(&MISSING)
}

/// Walk a group and its nested `groups`, appending every check record found
///
/// `handleSummary` data lists checks and groups as arrays; `--summary-export`
/// keys them by name in objects. Both are accepted.
fn collect_checks(group: &Value, out: &mut Vec<CheckRecord>) {
    for (key, check) in entries(group.get("checks")) {
        if !check.is_object() {
            continue;
        }
        let name = check
            .get("name")
            .and_then(Value::as_str)
            .or(key)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNNAMED_CHECK)
            .to_string();
        out.push(CheckRecord { name, passes: count_field(check, "passes"), fails: count_field(check, "fails") });
    }

    for (_, nested) in entries(group.get("groups")) {
        collect_checks(nested, out);
    }
}

/// Elements of an array, or values of an object paired with their keys
fn entries(value: Option<&Value>) -> Vec<(Option<&str>, &Value)> {
    match value {
        Some(Value::Array(items)) => items.iter().map(|v| (None, v)).collect(),
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (Some(k.as_str()), v)).collect(),
        _ => Vec::new(),
    }
}

/// Read a non-negative count, treating anything unusable as zero
fn count_field(value: &Value, key: &str) -> u64 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64)).unwrap_or(0),
        _ => 0,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;
