//! Result summarization.
//!
//! Turns a [`ResultDocument`] into the labelled strings shown in the Slack
//! message: overall status, a fixed list of metric rows, and per-check pass
//! rates.

use crate::document::{MetricValue, ResultDocument};
use crate::format::{NOT_AVAILABLE, Unit, check_pass_rate, format_value};
use log::debug;
use std::fmt;

/// Overall outcome of a test run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Passed,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Passed => "passed",
            RunStatus::Failed => "failed",
        }
    }

    /// Emoji shown next to the status line
    pub fn emoji(&self) -> &'static str {
        match self {
            RunStatus::Passed => "✅",
            RunStatus::Failed => "❌",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labelled, formatted metric
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRow {
    pub label: String,
    pub value: String,
}

/// Aggregated outcome of one named check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub passes: u64,
    pub fails: u64,
    /// Pass rate, e.g. "80.00%" ("100%" when the check never ran)
    pub rate: String,
}

/// Everything the renderer needs to build a results message
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub status: RunStatus,
    pub test_name: String,
    pub environment: String,
    pub metrics: Vec<MetricRow>,
    pub checks: Vec<CheckResult>,
}

/// (label, metric, field, unit) for every row that maps straight onto one value
const TIMING_ROWS: &[(&str, &str, &str, Unit)] = &[
    ("Response Time (avg)", "http_req_duration", "avg", Unit::Duration),
    ("Response Time (min)", "http_req_duration", "min", Unit::Duration),
    ("Response Time (med)", "http_req_duration", "med", Unit::Duration),
    ("Response Time (max)", "http_req_duration", "max", Unit::Duration),
    ("Response Time (p90)", "http_req_duration", "p(90)", Unit::Duration),
    ("Response Time (p95)", "http_req_duration", "p(95)", Unit::Duration),
    ("Time to First Byte (avg)", "http_req_waiting", "avg", Unit::Duration),
    ("Connection Time (avg)", "http_req_connecting", "avg", Unit::Duration),
    ("TLS Handshake (avg)", "http_req_tls_handshaking", "avg", Unit::Duration),
    ("Sending Time (avg)", "http_req_sending", "avg", Unit::Duration),
    ("Receiving Time (avg)", "http_req_receiving", "avg", Unit::Duration),
    ("Blocking Time (avg)", "http_req_blocked", "avg", Unit::Duration),
];

const THROUGHPUT_ROWS: &[(&str, &str)] = &[("Data Received", "data_received"), ("Data Sent", "data_sent")];

const COUNTER_ROWS: &[(&str, &str, &str, Unit)] = &[
    ("Total Requests", "http_reqs", "count", Unit::Count),
    ("Request Rate", "http_reqs", "rate", Unit::Rate),
    ("Iterations", "iterations", "count", Unit::Count),
    ("Iteration Rate", "iterations", "rate", Unit::Rate),
    ("Virtual Users", "vus", "value", Unit::Count),
];

/// Summarize a result document
pub fn summarize(document: &ResultDocument, test_name: &str, environment: &str) -> ResultSummary {
    let fail_rate = document.lookup("http_req_failed", "rate").as_f64();
    let status = match fail_rate {
        Some(rate) if rate > 0.0 => RunStatus::Failed,
        _ => RunStatus::Passed,
    };

    let mut metrics = Vec::with_capacity(TIMING_ROWS.len() + THROUGHPUT_ROWS.len() + COUNTER_ROWS.len() + 1);

    for &(label, metric, field, unit) in TIMING_ROWS {
        metrics.push(row(label, format_value(document.lookup(metric, field), unit)));
    }

    for &(label, metric) in THROUGHPUT_ROWS {
        let value = format_value(document.lookup(metric, "rate"), Unit::ByteRate);
        metrics.push(row(label, per_second(value)));
    }

    for &(label, metric, field, unit) in COUNTER_ROWS {
        metrics.push(row(label, format_value(document.lookup(metric, field), unit)));
    }

    let success = fail_rate.map(|rate| MetricValue::Number(1.0 - rate)).unwrap_or(MetricValue::Missing);
    metrics.push(row("Success Rate", format_value(&success, Unit::Percentage)));

    let checks = aggregate_checks(document);

    debug!("summarized run '{}': status={}, {} metrics, {} checks", test_name, status, metrics.len(), checks.len());

    ResultSummary {
        status,
        test_name: test_name.to_string(),
        environment: environment.to_string(),
        metrics,
        checks,
    }
}

/// Merge check records by name, keeping first-seen order
fn aggregate_checks(document: &ResultDocument) -> Vec<CheckResult> {
    let mut merged: Vec<(String, u64, u64)> = Vec::new();

    for record in &document.checks {
        match merged.iter_mut().find(|(name, _, _)| *name == record.name) {
            Some((_, passes, fails)) => {
                *passes = passes.saturating_add(record.passes);
                *fails = fails.saturating_add(record.fails);
            }
            None => merged.push((record.name.clone(), record.passes, record.fails)),
        }
    }

    merged
        .into_iter()
        .map(|(name, passes, fails)| CheckResult { rate: check_pass_rate(passes, fails), name, passes, fails })
        .collect()
}

fn row(label: &str, value: String) -> MetricRow {
    MetricRow { label: label.to_string(), value }
}

fn per_second(value: String) -> String {
    if value == NOT_AVAILABLE { value } else { format!("{}/s", value) }
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod summary_test;
