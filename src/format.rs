//! Value formatting for metric display.
//!
//! Every function here is total: values that are missing or not numeric come
//! back as [`NOT_AVAILABLE`] instead of an error.

use crate::document::MetricValue;

/// Placeholder for values that are missing or cannot be formatted
pub const NOT_AVAILABLE: &str = "N/A";

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Display unit for a metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Milliseconds: `76.24ms`
    Duration,
    /// Per-second rate: `12.64/s`
    Rate,
    /// Fraction rendered as a percentage: `0.95` -> `95.00%`
    Percentage,
    /// Bytes scaled to KB or MB: `1.00 KB`, `2.76 MB`
    ByteRate,
    /// Whole number: `130`
    Count,
}

/// Format a metric value in the given unit
pub fn format_value(value: &MetricValue, unit: Unit) -> String {
    match value.as_f64() {
        Some(n) => format_number(n, unit),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format a plain number in the given unit
pub fn format_number(n: f64, unit: Unit) -> String {
    if !n.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    match unit {
        Unit::Duration => format!("{:.2}ms", n),
        Unit::Rate => format!("{:.2}/s", n),
        Unit::Percentage => format!("{:.2}%", n * 100.0),
        Unit::ByteRate => {
            if n >= MIB {
                format!("{:.2} MB", n / MIB)
            } else {
                format!("{:.2} KB", n / KIB)
            }
        }
        Unit::Count => format!("{:.0}", n),
    }
}

/// Pass rate of a check as a percentage string
///
/// A check that never ran counts as fully passing.
pub fn check_pass_rate(passes: u64, fails: u64) -> String {
    let total = passes.saturating_add(fails);
    if total == 0 {
        return "100%".to_string();
    }
    format!("{:.2}%", passes as f64 / total as f64 * 100.0)
}
