/// Block rendering
///
/// This module handles:
/// - Laying out a result summary as Slack blocks, paging fields 10 at a time
/// - Laying out start/end run notifications with dashboard buttons and graph images
/// - Stamping dashboard and graph URLs with a time range
///
/// Dashboards and graphs are kept in `BTreeMap`s so they always render in
/// name order.
use crate::blocks::{Block, Element, MAX_BLOCKS, MAX_SECTION_FIELDS, Message, TextObject};
use crate::summary::ResultSummary;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fmt;

/// How far past the window start a start-of-run dashboard link reaches
pub const START_LOOKAHEAD_MS: i64 = 60 * 60 * 1000;

/// Shown when no user label was configured
pub const UNKNOWN_USER: &str = "unknown";

/// Which end of a run a notification marks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEventKind {
    Start,
    End,
}

impl RunEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunEventKind::Start => "Start",
            RunEventKind::End => "End",
        }
    }
}

impl fmt::Display for RunEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A start or end notification for a named run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEvent {
    pub kind: RunEventKind,
    /// Human-readable name of the run, e.g. "Checkout soak test"
    pub name: String,
    /// When the run (or its observation window) began
    pub window_start: DateTime<Utc>,
}

/// Named dashboard and graph URLs attached to run notifications
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTemplates {
    pub dashboards: BTreeMap<String, String>,
    pub graphs: BTreeMap<String, String>,
}

/// Render a result summary as a message
pub fn render_summary(summary: &ResultSummary) -> Message {
    let mut blocks = vec![
        Block::header(format!("Performance Test Results: {}", summary.test_name)),
        Block::divider(),
        Block::text(format!("*Status:* {} {}", summary.status, summary.status.emoji())),
        Block::text(format!("*Environment:* {}", summary.environment)),
        Block::divider(),
        Block::text("*Test Metrics:*"),
    ];

    let metric_fields =
        summary.metrics.iter().map(|m| TextObject::markdown(format!("*{}*\n{}", m.label, m.value))).collect();
    blocks.extend(field_sections(metric_fields));

    if !summary.checks.is_empty() {
        blocks.push(Block::divider());
        blocks.push(Block::text("*Checks Results:*"));

        let check_fields = summary
            .checks
            .iter()
            .map(|c| {
                TextObject::markdown(format!("*{}*\n✓ {} | ✗ {} | Rate: {}", c.name, c.passes, c.fails, c.rate))
            })
            .collect();
        let mut sections = field_sections(check_fields);

        // Keep within Slack's block limit, leaving room for a note on what was cut
        let room = MAX_BLOCKS.saturating_sub(blocks.len());
        if sections.len() > room {
            let kept = room.saturating_sub(1);
            sections.truncate(kept);
            let shown: usize = sections.iter().map(Block::field_count).sum();
            let hidden = summary.checks.len() - shown;
            warn!("{} checks do not fit in one message, omitting {}", summary.checks.len(), hidden);
            sections.push(Block::text(format!("_…and {} more checks_", hidden)));
        }
        blocks.extend(sections);
    }

    debug!("rendered result summary into {} blocks", blocks.len());

    Message::Blocks {
        blocks,
        fallback: format!("Performance Test Results: {} ({})", summary.test_name, summary.status),
    }
}

/// Render a start or end notification
///
/// `now` closes the time range of end-of-run links.
pub fn render_run_event(event: &RunEvent, user: Option<&str>, links: &LinkTemplates, now: DateTime<Utc>) -> Message {
    let title = format!("{}: {} notification", event.name, event.kind);
    let user = user.map(str::trim).filter(|u| !u.is_empty()).unwrap_or(UNKNOWN_USER);

    let mut blocks = vec![
        Block::header(title.clone()),
        Block::divider(),
        Block::text(format!("*Triggered by:* {}", user)),
        Block::divider(),
    ];

    let from = event.window_start.timestamp_millis();
    let to = match event.kind {
        RunEventKind::Start => from.saturating_add(START_LOOKAHEAD_MS),
        RunEventKind::End => now.timestamp_millis(),
    };

    if event.kind == RunEventKind::End {
        for (name, url) in &links.graphs {
            blocks.push(Block::image(with_time_range(url, from, to), name));
        }
    }

    for (name, url) in &links.dashboards {
        let button = Element::button(format!("Open {} dashboard", name), with_time_range(url, from, to));
        blocks.push(Block::Actions { elements: vec![button] });
    }

    debug!("rendered {} notification for '{}' into {} blocks", event.kind, event.name, blocks.len());

    Message::Blocks { blocks, fallback: title }
}

/// Append `from`/`to` (epoch milliseconds) to a URL's query string
///
/// A `#fragment` stays at the end.
pub fn with_time_range(url: &str, from_ms: i64, to_ms: i64) -> String {
    let (base, fragment) = match url.find('#') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    };
    let separator = if base.ends_with('?') || base.ends_with('&') {
        ""
    } else if base.contains('?') {
        "&"
    } else {
        "?"
    };
    format!("{}{}from={}&to={}{}", base, separator, from_ms, to_ms, fragment)
}

/// Split fields into section blocks of at most `MAX_SECTION_FIELDS` each
fn field_sections(fields: Vec<TextObject>) -> Vec<Block> {
    fields.chunks(MAX_SECTION_FIELDS).map(|chunk| Block::fields(chunk.to_vec())).collect()
}

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;
