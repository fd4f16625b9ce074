use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "k6-slack-notify")]
#[command(about = "Post k6 load-test results and run notifications to Slack")]
#[command(version)]
pub struct CliArgs {
    /// Settings file (TOML). Default: <config dir>/k6-slack-notify/config.toml if it exists
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Slack bot token (overrides K6_SLACK_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Destination channel ID (overrides K6_SLACK_CHANNEL and the settings file)
    #[arg(long, value_name = "CHANNEL")]
    pub channel: Option<String>,

    /// Who triggered the run, shown on start/end notifications
    #[arg(long, value_name = "NAME")]
    pub user: Option<String>,

    /// Test name shown in the results header
    #[arg(long, value_name = "NAME")]
    pub test_name: Option<String>,

    /// Environment shown in the results message
    #[arg(long, value_name = "NAME")]
    pub environment: Option<String>,

    /// Dashboard linked from run notifications; repeatable
    /// Example: --dashboard overview=https://grafana.example/d/abc
    #[arg(long = "dashboard", value_name = "NAME=URL")]
    pub dashboards: Vec<String>,

    /// Graph image attached to end-of-run notifications; repeatable
    #[arg(long = "graph", value_name = "NAME=URL")]
    pub graphs: Vec<String>,

    /// Print the request payload instead of posting it
    #[arg(long)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Post a plain text message
    Message {
        /// Message text, sent verbatim
        text: String,
    },

    /// Post a formatted summary of a k6 result document
    Results {
        /// Summary JSON (handleSummary data or --summary-export output); "-" reads stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Announce the start of a run
    Start {
        /// Name of the run
        #[arg(long, value_name = "NAME")]
        event: String,

        /// When the run started (RFC 3339). Default: now
        #[arg(long, value_name = "TIMESTAMP")]
        window_start: Option<DateTime<Utc>>,
    },

    /// Announce the end of a run
    End {
        /// Name of the run
        #[arg(long, value_name = "NAME")]
        event: String,

        /// When the run started (RFC 3339)
        #[arg(long, value_name = "TIMESTAMP")]
        window_start: DateTime<Utc>,
    },
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Message { text } if text.trim().is_empty() => {
                return Err("Message text cannot be empty".to_string());
            }
            Command::Start { event, .. } | Command::End { event, .. } if event.trim().is_empty() => {
                return Err("--event cannot be empty".to_string());
            }
            _ => {}
        }

        for pair in self.dashboards.iter().chain(&self.graphs) {
            if !pair.contains('=') {
                return Err(format!("Expected NAME=URL, got '{}'", pair));
            }
        }

        Ok(())
    }
}
