/// Settings resolution module
///
/// This module handles:
/// - Reading the optional TOML settings file
/// - Applying K6_SLACK_* environment overrides
/// - Applying command-line overrides
///
/// Later layers win: file, then environment, then CLI. The token is only
/// taken from the environment or the command line, never from the file.
use crate::cli::CliArgs;
use crate::error::{NotifierError, Result};
use crate::notifier::MessageSettings;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_TOKEN: &str = "K6_SLACK_TOKEN";
pub const ENV_CHANNEL: &str = "K6_SLACK_CHANNEL";
pub const ENV_USER: &str = "K6_SLACK_USER";
pub const ENV_TEST_NAME: &str = "K6_SLACK_TEST_NAME";
pub const ENV_ENVIRONMENT: &str = "K6_SLACK_ENVIRONMENT";
pub const ENV_DASHBOARD_URLS: &str = "K6_SLACK_DASHBOARD_URLS";
pub const ENV_GRAPH_URLS: &str = "K6_SLACK_GRAPH_URLS";

/// Default settings file location
/// - Linux: ~/.config/k6-slack-notify/config.toml
/// - macOS: ~/Library/Application Support/k6-slack-notify/config.toml
/// - Windows: %APPDATA%/k6-slack-notify/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("k6-slack-notify").join("config.toml"))
}

/// Contents of the settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    #[serde(alias = "slackChannelID")]
    pub channel: Option<String>,
    pub user: Option<String>,
    pub test_name: Option<String>,
    pub environment: Option<String>,
    #[serde(alias = "dashboardUrls")]
    pub dashboards: BTreeMap<String, String>,
    #[serde(alias = "graphUrls")]
    pub graphs: BTreeMap<String, String>,
}

/// Fully resolved settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub token: Option<String>,
    pub channel: Option<String>,
    pub user: Option<String>,
    pub message: MessageSettings,
}

/// Load and parse a settings file
pub fn load_file(path: &Path) -> Result<FileConfig> {
    debug!("Loading settings from {:?}", path);
    let text = fs::read_to_string(path)?;
    toml::from_str(&text).map_err(|e| NotifierError::Configuration(format!("{}: {}", path.display(), e)))
}

/// Resolve settings from the file, the process environment, and CLI arguments
pub fn resolve(args: &CliArgs) -> Result<Settings> {
    resolve_with_env(args, |key| env::var(key).ok())
}

/// Resolve settings with an injectable environment lookup
pub fn resolve_with_env<F>(args: &CliArgs, env_lookup: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    // Step 1: settings file (explicit path must exist, default path is optional)
    let file = match &args.config {
        Some(path) => load_file(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => load_file(&path)?,
            _ => FileConfig::default(),
        },
    };

    let mut settings = Settings {
        token: None,
        channel: file.channel,
        user: file.user,
        message: MessageSettings::default(),
    };
    if let Some(name) = file.test_name {
        settings.message.test_name = name;
    }
    if let Some(environment) = file.environment {
        settings.message.environment = environment;
    }
    merge_links(&mut settings.message.links.dashboards, file.dashboards);
    merge_links(&mut settings.message.links.graphs, file.graphs);

    // Step 2: environment
    let non_empty = |key: &str| env_lookup(key).filter(|v| !v.trim().is_empty());
    if let Some(token) = non_empty(ENV_TOKEN) {
        settings.token = Some(token);
    }
    if let Some(channel) = non_empty(ENV_CHANNEL) {
        settings.channel = Some(channel);
    }
    if let Some(user) = non_empty(ENV_USER) {
        settings.user = Some(user);
    }
    if let Some(name) = non_empty(ENV_TEST_NAME) {
        settings.message.test_name = name;
    }
    if let Some(environment) = non_empty(ENV_ENVIRONMENT) {
        settings.message.environment = environment;
    }
    if let Some(json) = non_empty(ENV_DASHBOARD_URLS) {
        merge_links(&mut settings.message.links.dashboards, parse_link_json(ENV_DASHBOARD_URLS, &json)?);
    }
    if let Some(json) = non_empty(ENV_GRAPH_URLS) {
        merge_links(&mut settings.message.links.graphs, parse_link_json(ENV_GRAPH_URLS, &json)?);
    }

    // Step 3: command line
    if args.token.is_some() {
        settings.token = args.token.clone();
    }
    if args.channel.is_some() {
        settings.channel = args.channel.clone();
    }
    if args.user.is_some() {
        settings.user = args.user.clone();
    }
    if let Some(name) = &args.test_name {
        settings.message.test_name = name.clone();
    }
    if let Some(environment) = &args.environment {
        settings.message.environment = environment.clone();
    }
    merge_links(&mut settings.message.links.dashboards, parse_link_pairs(&args.dashboards)?);
    merge_links(&mut settings.message.links.graphs, parse_link_pairs(&args.graphs)?);

    debug!(
        "Resolved settings: channel={:?}, token set={}, {} dashboards, {} graphs",
        settings.channel,
        settings.token.is_some(),
        settings.message.links.dashboards.len(),
        settings.message.links.graphs.len()
    );

    Ok(settings)
}

/// Parse a JSON object of name -> URL
pub fn parse_link_json(source: &str, json: &str) -> Result<BTreeMap<String, String>> {
    serde_json::from_str(json)
        .map_err(|e| NotifierError::Configuration(format!("{} must be a JSON object of name to URL: {}", source, e)))
}

/// Parse NAME=URL pairs
pub fn parse_link_pairs(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(name, url)| (name.trim().to_string(), url.trim().to_string()))
                .ok_or_else(|| NotifierError::Configuration(format!("Expected NAME=URL, got '{}'", pair)))
        })
        .collect()
}

/// Insert links into `target`, dropping entries with an empty name or URL
fn merge_links(target: &mut BTreeMap<String, String>, links: BTreeMap<String, String>) {
    for (name, url) in links {
        if name.trim().is_empty() || url.trim().is_empty() {
            warn!("Ignoring link with empty name or URL: '{}' = '{}'", name, url);
            continue;
        }
        target.insert(name, url);
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
