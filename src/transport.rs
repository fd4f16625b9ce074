/// Outbound message transport
///
/// This module handles:
/// - The `Transport` seam the notifier sends through
/// - Posting to Slack's `chat.postMessage` over HTTP
/// - A dry-run transport that prints the request payload instead
///
/// Transports never retry; the first error is returned to the caller.
use crate::blocks::Message;
use crate::error::TransportError;
use log::debug;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

const USER_AGENT: &str = "k6-slack-notify/0.1.0";

/// Default Slack Web API endpoint for posting messages
pub const SLACK_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Per-request timeout for the Slack API
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivers a rendered message to a destination channel
pub trait Transport {
    /// Build a transport authenticated with `token`
    fn connect(token: &str) -> Self
    where
        Self: Sized;

    /// Deliver `message` to `channel`
    fn post(&self, channel: &str, message: &Message) -> Result<(), TransportError>;
}

/// Build the `chat.postMessage` request body for a message
pub fn build_payload(channel: &str, message: &Message) -> Value {
    match message {
        Message::Text(text) => json!({ "channel": channel, "text": text }),
        Message::Blocks { blocks, fallback } => json!({
            "channel": channel,
            "text": fallback,
            "blocks": blocks,
        }),
    }
}

/// Slack Web API response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Posts messages through the Slack Web API
pub struct SlackTransport {
    agent: ureq::Agent,
    token: String,
    endpoint: String,
}

impl SlackTransport {
    /// Point the transport at a different endpoint (Slack-compatible gateways, local stubs)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for SlackTransport {
    fn connect(token: &str) -> Self {
        let agent = ureq::AgentBuilder::new().user_agent(USER_AGENT).timeout(REQUEST_TIMEOUT).build();
        SlackTransport { agent, token: token.to_string(), endpoint: SLACK_POST_MESSAGE_URL.to_string() }
    }

    fn post(&self, channel: &str, message: &Message) -> Result<(), TransportError> {
        debug!("posting message with {} blocks to channel {} via {}", message.blocks().len(), channel, self.endpoint);

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", self.token))
            .send_json(build_payload(channel, message))
            .map_err(http_error)?;

        let body: ApiResponse = response.into_json().map_err(|e| TransportError::Decode(e.to_string()))?;
        check_response(body)
    }
}

fn check_response(body: ApiResponse) -> Result<(), TransportError> {
    if body.ok {
        debug!("slack accepted the message");
        Ok(())
    } else {
        Err(TransportError::Api(body.error.unwrap_or_else(|| "unknown_error".to_string())))
    }
}

fn http_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            TransportError::Http(format!("status {}: {}", code, body.trim()))
        }
        ureq::Error::Transport(transport) => TransportError::Http(transport.to_string()),
    }
}

/// Prints the request payload to stdout instead of sending it
pub struct DryRunTransport;

impl Transport for DryRunTransport {
    fn connect(_token: &str) -> Self {
        DryRunTransport
    }

    fn post(&self, channel: &str, message: &Message) -> Result<(), TransportError> {
        let payload = build_payload(channel, message);
        let text = serde_json::to_string_pretty(&payload).map_err(|e| TransportError::Decode(e.to_string()))?;
        println!("{}", text);
        Ok(())
    }
}
