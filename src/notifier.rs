//! The notifier client.
//!
//! A [`Notifier`] starts unconfigured. [`Notifier::configure`] validates the
//! token and channel and opens a transport session; every send operation
//! fails with [`NotifierError::NotConfigured`] until that has succeeded.
//!
//! A notifier is meant for a single owner. Wrap it in a lock if several
//! threads need to send through the same instance.

use crate::blocks::Message;
use crate::document::ResultDocument;
use crate::error::{NotifierError, Result};
use crate::render::{LinkTemplates, RunEvent, render_run_event, render_summary};
use crate::summary::summarize;
use crate::transport::{SlackTransport, Transport};
use chrono::{DateTime, Utc};
use log::debug;

pub const DEFAULT_TEST_NAME: &str = "API Performance Test";
pub const DEFAULT_ENVIRONMENT: &str = "staging";

/// Presentation settings shared by every message a notifier sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSettings {
    /// Shown in the results header
    pub test_name: String,
    /// Shown on the "Environment" line
    pub environment: String,
    /// Dashboards and graphs linked from run notifications
    pub links: LinkTemplates,
}

impl Default for MessageSettings {
    fn default() -> Self {
        MessageSettings {
            test_name: DEFAULT_TEST_NAME.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            links: LinkTemplates::default(),
        }
    }
}

/// State that exists only once `configure` succeeded
struct Session<T> {
    transport: T,
    channel: String,
    user: Option<String>,
}

/// Sends plain messages, result summaries, and run notifications to one channel
pub struct Notifier<T: Transport = SlackTransport> {
    settings: MessageSettings,
    session: Option<Session<T>>,
}

impl Notifier<SlackTransport> {
    /// Unconfigured notifier that posts through the Slack Web API
    pub fn new() -> Self {
        Self::with_settings(MessageSettings::default())
    }
}

impl Default for Notifier<SlackTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Notifier<T> {
    /// Unconfigured notifier with explicit presentation settings
    pub fn with_settings(settings: MessageSettings) -> Self {
        Notifier { settings, session: None }
    }

    /// Validate credentials and open a session
    ///
    /// On error the notifier is left exactly as it was.
    pub fn configure(&mut self, token: &str, channel: &str, user: Option<&str>) -> Result<()> {
        if token.trim().is_empty() {
            return Err(NotifierError::Configuration("slack token cannot be empty".to_string()));
        }
        if channel.trim().is_empty() {
            return Err(NotifierError::Configuration("slack channel cannot be empty".to_string()));
        }

        debug!("configuring notifier for channel {}", channel);

        self.session = Some(Session {
            transport: T::connect(token),
            channel: channel.to_string(),
            user: user.map(str::to_string),
        });
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.session.is_some()
    }

    pub fn settings(&self) -> &MessageSettings {
        &self.settings
    }

    /// The active transport, if configured
    pub fn transport(&self) -> Option<&T> {
        self.session.as_ref().map(|s| &s.transport)
    }

    /// Post `text` verbatim
    pub fn send_message(&self, text: &str) -> Result<()> {
        let session = self.session()?;
        self.deliver(session, Message::Text(text.to_string()))
    }

    /// Summarize a result document and post it as blocks
    pub fn send_test_results(&self, document: &ResultDocument) -> Result<()> {
        let session = self.session()?;
        let message = self.results_message(document);
        self.deliver(session, message)
    }

    /// Parse summary JSON, then behave as [`send_test_results`](Self::send_test_results)
    ///
    /// The configuration check comes first, so an unconfigured notifier
    /// reports `NotConfigured` even for unparseable input.
    pub fn send_test_results_json(&self, text: &str) -> Result<()> {
        self.session()?;
        let document = ResultDocument::parse(text)?;
        self.send_test_results(&document)
    }

    /// Post a start or end notification, closing end-of-run ranges at the current time
    pub fn send_run_event(&self, event: &RunEvent) -> Result<()> {
        self.send_run_event_at(event, Utc::now())
    }

    /// Post a start or end notification with an explicit "now"
    pub fn send_run_event_at(&self, event: &RunEvent, now: DateTime<Utc>) -> Result<()> {
        let session = self.session()?;
        let message = render_run_event(event, session.user.as_deref(), &self.settings.links, now);
        self.deliver(session, message)
    }

    /// Render the results message without sending it
    pub fn results_message(&self, document: &ResultDocument) -> Message {
        let summary = summarize(document, &self.settings.test_name, &self.settings.environment);
        render_summary(&summary)
    }

    fn session(&self) -> Result<&Session<T>> {
        self.session.as_ref().ok_or(NotifierError::NotConfigured)
    }

    fn deliver(&self, session: &Session<T>, message: Message) -> Result<()> {
        session.transport.post(&session.channel, &message)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "notifier_test.rs"]
mod notifier_test;
