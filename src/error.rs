//! Error types for the notifier.

use thiserror::Error;

/// Errors returned by the outbound message transport.
///
/// These are produced by a [`Transport`](crate::transport::Transport)
/// implementation and handed back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The HTTP request failed (connection, timeout, or non-2xx status).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The API answered but rejected the message (`"ok": false`).
    #[error("Slack API error: {0}")]
    Api(String),

    /// The API response could not be decoded.
    #[error("Failed to decode Slack response: {0}")]
    Decode(String),
}

/// Errors that can occur while configuring the notifier or sending a message.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// Empty token or channel, or an unusable settings source.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A send was attempted before `configure` succeeded.
    #[error("slack client not configured, call configure() first")]
    NotConfigured,

    /// The result document is not a JSON object.
    #[error("malformed result document: {0}")]
    MalformedInput(String),

    /// Forwarded from the transport.
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NotifierError>;
