//! Slack Block Kit display model.
//!
//! Only the block types this tool emits are modelled. Serialization follows
//! the JSON shape `chat.postMessage` expects in its `blocks` array.

use serde::Serialize;

/// Maximum number of fields Slack accepts in a single section block
pub const MAX_SECTION_FIELDS: usize = 10;

/// Maximum number of blocks Slack accepts in one message
pub const MAX_BLOCKS: usize = 50;

/// Maximum length, in characters, of a header's text
pub const MAX_HEADER_CHARS: usize = 150;

/// A text object inside a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TextObject {
    #[serde(rename = "plain_text")]
    Plain { text: String, emoji: bool },
    #[serde(rename = "mrkdwn")]
    Markdown { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        TextObject::Plain { text: text.into(), emoji: true }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        TextObject::Markdown { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            TextObject::Plain { text, .. } | TextObject::Markdown { text } => text,
        }
    }
}

/// Interactive element of an actions block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    /// Link button; Slack opens `url` in the browser
    Button { text: TextObject, url: String },
}

impl Element {
    pub fn button(label: impl Into<String>, url: impl Into<String>) -> Self {
        Element::Button { text: TextObject::plain(label), url: url.into() }
    }
}

/// A single display block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
    },
    Divider,
    Section {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<TextObject>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        fields: Vec<TextObject>,
    },
    Actions {
        elements: Vec<Element>,
    },
    Image {
        image_url: String,
        alt_text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<TextObject>,
    },
}

impl Block {
    /// Header block; text past `MAX_HEADER_CHARS` is cut and ends in "…"
    pub fn header(text: impl Into<String>) -> Self {
        let mut text = text.into();
        if text.chars().count() > MAX_HEADER_CHARS {
            text = text.chars().take(MAX_HEADER_CHARS - 1).chain(std::iter::once('…')).collect();
        }
        Block::Header { text: TextObject::plain(text) }
    }

    pub fn divider() -> Self {
        Block::Divider
    }

    /// Section with a single markdown text
    pub fn text(text: impl Into<String>) -> Self {
        Block::Section { text: Some(TextObject::markdown(text)), fields: Vec::new() }
    }

    /// Section made only of fields
    pub fn fields(fields: Vec<TextObject>) -> Self {
        Block::Section { text: None, fields }
    }

    pub fn image(url: impl Into<String>, name: &str) -> Self {
        Block::Image { image_url: url.into(), alt_text: name.to_string(), title: Some(TextObject::plain(name)) }
    }

    /// Number of fields carried by this block (zero for non-section blocks)
    pub fn field_count(&self) -> usize {
        match self {
            Block::Section { fields, .. } => fields.len(),
            _ => 0,
        }
    }
}

/// A message as handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Posted verbatim
    Text(String),
    /// Rich layout with a plain-text fallback for notifications
    Blocks { blocks: Vec<Block>, fallback: String },
}

impl Message {
    pub fn blocks(&self) -> &[Block] {
        match self {
            Message::Text(_) => &[],
            Message::Blocks { blocks, .. } => blocks,
        }
    }

    /// Text shown in notifications and clients that cannot render blocks
    pub fn fallback_text(&self) -> &str {
        match self {
            Message::Text(text) => text,
            Message::Blocks { fallback, .. } => fallback,
        }
    }
}
