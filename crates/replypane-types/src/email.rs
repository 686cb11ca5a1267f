//! Email context captured from the host and the request built from it.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Default cap on the number of body characters captured from the host.
pub const DEFAULT_MAX_BODY_CHARS: usize = 5_000;

/// Display string used for a sender the host could not resolve.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// A display name plus address pair (`"Jane Doe <jane@example.com>"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mailbox {
    /// Human-readable name, may be empty.
    #[serde(default)]
    pub display_name: String,

    /// Email address, empty for the unknown sentinel.
    #[serde(default)]
    pub address: String,
}

impl Mailbox {
    pub fn new(display_name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            address: address.into(),
        }
    }

    /// The sentinel used when the host reports no sender.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_SENDER, "")
    }

    pub fn is_unknown(&self) -> bool {
        self.address.is_empty()
            && (self.display_name.is_empty() || self.display_name == UNKNOWN_SENDER)
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return f.write_str(UNKNOWN_SENDER);
        }
        match (self.display_name.is_empty(), self.address.is_empty()) {
            (false, false) => write!(f, "{} <{}>", self.display_name, self.address),
            (true, false) => f.write_str(&self.address),
            _ => f.write_str(&self.display_name),
        }
    }
}

/// Snapshot of the open mailbox item, taken once per analyze action.
///
/// Never mutated after capture; the next analyze replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailContext {
    pub subject: String,

    /// Plain-text body, already truncated to the configured cap.
    pub body: String,

    pub sender: Mailbox,

    #[serde(default)]
    pub recipients: Vec<Mailbox>,

    /// Attachment file names, in host order.
    #[serde(default)]
    pub attachments: Vec<String>,

    /// ISO-8601 timestamp of the item.
    pub received_at: String,
}

impl EmailContext {
    /// Recipients rendered as a comma-separated list.
    pub fn recipient_list(&self) -> String {
        self.recipients
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Stylistic instruction applied to a generated reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Formal,
    Informal,
    Direct,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Formal, Tone::Informal, Tone::Direct];

    /// Parse a tone name, accepting the legacy aliases.
    ///
    /// Anything unrecognized falls back to [`Tone::Formal`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "informal" | "friendly" | "casual" => Tone::Informal,
            "direct" | "harsh" | "assertive" => Tone::Direct,
            _ => Tone::Formal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Informal => "informal",
            Tone::Direct => "direct",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Tone::parse(s))
    }
}

impl Serialize for Tone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Tone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Tone::parse(&raw))
    }
}

/// Everything a backend needs to produce one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub context: EmailContext,

    /// Free-text intent supplied by the user ("decline politely", ...).
    pub intent: Option<String>,

    pub tone: Tone,
}

impl GenerationRequest {
    pub fn new(context: EmailContext, tone: Tone) -> Self {
        Self {
            context,
            intent: None,
            tone,
        }
    }

    /// Attach a user intent; blank text is treated as no intent.
    pub fn with_intent(mut self, intent: Option<String>) -> Self {
        self.intent = intent
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());
        self
    }
}

/// Truncate `text` to at most `max_chars` characters (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_owned(),
        None => text.to_owned(),
    }
}
