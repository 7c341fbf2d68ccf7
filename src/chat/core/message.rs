//! Message model for the chat history.

use core::fmt;
use core::str::FromStr;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::chat::core::ids::MessageId;

/// Originator of a chat message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Typed by the user.
    User,
    /// Produced by the automated responder.
    Assistant,
}

impl Sender {
    /// Stable string form for storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(value.to_string()),
        }
    }
}

/// One chat turn, immutable once created.
///
/// `timestamp` is a human-readable creation time kept for display only; the
/// history order is insertion order, never the timestamp.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Message text. Stored as submitted, untrimmed.
    pub text: String,
    /// Display-only creation time (`%H:%M:%S`).
    pub timestamp: String,
    /// Originator of the message.
    pub sender: Sender,
}

impl Message {
    /// Build a user message stamped with the current local time.
    #[must_use]
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            timestamp: display_time(),
            sender: Sender::User,
        }
    }

    /// Build an assistant message stamped with the current local time.
    #[must_use]
    pub fn assistant(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            timestamp: display_time(),
            sender: Sender::Assistant,
        }
    }
}

/// Human-readable wall-clock time for display.
fn display_time() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_wire_form_is_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Sender::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_sender_parses_stable_strings() {
        assert_eq!("user".parse::<Sender>().unwrap(), Sender::User);
        assert_eq!("assistant".parse::<Sender>().unwrap(), Sender::Assistant);
        assert!("ai".parse::<Sender>().is_err());
    }

    #[test]
    fn test_message_round_trips_all_fields() {
        let message = Message {
            id: MessageId(1),
            text: "Saved message".to_string(),
            timestamp: "12:00:00".to_string(),
            sender: Sender::User,
        };
        let raw = serde_json::to_string(&message).unwrap();
        let back: Message = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, message);
    }

    #[test]
    fn test_wire_shape_matches_persisted_form() {
        let raw = r#"{"id":1,"text":"Saved message","timestamp":"12:00:00","sender":"user"}"#;
        let message: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(message.id, MessageId(1));
        assert_eq!(message.text, "Saved message");
        assert_eq!(message.timestamp, "12:00:00");
        assert_eq!(message.sender, Sender::User);
    }

    #[test]
    fn test_constructors_keep_text_untrimmed() {
        let message = Message::user(MessageId(1), "  padded  ");
        assert_eq!(message.text, "  padded  ");
        assert_eq!(message.sender, Sender::User);
    }
}
