//! Automated echo responder.
//!
//! Each qualifying user submission schedules exactly one reply: a fixed
//! prefix concatenated with the original text, delivered after a fixed delay.
//! Once scheduled a reply always fires; later deletions or clears do not
//! cancel it.

use std::time::Duration;

use crate::chat::core::config::ResponderConfig;
use crate::chat::core::ids::MessageIdGenerator;
use crate::chat::core::message::Message;

/// Produces the automated reply to a user message.
#[derive(Clone, Debug)]
pub struct EchoResponder {
    prefix: String,
    delay: Duration,
}

impl EchoResponder {
    /// Build a responder from configuration.
    #[must_use]
    pub fn new(config: &ResponderConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            delay: config.delay(),
        }
    }

    /// Deterministic reply transform: prefix plus the original text,
    /// unmodified. No trimming, no truncation.
    #[must_use]
    pub fn reply_text(&self, original: &str) -> String {
        format!("{}{original}", self.prefix)
    }

    /// Wait out the configured delay, then build the assistant reply.
    ///
    /// The id comes from the shared generator, so it cannot collide with the
    /// triggering message.
    pub async fn respond(&self, original: &str, ids: &MessageIdGenerator) -> Message {
        tokio::time::sleep(self.delay).await;
        Message::assistant(ids.next(), self.reply_text(original))
    }
}
