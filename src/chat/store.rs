//! In-memory ordered message store.
//!
//! The store is the source of truth for the running session. It holds
//! messages in insertion order and never re-sorts; persistence and view
//! filtering are layered on top by the session.

use crate::chat::core::ids::MessageId;
use crate::chat::core::message::Message;

/// Ordered collection of chat messages.
#[derive(Clone, Debug, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Rehydrate a store from a persisted sequence, preserving its order.
    #[must_use]
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Append a message to the end of the sequence.
    ///
    /// Content checks (blank input) happen at the session boundary, never
    /// here.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Remove the message with the given id, keeping the relative order of
    /// the rest. Returns `false` when no entry matches; that is a no-op, not
    /// an error.
    pub fn remove_by_id(&mut self, id: MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|message| message.id != id);
        self.messages.len() != before
    }

    /// Empty the sequence, returning how many messages were dropped.
    /// Clearing an already-empty store is a no-op.
    pub fn clear(&mut self) -> usize {
        let dropped = self.messages.len();
        self.messages.clear();
        dropped
    }

    /// Messages in insertion order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Owned copy of the full sequence, for persistence and export.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the store holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
