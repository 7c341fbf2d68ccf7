//! Case-insensitive view filtering over the message history.

use crate::chat::core::message::Message;

/// Derive the display subset of `messages` whose text contains `term`,
/// ignoring case. The empty term matches everything. Pure: the input
/// sequence is never mutated and the result preserves its order.
#[must_use]
pub fn filter_messages(messages: &[Message], term: &str) -> Vec<Message> {
    if term.is_empty() {
        return messages.to_vec();
    }

    let needle = term.to_lowercase();
    messages
        .iter()
        .filter(|message| message.text.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
