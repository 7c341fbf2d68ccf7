//! Configuration for the chat core.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chat::core::errors::{ChatError, ChatResult};

/// Top-level configuration for a chat session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Durable history storage settings.
    pub storage: StorageConfig,
    /// Automated responder settings.
    pub responder: ResponderConfig,
}

impl ChatConfig {
    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> ChatResult<()> {
        if self.storage.slot_key.is_empty() {
            return Err(ChatError::InvalidConfig(
                "storage.slot_key must not be empty".to_string(),
            ));
        }

        // The table name is interpolated into SQL statements.
        if !is_sql_identifier(&self.storage.table) {
            return Err(ChatError::InvalidConfig(format!(
                "storage.table must be a plain identifier, got {:?}",
                self.storage.table
            )));
        }

        if self.responder.prefix.is_empty() {
            return Err(ChatError::InvalidConfig(
                "responder.prefix must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Durable history storage settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the `SQLite` database file.
    pub sqlite_path: PathBuf,
    /// Name of the key-value slot table.
    pub table: String,
    /// Key of the single slot holding the serialized history.
    pub slot_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from("chat.sqlite"),
            table: "history_slots".to_string(),
            slot_key: "chat-messages".to_string(),
        }
    }
}

/// Automated responder settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// Fixed prefix prepended to the echoed text.
    pub prefix: String,
    /// Delay before the reply is appended, in milliseconds.
    pub delay_ms: u64,
}

impl ResponderConfig {
    /// Reply delay as a [`Duration`].
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            prefix: "Echo: ".to_string(),
            delay_ms: 500,
        }
    }
}

/// Check that a value is safe to splice into SQL as a table name.
fn is_sql_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ChatConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.slot_key, "chat-messages");
        assert_eq!(config.responder.delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_empty_slot_key_is_rejected() {
        let mut config = ChatConfig::default();
        config.storage.slot_key.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hostile_table_name_is_rejected() {
        let mut config = ChatConfig::default();
        config.storage.table = "slots; DROP TABLE slots".to_string();
        assert!(config.validate().is_err());

        config.storage.table = "1table".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_prefix_is_rejected() {
        let mut config = ChatConfig::default();
        config.responder.prefix.clear();
        assert!(config.validate().is_err());
    }
}
