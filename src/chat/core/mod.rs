//! Core chat types: configuration, errors, identifiers, and messages.

pub mod config;
pub mod errors;
pub mod ids;
pub mod message;

pub use config::{ChatConfig, ResponderConfig, StorageConfig};
pub use errors::{ChatError, ChatResult};
pub use ids::{MessageId, MessageIdGenerator};
pub use message::{Message, Sender};
