//! Chat core for the dashboard, organized into:
//! - `core`: Configuration, errors, IDs, and the message model
//! - `store`: In-memory ordered message store
//! - `persistence`: Durable single-slot history stores (`SQLite`, in-memory)
//! - `responder`: Delayed echo reply generation
//! - `filter`: Case-insensitive message view filtering
//! - `export`: Pretty-printed JSON history export
//! - `session`: Main orchestration of the chat core
//! - `telemetry`: Tracing setup helper for embedders

pub mod core;
pub mod export;
pub mod filter;
pub mod persistence;
pub mod responder;
pub mod session;
pub mod store;
pub mod telemetry;

// Re-export commonly used types for convenience
pub use self::core::{
    ChatConfig, ChatError, ChatResult, Message, MessageId, MessageIdGenerator, ResponderConfig,
    Sender, StorageConfig,
};
pub use export::{EXPORT_FILE_PREFIX, ExportArtifact, export_history};
pub use filter::filter_messages;
pub use persistence::{HistoryStore, MemoryHistoryStore, SqliteHistoryStore, StoreFuture};
pub use responder::EchoResponder;
pub use session::ChatSession;
pub use store::MessageStore;
pub use telemetry::init_tracing;
