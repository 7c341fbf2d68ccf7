//! Durable single-slot persistence for the chat history.
//!
//! The whole history lives under one key as a JSON array, written in full on
//! every mutation and read back once at session start. Corrupt or missing
//! data never reaches the caller: a slot that does not parse is discarded
//! (best effort) and the session starts empty.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rusqlite::OptionalExtension;
use tokio::sync::Mutex;
use tokio_rusqlite::Connection;
use tracing::{debug, warn};

use crate::chat::core::config::StorageConfig;
use crate::chat::core::errors::ChatResult;
use crate::chat::core::message::Message;

/// Boxed future type for history store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Durable history slot abstraction.
///
/// Implementations are injected into the session so the store can be swapped
/// for an in-memory fake in tests.
pub trait HistoryStore: Send + Sync {
    /// Load the persisted history.
    ///
    /// An absent slot yields an empty sequence. A slot that does not parse
    /// as a message array is discarded and also yields an empty sequence;
    /// the parse failure never propagates.
    ///
    /// # Errors
    /// Returns an error only if storage access itself fails.
    fn load(&self) -> StoreFuture<'_, ChatResult<Vec<Message>>>;

    /// Overwrite the slot with the full current sequence.
    ///
    /// # Errors
    /// Returns an error if serialization or storage access fails.
    fn save(&self, messages: Vec<Message>) -> StoreFuture<'_, ChatResult<()>>;

    /// Remove the slot entirely.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn discard(&self) -> StoreFuture<'_, ChatResult<()>>;
}

/// `SQLite` implementation of the history slot.
///
/// One row in a `(key, value)` table holds the serialized array: a single
/// named slot in origin-local durable storage.
pub struct SqliteHistoryStore {
    conn: Arc<Connection>,
    table: String,
    slot_key: String,
}

impl SqliteHistoryStore {
    /// Open the database at the configured path and initialize the slot
    /// table.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or the table cannot
    /// be created.
    pub async fn open(config: &StorageConfig) -> ChatResult<Self> {
        let conn = Connection::open(&config.sqlite_path).await?;
        Self::with_connection(Arc::new(conn), config).await
    }

    /// Initialize the slot table on an existing connection.
    ///
    /// # Errors
    /// Returns an error if the table cannot be created.
    pub async fn with_connection(conn: Arc<Connection>, config: &StorageConfig) -> ChatResult<Self> {
        let table = config.table.clone();
        let slot_key = config.slot_key.clone();
        let table_name = table.clone();

        conn.call(move |conn| {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {table_name} (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );"
            ))?;
            Ok(())
        })
        .await?;

        debug!(table = %table, key = %slot_key, "history slot ready");
        Ok(Self {
            conn,
            table,
            slot_key,
        })
    }

    /// Best-effort removal of the slot row.
    async fn delete_slot(&self) -> ChatResult<()> {
        let table = self.table.clone();
        let key = self.slot_key.clone();
        self.conn
            .call(move |conn| {
                conn.execute(&format!("DELETE FROM {table} WHERE key = ?1"), [key])?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn load(&self) -> StoreFuture<'_, ChatResult<Vec<Message>>> {
        Box::pin(async move {
            let table = self.table.clone();
            let key = self.slot_key.clone();
            let raw = self
                .conn
                .call(move |conn| {
                    let value = conn
                        .query_row(
                            &format!("SELECT value FROM {table} WHERE key = ?1"),
                            [key],
                            |row| row.get::<_, String>(0),
                        )
                        .optional()?;
                    Ok(value)
                })
                .await?;

            let Some(raw) = raw else {
                return Ok(Vec::new());
            };

            match serde_json::from_str::<Vec<Message>>(&raw) {
                Ok(messages) => Ok(messages),
                Err(err) => {
                    warn!("discarding corrupt chat history slot: {err}");
                    if let Err(err) = self.delete_slot().await {
                        warn!("failed to clear corrupt chat history slot: {err}");
                    }
                    Ok(Vec::new())
                }
            }
        })
    }

    fn save(&self, messages: Vec<Message>) -> StoreFuture<'_, ChatResult<()>> {
        Box::pin(async move {
            let payload = serde_json::to_string(&messages)?;
            let table = self.table.clone();
            let key = self.slot_key.clone();
            self.conn
                .call(move |conn| {
                    conn.execute(
                        &format!(
                            "INSERT INTO {table} (key, value) VALUES (?1, ?2)
                             ON CONFLICT(key) DO UPDATE SET value = excluded.value"
                        ),
                        rusqlite::params![key, payload],
                    )?;
                    Ok(())
                })
                .await?;
            Ok(())
        })
    }

    fn discard(&self) -> StoreFuture<'_, ChatResult<()>> {
        Box::pin(self.delete_slot())
    }
}

/// In-memory implementation of the history slot.
///
/// Stores the serialized form, byte for byte, so corrupt-slot handling can be
/// exercised without touching disk. Also usable for ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryHistoryStore {
    /// Create an empty in-memory slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Create a slot pre-seeded with raw content, valid or not.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    /// Raw slot content, if any.
    pub async fn raw(&self) -> Option<String> {
        self.slot.lock().await.clone()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> StoreFuture<'_, ChatResult<Vec<Message>>> {
        Box::pin(async move {
            let mut slot = self.slot.lock().await;
            let Some(raw) = slot.as_deref() else {
                return Ok(Vec::new());
            };
            match serde_json::from_str::<Vec<Message>>(raw) {
                Ok(messages) => Ok(messages),
                Err(err) => {
                    warn!("discarding corrupt chat history slot: {err}");
                    *slot = None;
                    Ok(Vec::new())
                }
            }
        })
    }

    fn save(&self, messages: Vec<Message>) -> StoreFuture<'_, ChatResult<()>> {
        Box::pin(async move {
            let payload = serde_json::to_string(&messages)?;
            *self.slot.lock().await = Some(payload);
            Ok(())
        })
    }

    fn discard(&self) -> StoreFuture<'_, ChatResult<()>> {
        Box::pin(async move {
            *self.slot.lock().await = None;
            Ok(())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chat::core::ids::MessageId;

    fn sample_history() -> Vec<Message> {
        vec![
            Message::user(MessageId(1), "Hello!"),
            Message::assistant(MessageId(2), "Echo: Hello!"),
        ]
    }

    async fn sqlite_store() -> SqliteHistoryStore {
        let conn = Arc::new(Connection::open_in_memory().await.unwrap());
        SqliteHistoryStore::with_connection(conn, &StorageConfig::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_sqlite_round_trip_preserves_order_and_fields() {
        let store = sqlite_store().await;
        let history = sample_history();

        store.save(history.clone()).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, history);
    }

    #[tokio::test]
    async fn test_sqlite_missing_slot_yields_empty() {
        let store = sqlite_store().await;
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_save_overwrites_prior_content() {
        let store = sqlite_store().await;
        store.save(sample_history()).await.unwrap();
        store
            .save(vec![Message::user(MessageId(9), "only")])
            .await
            .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].text, "only");
    }

    #[tokio::test]
    async fn test_sqlite_corrupt_slot_is_cleared() {
        let conn = Arc::new(Connection::open_in_memory().await.unwrap());
        let config = StorageConfig::default();
        let store = SqliteHistoryStore::with_connection(Arc::clone(&conn), &config)
            .await
            .unwrap();

        let table = config.table.clone();
        let key = config.slot_key.clone();
        conn.call(move |conn| {
            conn.execute(
                &format!("INSERT INTO {table} (key, value) VALUES (?1, ?2)"),
                rusqlite::params![key, "invalid json"],
            )?;
            Ok(())
        })
        .await
        .unwrap();

        assert!(store.load().await.unwrap().is_empty());

        // The corrupt row is gone, not just ignored.
        let table = config.table.clone();
        let count: i64 = conn
            .call(move |conn| {
                let count =
                    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                        row.get(0)
                    })?;
                Ok(count)
            })
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_sqlite_discard_removes_slot() {
        let store = sqlite_store().await;
        store.save(sample_history()).await.unwrap();
        store.discard().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_round_trip() {
        let store = MemoryHistoryStore::new();
        let history = sample_history();
        store.save(history.clone()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), history);
    }

    #[tokio::test]
    async fn test_memory_corrupt_slot_is_cleared() {
        let store = MemoryHistoryStore::with_raw("invalid json");
        assert!(store.load().await.unwrap().is_empty());
        assert!(store.raw().await.is_none());
    }

    #[tokio::test]
    async fn test_memory_non_array_json_is_treated_as_corrupt() {
        let store = MemoryHistoryStore::with_raw(r#"{"not":"an array"}"#);
        assert!(store.load().await.unwrap().is_empty());
        assert!(store.raw().await.is_none());
    }
}
