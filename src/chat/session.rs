//! Chat session orchestration.
//!
//! The session owns the in-memory store behind a single async mutex and ties
//! every mutation to a persistence write: mutation and save happen under one
//! lock hold, so each write observes exactly the state of the mutation that
//! triggered it. The responder reply is a spawned task that re-acquires the
//! lock later; it interleaves with other mutations but never runs
//! concurrently with them.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::chat::core::config::ChatConfig;
use crate::chat::core::errors::ChatResult;
use crate::chat::core::ids::{MessageId, MessageIdGenerator};
use crate::chat::core::message::Message;
use crate::chat::export::{ExportArtifact, export_history};
use crate::chat::filter::filter_messages;
use crate::chat::persistence::{HistoryStore, SqliteHistoryStore};
use crate::chat::responder::EchoResponder;
use crate::chat::store::MessageStore;

/// A single-user chat session over a durable history slot.
pub struct ChatSession {
    store: Arc<Mutex<MessageStore>>,
    history: Arc<dyn HistoryStore>,
    responder: Arc<EchoResponder>,
    ids: Arc<MessageIdGenerator>,
}

impl ChatSession {
    /// Open a session over the given history store, rehydrating any
    /// persisted messages.
    ///
    /// A failing load degrades to an empty history; there are no fatal
    /// errors once the backing store exists.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub async fn open(config: ChatConfig, history: Arc<dyn HistoryStore>) -> ChatResult<Self> {
        config.validate()?;

        let messages = match history.load().await {
            Ok(messages) => messages,
            Err(err) => {
                warn!("failed to load chat history, starting empty: {err}");
                Vec::new()
            }
        };

        let ids = MessageIdGenerator::new();
        for message in &messages {
            ids.observe(message.id);
        }

        info!(count = messages.len(), "chat history loaded");
        Ok(Self {
            store: Arc::new(Mutex::new(MessageStore::from_messages(messages))),
            history,
            responder: Arc::new(EchoResponder::new(&config.responder)),
            ids: Arc::new(ids),
        })
    }

    /// Open a session backed by the configured `SQLite` slot.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the database
    /// cannot be opened.
    pub async fn open_sqlite(config: ChatConfig) -> ChatResult<Self> {
        config.validate()?;
        let history = Arc::new(SqliteHistoryStore::open(&config.storage).await?);
        Self::open(config, history).await
    }

    /// Submit a user message.
    ///
    /// Blank input (empty after trimming) is rejected at this boundary: a
    /// no-op, not an error, and no reply is scheduled. Otherwise the message
    /// is appended as typed (untrimmed), persisted, and exactly one echo
    /// reply is scheduled.
    pub async fn submit(&self, text: impl Into<String>) -> Option<MessageId> {
        let text = text.into();
        if text.trim().is_empty() {
            debug!("ignoring blank submission");
            return None;
        }

        let message = Message::user(self.ids.next(), text.clone());
        let id = message.id;
        {
            let mut store = self.store.lock().await;
            store.append(message);
            Self::persist(self.history.as_ref(), &store).await;
        }

        self.schedule_reply(text);
        Some(id)
    }

    /// Spawn the deferred reply task. No cancellation: once scheduled it
    /// always fires, whatever the user does in the interim.
    fn schedule_reply(&self, original: String) {
        let store = Arc::clone(&self.store);
        let history = Arc::clone(&self.history);
        let responder = Arc::clone(&self.responder);
        let ids = Arc::clone(&self.ids);

        tokio::spawn(async move {
            let reply = responder.respond(&original, &ids).await;
            let mut store = store.lock().await;
            store.append(reply);
            Self::persist(history.as_ref(), &store).await;
        });
    }

    /// Delete one message by id. Missing ids are a no-op; nothing is
    /// persisted unless the sequence actually changed.
    pub async fn delete_message(&self, id: MessageId) -> bool {
        let mut store = self.store.lock().await;
        let removed = store.remove_by_id(id);
        if removed {
            Self::persist(self.history.as_ref(), &store).await;
        }
        removed
    }

    /// Clear the whole history, gated by a user-facing confirmation.
    ///
    /// The gate is only consulted when there is something to clear; an empty
    /// history is a no-op. Returns whether the history was cleared.
    pub async fn clear_all_with<F>(&self, confirm: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        let mut store = self.store.lock().await;
        if store.is_empty() {
            return false;
        }
        if !confirm() {
            debug!("clear not confirmed");
            return false;
        }

        let dropped = store.clear();
        info!(dropped, "chat history cleared");
        Self::persist(self.history.as_ref(), &store).await;
        true
    }

    /// Display subset of the history matching `term`, case-insensitively.
    pub async fn search(&self, term: &str) -> Vec<Message> {
        let store = self.store.lock().await;
        filter_messages(store.messages(), term)
    }

    /// Export the full, unfiltered history. `Ok(None)` when empty.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub async fn export(&self) -> ChatResult<Option<ExportArtifact>> {
        let store = self.store.lock().await;
        export_history(store.messages())
    }

    /// Snapshot of the full history in insertion order.
    pub async fn messages(&self) -> Vec<Message> {
        self.store.lock().await.snapshot()
    }

    /// Number of messages in the history.
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    /// Whether the history is empty.
    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    /// Write the current sequence to the durable slot. Failures are reported
    /// and swallowed; the in-memory sequence stays authoritative for the
    /// session and the next mutation naturally retries.
    async fn persist(history: &dyn HistoryStore, store: &MessageStore) {
        if let Err(err) = history.save(store.snapshot()).await {
            warn!("failed to persist chat history: {err}");
        }
    }
}
