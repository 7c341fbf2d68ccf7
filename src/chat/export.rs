//! Chat history export as a downloadable JSON artifact.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::chat::core::errors::ChatResult;
use crate::chat::core::message::Message;

/// File name prefix of export artifacts.
pub const EXPORT_FILE_PREFIX: &str = "chat-export";

/// A ready-to-download export of the full history.
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    /// Suggested file name, `chat-export-<epoch-ms>.json`.
    pub file_name: String,
    /// Pretty-printed JSON payload.
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Write the artifact into `dir` under its suggested name.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_to(&self, dir: &Path) -> ChatResult<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Serialize the full, unfiltered history as pretty-printed JSON.
///
/// Returns `Ok(None)` when the history is empty: export is disabled rather
/// than producing an empty file.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn export_history(messages: &[Message]) -> ChatResult<Option<ExportArtifact>> {
    if messages.is_empty() {
        return Ok(None);
    }

    let bytes = serde_json::to_vec_pretty(messages)?;
    let file_name = format!(
        "{EXPORT_FILE_PREFIX}-{}.json",
        Utc::now().timestamp_millis()
    );
    Ok(Some(ExportArtifact { file_name, bytes }))
}
